use super::positions_model::*;
use crate::Result;

/// Trait defining the contract for position query operations.
pub trait PositionServiceTrait: Send + Sync {
    fn get_position(&self, owner_id: &str, position_id: &str) -> Result<PositionDetails>;
    fn get_positions(&self, owner_id: &str) -> Result<Vec<PositionDetails>>;
    fn get_positions_by_type(
        &self,
        owner_id: &str,
        instrument_type: &str,
    ) -> Result<Vec<PositionDetails>>;
    fn get_summary(&self, owner_id: &str) -> Result<PortfolioSummary>;
}
