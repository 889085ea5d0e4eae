use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use super::positions_model::{PortfolioSummary, PositionDetails, TypeAllocation};
use super::positions_repository::PositionRepository;
use super::positions_traits::PositionServiceTrait;
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::Result;

/// Service answering position and portfolio queries
pub struct PositionService {
    repository: PositionRepository,
}

impl PositionService {
    /// Creates a new PositionService instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            repository: PositionRepository::new(pool),
        }
    }
}

impl PositionServiceTrait for PositionService {
    fn get_position(&self, owner_id: &str, position_id: &str) -> Result<PositionDetails> {
        Ok(self.repository.get_by_id(owner_id, position_id)?)
    }

    fn get_positions(&self, owner_id: &str) -> Result<Vec<PositionDetails>> {
        Ok(self.repository.list(owner_id)?)
    }

    fn get_positions_by_type(
        &self,
        owner_id: &str,
        instrument_type: &str,
    ) -> Result<Vec<PositionDetails>> {
        let instrument_type = instrument_type.trim().to_uppercase();
        Ok(self.repository.list_by_type(owner_id, &instrument_type)?)
    }

    fn get_summary(&self, owner_id: &str) -> Result<PortfolioSummary> {
        let positions = self.repository.list(owner_id)?;

        let total_invested: Decimal = positions.iter().map(|p| p.total_invested).sum();

        let mut by_type: HashMap<String, (i64, Decimal)> = HashMap::new();
        for position in &positions {
            let entry = by_type
                .entry(position.instrument_type.clone())
                .or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += position.total_invested;
        }

        let mut distribution: Vec<TypeAllocation> = by_type
            .into_iter()
            .map(|(instrument_type, (count, invested))| {
                let percentage = if total_invested > Decimal::ZERO {
                    (invested / total_invested * Decimal::ONE_HUNDRED)
                        .round_dp(DISPLAY_DECIMAL_PRECISION)
                } else {
                    Decimal::ZERO
                };
                TypeAllocation {
                    instrument_type,
                    count,
                    invested,
                    percentage,
                }
            })
            .collect();
        distribution.sort_by(|a, b| {
            b.invested
                .cmp(&a.invested)
                .then_with(|| a.instrument_type.cmp(&b.instrument_type))
        });

        Ok(PortfolioSummary {
            total_invested,
            total_positions: positions.len() as i64,
            distribution,
        })
    }
}
