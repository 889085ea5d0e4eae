use super::instruments_model::*;
use crate::Result;

/// Trait defining the contract for instrument registry operations.
pub trait InstrumentServiceTrait: Send + Sync {
    fn create_instrument(
        &self,
        owner_id: &str,
        new_instrument: NewInstrument,
    ) -> Result<Instrument>;
    fn get_instrument(&self, owner_id: &str, instrument_id: &str) -> Result<Instrument>;
    fn list_instruments(&self, owner_id: &str) -> Result<Vec<Instrument>>;
    fn update_instrument(
        &self,
        owner_id: &str,
        instrument_id: &str,
        payload: InstrumentUpdate,
    ) -> Result<Instrument>;
    fn remove_instrument(&self, owner_id: &str, instrument_id: &str) -> Result<Instrument>;
    /// Scope check used by the ledger before accepting a transaction:
    /// the instrument must exist, be active and belong to the caller.
    fn verify_owned(&self, owner_id: &str, instrument_id: &str) -> Result<Instrument>;
}
