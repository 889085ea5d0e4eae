use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::instruments_errors::InstrumentError;
use super::instruments_model::{Instrument, InstrumentUpdate, NewInstrument};
use super::instruments_repository::InstrumentRepository;
use super::instruments_traits::InstrumentServiceTrait;
use crate::errors::Result;

/// Service for managing the instrument registry
pub struct InstrumentService {
    repository: InstrumentRepository,
}

impl InstrumentService {
    /// Creates a new InstrumentService instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            repository: InstrumentRepository::new(pool),
        }
    }
}

impl InstrumentServiceTrait for InstrumentService {
    fn create_instrument(
        &self,
        owner_id: &str,
        new_instrument: NewInstrument,
    ) -> Result<Instrument> {
        new_instrument.validate()?;

        let ticker = new_instrument.ticker.trim().to_uppercase();
        if self.repository.find_by_ticker(owner_id, &ticker)?.is_some() {
            return Err(InstrumentError::AlreadyExists(format!(
                "Instrument with ticker '{}' is already registered",
                ticker
            ))
            .into());
        }

        debug!("Registering instrument {} for owner {}", ticker, owner_id);
        Ok(self.repository.create(owner_id, new_instrument)?)
    }

    fn get_instrument(&self, owner_id: &str, instrument_id: &str) -> Result<Instrument> {
        Ok(self.repository.get_by_id(owner_id, instrument_id)?)
    }

    fn list_instruments(&self, owner_id: &str) -> Result<Vec<Instrument>> {
        Ok(self.repository.list(owner_id)?)
    }

    fn update_instrument(
        &self,
        owner_id: &str,
        instrument_id: &str,
        payload: InstrumentUpdate,
    ) -> Result<Instrument> {
        payload.validate()?;

        if let Some(ticker) = &payload.ticker {
            let ticker = ticker.trim().to_uppercase();
            if let Some(existing) = self.repository.find_by_ticker(owner_id, &ticker)? {
                if existing.id != instrument_id {
                    return Err(InstrumentError::AlreadyExists(format!(
                        "Instrument with ticker '{}' is already registered",
                        ticker
                    ))
                    .into());
                }
            }
        }

        Ok(self.repository.update(owner_id, instrument_id, payload)?)
    }

    fn remove_instrument(&self, owner_id: &str, instrument_id: &str) -> Result<Instrument> {
        debug!("Removing instrument {} for owner {}", instrument_id, owner_id);
        Ok(self.repository.soft_delete(owner_id, instrument_id)?)
    }

    fn verify_owned(&self, owner_id: &str, instrument_id: &str) -> Result<Instrument> {
        Ok(self.repository.get_by_id(owner_id, instrument_id)?)
    }
}
