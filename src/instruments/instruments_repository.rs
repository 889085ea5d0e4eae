use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{get_connection, DbConnection};
use crate::schema::instruments;

use super::instruments_errors::{InstrumentError, Result};
use super::instruments_model::{Instrument, InstrumentDB, InstrumentUpdate, NewInstrument};

/// Repository for managing instrument data in the database
pub struct InstrumentRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl InstrumentRepository {
    /// Creates a new InstrumentRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Creates a new instrument in the database
    pub fn create(&self, owner_id: &str, new_instrument: NewInstrument) -> Result<Instrument> {
        new_instrument.validate()?;
        let mut conn = self.connection()?;

        let now = Utc::now().naive_utc();
        let instrument_db = InstrumentDB {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            ticker: new_instrument.ticker.trim().to_uppercase(),
            name: new_instrument.name.trim().to_string(),
            instrument_type: new_instrument.instrument_type.trim().to_uppercase(),
            description: new_instrument.description,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        let result = diesel::insert_into(instruments::table)
            .values(&instrument_db)
            .get_result::<InstrumentDB>(&mut conn)?;

        Ok(result.into())
    }

    /// Retrieves an active instrument by its ID, scoped to its owner
    pub fn get_by_id(&self, owner_id: &str, instrument_id: &str) -> Result<Instrument> {
        let mut conn = self.connection()?;

        let result = instruments::table
            .filter(instruments::id.eq(instrument_id))
            .filter(instruments::owner_id.eq(owner_id))
            .filter(instruments::deleted_at.is_null())
            .first::<InstrumentDB>(&mut conn)?;

        Ok(result.into())
    }

    /// Looks up an active instrument by ticker
    pub fn find_by_ticker(&self, owner_id: &str, ticker: &str) -> Result<Option<Instrument>> {
        let mut conn = self.connection()?;

        let result = instruments::table
            .filter(instruments::owner_id.eq(owner_id))
            .filter(instruments::ticker.eq(ticker))
            .filter(instruments::deleted_at.is_null())
            .first::<InstrumentDB>(&mut conn)
            .optional()?;

        Ok(result.map(Instrument::from))
    }

    /// Lists all active instruments of an owner, ordered by ticker
    pub fn list(&self, owner_id: &str) -> Result<Vec<Instrument>> {
        let mut conn = self.connection()?;

        let results = instruments::table
            .filter(instruments::owner_id.eq(owner_id))
            .filter(instruments::deleted_at.is_null())
            .order(instruments::ticker.asc())
            .load::<InstrumentDB>(&mut conn)?;

        Ok(results.into_iter().map(Instrument::from).collect())
    }

    /// Applies an update to an active instrument
    pub fn update(
        &self,
        owner_id: &str,
        instrument_id: &str,
        payload: InstrumentUpdate,
    ) -> Result<Instrument> {
        payload.validate()?;
        let mut conn = self.connection()?;

        let mut instrument_db = instruments::table
            .filter(instruments::id.eq(instrument_id))
            .filter(instruments::owner_id.eq(owner_id))
            .filter(instruments::deleted_at.is_null())
            .first::<InstrumentDB>(&mut conn)?;

        if let Some(ticker) = payload.ticker {
            instrument_db.ticker = ticker.trim().to_uppercase();
        }
        if let Some(name) = payload.name {
            instrument_db.name = name.trim().to_string();
        }
        if let Some(instrument_type) = payload.instrument_type {
            instrument_db.instrument_type = instrument_type.trim().to_uppercase();
        }
        if let Some(description) = payload.description {
            instrument_db.description = Some(description);
        }
        instrument_db.updated_at = Utc::now().naive_utc();

        let result = diesel::update(instruments::table.find(&instrument_db.id))
            .set(&instrument_db)
            .get_result::<InstrumentDB>(&mut conn)?;

        Ok(result.into())
    }

    /// Soft deletes an active instrument
    pub fn soft_delete(&self, owner_id: &str, instrument_id: &str) -> Result<Instrument> {
        let mut conn = self.connection()?;
        let now = Utc::now().naive_utc();

        let result = diesel::update(
            instruments::table
                .filter(instruments::id.eq(instrument_id))
                .filter(instruments::owner_id.eq(owner_id))
                .filter(instruments::deleted_at.is_null()),
        )
        .set((
            instruments::deleted_at.eq(Some(now)),
            instruments::updated_at.eq(now),
        ))
        .get_result::<InstrumentDB>(&mut conn)?;

        Ok(result.into())
    }

    fn connection(&self) -> Result<DbConnection> {
        get_connection(&self.pool).map_err(|e| InstrumentError::DatabaseError(e.to_string()))
    }
}
