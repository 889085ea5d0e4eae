use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::instruments_errors::InstrumentError;

/// Domain model representing a registered instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: String,
    pub owner_id: String,
    pub ticker: String,
    pub name: String,
    pub instrument_type: String,
    pub description: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for instruments
#[derive(Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::instruments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct InstrumentDB {
    pub id: String,
    pub owner_id: String,
    pub ticker: String,
    pub name: String,
    pub instrument_type: String,
    pub description: Option<String>,
    pub deleted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for registering a new instrument
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewInstrument {
    pub ticker: String,
    pub name: String,
    pub instrument_type: String,
    pub description: Option<String>,
}

impl NewInstrument {
    /// Validates the new instrument data
    pub fn validate(&self) -> crate::instruments::Result<()> {
        if self.ticker.trim().is_empty() {
            return Err(InstrumentError::InvalidData(
                "Ticker cannot be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(InstrumentError::InvalidData(
                "Name cannot be empty".to_string(),
            ));
        }
        if InstrumentType::from_str(self.instrument_type.trim()).is_err() {
            return Err(InstrumentError::InvalidData(format!(
                "Unknown instrument type: {}",
                self.instrument_type
            )));
        }
        Ok(())
    }
}

/// Input model for updating an existing instrument. `None` fields are left
/// untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentUpdate {
    pub ticker: Option<String>,
    pub name: Option<String>,
    pub instrument_type: Option<String>,
    pub description: Option<String>,
}

impl InstrumentUpdate {
    /// Validates the instrument update data
    pub fn validate(&self) -> crate::instruments::Result<()> {
        if let Some(ticker) = &self.ticker {
            if ticker.trim().is_empty() {
                return Err(InstrumentError::InvalidData(
                    "Ticker cannot be empty".to_string(),
                ));
            }
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(InstrumentError::InvalidData(
                    "Name cannot be empty".to_string(),
                ));
            }
        }
        if let Some(instrument_type) = &self.instrument_type {
            if InstrumentType::from_str(instrument_type.trim()).is_err() {
                return Err(InstrumentError::InvalidData(format!(
                    "Unknown instrument type: {}",
                    instrument_type
                )));
            }
        }
        Ok(())
    }
}

/// Enum representing the supported instrument categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentType {
    Stock,
    Reit,
    FixedIncome,
    Crypto,
    Etf,
    Other,
}

impl InstrumentType {
    pub fn as_str(&self) -> &'static str {
        use crate::instruments::instruments_constants::*;
        match self {
            InstrumentType::Stock => INSTRUMENT_TYPE_STOCK,
            InstrumentType::Reit => INSTRUMENT_TYPE_REIT,
            InstrumentType::FixedIncome => INSTRUMENT_TYPE_FIXED_INCOME,
            InstrumentType::Crypto => INSTRUMENT_TYPE_CRYPTO,
            InstrumentType::Etf => INSTRUMENT_TYPE_ETF,
            InstrumentType::Other => INSTRUMENT_TYPE_OTHER,
        }
    }
}

impl FromStr for InstrumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use crate::instruments::instruments_constants::*;
        match s.to_uppercase().as_str() {
            s if s == INSTRUMENT_TYPE_STOCK => Ok(InstrumentType::Stock),
            s if s == INSTRUMENT_TYPE_REIT => Ok(InstrumentType::Reit),
            s if s == INSTRUMENT_TYPE_FIXED_INCOME => Ok(InstrumentType::FixedIncome),
            s if s == INSTRUMENT_TYPE_CRYPTO => Ok(InstrumentType::Crypto),
            s if s == INSTRUMENT_TYPE_ETF => Ok(InstrumentType::Etf),
            s if s == INSTRUMENT_TYPE_OTHER => Ok(InstrumentType::Other),
            _ => Err(format!("Unknown instrument type: {}", s)),
        }
    }
}

// Conversion implementations
impl From<InstrumentDB> for Instrument {
    fn from(db: InstrumentDB) -> Self {
        Self {
            id: db.id,
            owner_id: db.owner_id,
            ticker: db.ticker,
            name: db.name,
            instrument_type: db.instrument_type,
            description: db.description,
            deleted_at: db
                .deleted_at
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(db.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(db.updated_at, Utc),
        }
    }
}
