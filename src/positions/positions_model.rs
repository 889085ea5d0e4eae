use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifies the position bucket a transaction folds into
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionKey {
    pub owner_id: String,
    pub instrument_id: String,
}

impl PositionKey {
    pub fn new(owner_id: &str, instrument_id: &str) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            instrument_id: instrument_id.to_string(),
        }
    }
}

/// Aggregated state of one (owner, instrument) bucket, derived from the
/// active transaction history. Never edited directly; always recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub owner_id: String,
    pub instrument_id: String,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    pub total_invested: Decimal,
}

impl Position {
    pub fn key(&self) -> PositionKey {
        PositionKey::new(&self.owner_id, &self.instrument_id)
    }
}

/// Database model for position snapshots
#[derive(Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PositionDB {
    pub id: String,
    pub owner_id: String,
    pub instrument_id: String,
    pub quantity: String,
    pub average_cost: String,
    pub total_invested: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Model for position details including instrument metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDetails {
    pub id: String,
    pub owner_id: String,
    pub instrument_id: String,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    pub total_invested: Decimal,
    pub ticker: String,
    pub instrument_name: String,
    pub instrument_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PositionDetails {
    pub(crate) fn from_row(
        db: PositionDB,
        ticker: String,
        instrument_name: String,
        instrument_type: String,
    ) -> Self {
        Self {
            quantity: Decimal::from_str(&db.quantity).unwrap_or_default(),
            average_cost: Decimal::from_str(&db.average_cost).unwrap_or_default(),
            total_invested: Decimal::from_str(&db.total_invested).unwrap_or_default(),
            id: db.id,
            owner_id: db.owner_id,
            instrument_id: db.instrument_id,
            ticker,
            instrument_name,
            instrument_type,
            created_at: DateTime::from_naive_utc_and_offset(db.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(db.updated_at, Utc),
        }
    }
}

/// Per-type slice of the portfolio summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAllocation {
    pub instrument_type: String,
    pub count: i64,
    pub invested: Decimal,
    pub percentage: Decimal,
}

/// Aggregated view over all positions of an owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_invested: Decimal,
    pub total_positions: i64,
    pub distribution: Vec<TypeAllocation>,
}

// Conversion from DB model to the derived aggregate. Snapshot rows are
// written by our own recompute path, so parse failures degrade to zero
// rather than poisoning reads.
impl From<PositionDB> for Position {
    fn from(db: PositionDB) -> Self {
        Self {
            owner_id: db.owner_id,
            instrument_id: db.instrument_id,
            quantity: Decimal::from_str(&db.quantity).unwrap_or_default(),
            average_cost: Decimal::from_str(&db.average_cost).unwrap_or_default(),
            total_invested: Decimal::from_str(&db.total_invested).unwrap_or_default(),
        }
    }
}
