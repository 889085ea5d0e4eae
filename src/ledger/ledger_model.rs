use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::ledger_errors::LedgerError;
use crate::constants::DECIMAL_PRECISION;

/// Enum representing the supported transaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Buy,
    Sell,
    Dividend,
    Interest,
    Yield,
    BonusShares,
    Split,
    ReverseSplit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        use crate::ledger::ledger_constants::*;
        match self {
            TransactionKind::Buy => TRANSACTION_KIND_BUY,
            TransactionKind::Sell => TRANSACTION_KIND_SELL,
            TransactionKind::Dividend => TRANSACTION_KIND_DIVIDEND,
            TransactionKind::Interest => TRANSACTION_KIND_INTEREST,
            TransactionKind::Yield => TRANSACTION_KIND_YIELD,
            TransactionKind::BonusShares => TRANSACTION_KIND_BONUS_SHARES,
            TransactionKind::Split => TRANSACTION_KIND_SPLIT,
            TransactionKind::ReverseSplit => TRANSACTION_KIND_REVERSE_SPLIT,
        }
    }

    /// Whether the kind takes quantity out of a position and must be gated
    /// against the currently held amount.
    pub fn is_reducing(&self) -> bool {
        use crate::ledger::ledger_constants::REDUCING_TRANSACTION_KINDS;
        REDUCING_TRANSACTION_KINDS.contains(&self.as_str())
    }

    /// Total value of a transaction of this kind. Fees are added on top of a
    /// purchase, subtracted from sale proceeds, and ignored everywhere else.
    pub fn total_value(&self, quantity: Decimal, unit_price: Decimal, fees: Decimal) -> Decimal {
        let gross = quantity * unit_price;
        match self {
            TransactionKind::Buy => gross + fees,
            TransactionKind::Sell => gross - fees,
            _ => gross,
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use crate::ledger::ledger_constants::*;
        match s {
            s if s == TRANSACTION_KIND_BUY => Ok(TransactionKind::Buy),
            s if s == TRANSACTION_KIND_SELL => Ok(TransactionKind::Sell),
            s if s == TRANSACTION_KIND_DIVIDEND => Ok(TransactionKind::Dividend),
            s if s == TRANSACTION_KIND_INTEREST => Ok(TransactionKind::Interest),
            s if s == TRANSACTION_KIND_YIELD => Ok(TransactionKind::Yield),
            s if s == TRANSACTION_KIND_BONUS_SHARES => Ok(TransactionKind::BonusShares),
            s if s == TRANSACTION_KIND_SPLIT => Ok(TransactionKind::Split),
            s if s == TRANSACTION_KIND_REVERSE_SPLIT => Ok(TransactionKind::ReverseSplit),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

/// Domain model representing a ledger transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub owner_id: String,
    pub instrument_id: String,
    pub kind: TransactionKind,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub fees: Decimal,
    pub total_value: Decimal,
    pub occurred_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for transactions
#[derive(Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct TransactionDB {
    pub id: String,
    pub owner_id: String,
    pub instrument_id: String,
    pub kind: String,
    pub quantity: String,
    pub unit_price: String,
    pub fees: String,
    pub total_value: String,
    pub occurred_at: NaiveDateTime,
    pub notes: Option<String>,
    pub deleted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for recording a new transaction
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub instrument_id: String,
    pub kind: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    #[serde(default)]
    pub fees: Option<Decimal>,
    pub occurred_at: String,
    pub notes: Option<String>,
}

impl NewTransaction {
    /// Validates the new transaction data
    pub fn validate(&self) -> crate::ledger::Result<()> {
        if self.instrument_id.trim().is_empty() {
            return Err(LedgerError::InvalidData(
                "Instrument ID cannot be empty".to_string(),
            ));
        }
        let kind = self.kind()?;
        validate_amounts(kind, self.quantity, self.unit_price, self.fees_or_zero())?;
        parse_transaction_date(&self.occurred_at)?;
        Ok(())
    }

    /// Parses the transaction kind
    pub fn kind(&self) -> crate::ledger::Result<TransactionKind> {
        TransactionKind::from_str(self.kind.trim()).map_err(LedgerError::InvalidData)
    }

    /// Fees default to zero when omitted
    pub fn fees_or_zero(&self) -> Decimal {
        self.fees.unwrap_or(Decimal::ZERO)
    }
}

/// Input model for amending a transaction. `None` fields are left untouched.
/// The target instrument cannot be changed; move a transaction by deleting it
/// and recording a new one.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    pub kind: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub fees: Option<Decimal>,
    pub occurred_at: Option<String>,
    pub notes: Option<String>,
}

impl TransactionPatch {
    /// Merges the patch into an existing transaction. The merged row is
    /// re-validated as a whole and its total value recomputed; a stored total
    /// never comes from the caller.
    pub fn apply(&self, transaction: &Transaction) -> crate::ledger::Result<Transaction> {
        let mut updated = transaction.clone();
        if let Some(kind) = &self.kind {
            updated.kind =
                TransactionKind::from_str(kind.trim()).map_err(LedgerError::InvalidData)?;
        }
        if let Some(quantity) = self.quantity {
            updated.quantity = quantity;
        }
        if let Some(unit_price) = self.unit_price {
            updated.unit_price = unit_price;
        }
        if let Some(fees) = self.fees {
            updated.fees = fees;
        }
        if let Some(occurred_at) = &self.occurred_at {
            updated.occurred_at = parse_transaction_date(occurred_at)?;
        }
        if let Some(notes) = &self.notes {
            updated.notes = Some(notes.clone());
        }

        validate_amounts(updated.kind, updated.quantity, updated.unit_price, updated.fees)?;
        updated.total_value = updated
            .kind
            .total_value(updated.quantity, updated.unit_price, updated.fees);
        Ok(updated)
    }
}

/// Model for transaction details including instrument metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    pub id: String,
    pub owner_id: String,
    pub instrument_id: String,
    pub kind: TransactionKind,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub fees: Decimal,
    pub total_value: Decimal,
    pub occurred_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ticker: String,
    pub instrument_name: String,
    pub instrument_type: String,
}

impl TransactionDetails {
    pub(crate) fn from_transaction(
        transaction: Transaction,
        ticker: String,
        instrument_name: String,
        instrument_type: String,
    ) -> Self {
        Self {
            id: transaction.id,
            owner_id: transaction.owner_id,
            instrument_id: transaction.instrument_id,
            kind: transaction.kind,
            quantity: transaction.quantity,
            unit_price: transaction.unit_price,
            fees: transaction.fees,
            total_value: transaction.total_value,
            occurred_at: transaction.occurred_at,
            notes: transaction.notes,
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
            ticker,
            instrument_name,
            instrument_type,
        }
    }
}

/// Validates quantity, unit price and fees for a given kind. Purchases and
/// sales need a strictly positive price; other kinds accept zero.
pub(crate) fn validate_amounts(
    kind: TransactionKind,
    quantity: Decimal,
    unit_price: Decimal,
    fees: Decimal,
) -> crate::ledger::Result<()> {
    if quantity <= Decimal::ZERO {
        return Err(LedgerError::InvalidData(
            "Quantity must be strictly positive".to_string(),
        ));
    }
    let price_required = matches!(kind, TransactionKind::Buy | TransactionKind::Sell);
    if price_required && unit_price <= Decimal::ZERO {
        return Err(LedgerError::InvalidData(format!(
            "Unit price must be strictly positive for {} transactions",
            kind.as_str()
        )));
    }
    if !price_required && unit_price < Decimal::ZERO {
        return Err(LedgerError::InvalidData(
            "Unit price cannot be negative".to_string(),
        ));
    }
    if fees < Decimal::ZERO {
        return Err(LedgerError::InvalidData(
            "Fees cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// Parses a user supplied transaction date. Accepts RFC3339 timestamps or
/// plain dates, which land on noon UTC.
pub(crate) fn parse_transaction_date(raw: &str) -> crate::ledger::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(12, 0, 0) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
    }
    Err(LedgerError::InvalidData(format!(
        "Invalid date format '{}'. Expected ISO 8601/RFC3339 or YYYY-MM-DD",
        raw
    )))
}

fn parse_stored_decimal(field: &str, value: &str) -> crate::ledger::Result<Decimal> {
    Decimal::from_str(value).map_err(|e| {
        LedgerError::DatabaseError(format!(
            "Stored {} '{}' is not a valid decimal: {}",
            field, value, e
        ))
    })
}

// Conversion implementations
impl TryFrom<TransactionDB> for Transaction {
    type Error = LedgerError;

    fn try_from(db: TransactionDB) -> Result<Self, Self::Error> {
        let kind = TransactionKind::from_str(&db.kind)
            .map_err(|e| LedgerError::DatabaseError(format!("Stored kind is invalid: {}", e)))?;
        Ok(Self {
            id: db.id,
            owner_id: db.owner_id,
            instrument_id: db.instrument_id,
            kind,
            quantity: parse_stored_decimal("quantity", &db.quantity)?,
            unit_price: parse_stored_decimal("unit_price", &db.unit_price)?,
            fees: parse_stored_decimal("fees", &db.fees)?,
            total_value: parse_stored_decimal("total_value", &db.total_value)?,
            occurred_at: DateTime::from_naive_utc_and_offset(db.occurred_at, Utc),
            notes: db.notes,
            deleted_at: db
                .deleted_at
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(db.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(db.updated_at, Utc),
        })
    }
}

impl From<Transaction> for TransactionDB {
    fn from(domain: Transaction) -> Self {
        Self {
            id: domain.id,
            owner_id: domain.owner_id,
            instrument_id: domain.instrument_id,
            kind: domain.kind.as_str().to_string(),
            quantity: domain.quantity.round_dp(DECIMAL_PRECISION).to_string(),
            unit_price: domain.unit_price.round_dp(DECIMAL_PRECISION).to_string(),
            fees: domain.fees.round_dp(DECIMAL_PRECISION).to_string(),
            total_value: domain.total_value.round_dp(DECIMAL_PRECISION).to_string(),
            occurred_at: domain.occurred_at.naive_utc(),
            notes: domain.notes,
            deleted_at: domain.deleted_at.map(|dt| dt.naive_utc()),
            created_at: domain.created_at.naive_utc(),
            updated_at: domain.updated_at.naive_utc(),
        }
    }
}
