use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::ledger_errors::LedgerError;
use super::ledger_model::{
    parse_transaction_date, NewTransaction, Transaction, TransactionDetails, TransactionKind,
    TransactionPatch,
};
use super::ledger_repository::LedgerRepository;
use super::ledger_traits::LedgerServiceTrait;
use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::instruments::InstrumentServiceTrait;
use crate::positions::{calculate_position, PositionKey, PositionRepository};

/// Rejects a reducing entry that would take out more quantity than the
/// bucket holds.
pub fn check_reduction(
    kind: TransactionKind,
    requested: Decimal,
    available: Decimal,
) -> super::ledger_errors::Result<()> {
    if kind.is_reducing() && requested > available {
        return Err(LedgerError::InsufficientQuantity {
            requested,
            available,
        });
    }
    Ok(())
}

/// Transient storage failures worth one local retry: SQLite reporting the
/// database or a table as locked or busy.
fn is_transient_storage_error(err: &Error) -> bool {
    let message = err.to_string().to_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("database is busy")
}

/// Service coordinating ledger mutations. Every accepted write re-derives
/// the position of the touched bucket inside the same database transaction,
/// and writers of the same bucket are serialized through a per-key lock.
pub struct LedgerService {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    repository: LedgerRepository,
    position_repository: PositionRepository,
    instrument_service: Arc<dyn InstrumentServiceTrait>,
    bucket_locks: DashMap<PositionKey, Arc<Mutex<()>>>,
}

impl LedgerService {
    /// Creates a new LedgerService instance
    pub fn new(
        pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
        instrument_service: Arc<dyn InstrumentServiceTrait>,
    ) -> Self {
        Self {
            repository: LedgerRepository::new(pool.clone()),
            position_repository: PositionRepository::new(pool.clone()),
            pool,
            instrument_service,
            bucket_locks: DashMap::new(),
        }
    }

    fn bucket_lock(&self, key: &PositionKey) -> Arc<Mutex<()>> {
        self.bucket_locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Runs one mutation inside an immediate transaction, retrying once when
    /// the storage layer reports a transient lock. A second transient failure
    /// surfaces as `Error::Unavailable`.
    fn commit_with_retry<T, F>(&self, op: F) -> Result<T>
    where
        F: Fn(&mut SqliteConnection) -> Result<T>,
    {
        match self.commit_once(&op) {
            Err(err) if is_transient_storage_error(&err) => {
                warn!("Ledger commit hit transient storage error, retrying once: {}", err);
                self.commit_once(&op).map_err(|retry_err| {
                    if is_transient_storage_error(&retry_err) {
                        Error::Unavailable(retry_err.to_string())
                    } else {
                        retry_err
                    }
                })
            }
            other => other,
        }
    }

    fn commit_once<T, F>(&self, op: &F) -> Result<T>
    where
        F: Fn(&mut SqliteConnection) -> Result<T>,
    {
        let mut conn = get_connection(&self.pool)?;
        conn.immediate_transaction::<_, Error, _>(|conn| op(conn))
    }

    /// Re-derives the position of one bucket from its active history. A fold
    /// that ends with nothing held removes the snapshot row.
    fn refresh_position(&self, conn: &mut SqliteConnection, key: &PositionKey) -> Result<()> {
        let history = self.repository.list_active_by_key(conn, key)?;
        match calculate_position(&key.owner_id, &key.instrument_id, &history) {
            Some(position) => self.position_repository.upsert(conn, &position)?,
            None => {
                self.position_repository.delete_by_key(conn, key)?;
            }
        }
        Ok(())
    }

    /// Quantity currently held by a bucket, according to the live snapshot
    fn held_quantity(&self, conn: &mut SqliteConnection, key: &PositionKey) -> Result<Decimal> {
        Ok(self
            .position_repository
            .get_by_key(conn, key)?
            .map(|position| position.quantity)
            .unwrap_or(Decimal::ZERO))
    }

    /// Quantity a bucket would hold if the given transaction were not part of
    /// its history. Gates amendments, where the entry being rewritten must
    /// not count against itself.
    fn held_quantity_excluding(
        &self,
        conn: &mut SqliteConnection,
        key: &PositionKey,
        transaction_id: &str,
    ) -> Result<Decimal> {
        let history: Vec<Transaction> = self
            .repository
            .list_active_by_key(conn, key)?
            .into_iter()
            .filter(|transaction| transaction.id != transaction_id)
            .collect();

        Ok(
            calculate_position(&key.owner_id, &key.instrument_id, &history)
                .map(|position| position.quantity)
                .unwrap_or(Decimal::ZERO),
        )
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    async fn create_transaction(
        &self,
        owner_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<TransactionDetails> {
        new_transaction.validate()?;

        let instrument = self
            .instrument_service
            .verify_owned(owner_id, &new_transaction.instrument_id)?;

        let kind = new_transaction.kind()?;
        let fees = new_transaction.fees_or_zero();
        let occurred_at = parse_transaction_date(&new_transaction.occurred_at)?;
        let now = Utc::now();

        // Id and timestamps are assigned by the repository on insert.
        let template = Transaction {
            id: String::new(),
            owner_id: owner_id.to_string(),
            instrument_id: instrument.id.clone(),
            kind,
            quantity: new_transaction.quantity,
            unit_price: new_transaction.unit_price,
            fees,
            total_value: kind.total_value(
                new_transaction.quantity,
                new_transaction.unit_price,
                fees,
            ),
            occurred_at,
            notes: new_transaction.notes.clone(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        let key = PositionKey::new(owner_id, &instrument.id);
        let lock = self.bucket_lock(&key);
        let _guard = lock.lock().await;

        debug!(
            "Recording {} transaction in bucket {}/{}",
            kind.as_str(),
            key.owner_id,
            key.instrument_id
        );

        let created = self.commit_with_retry(|conn| {
            if kind.is_reducing() {
                let held = self.held_quantity(conn, &key)?;
                check_reduction(kind, template.quantity, held)?;
            }
            let created = self.repository.insert(conn, template.clone())?;
            self.refresh_position(conn, &key)?;
            Ok(created)
        })?;

        Ok(TransactionDetails::from_transaction(
            created,
            instrument.ticker,
            instrument.name,
            instrument.instrument_type,
        ))
    }

    async fn update_transaction(
        &self,
        owner_id: &str,
        transaction_id: &str,
        patch: TransactionPatch,
    ) -> Result<TransactionDetails> {
        let existing = self.repository.get_active_by_id(owner_id, transaction_id)?;
        let key = PositionKey::new(owner_id, &existing.instrument_id);
        let lock = self.bucket_lock(&key);
        let _guard = lock.lock().await;

        debug!(
            "Amending transaction {} in bucket {}/{}",
            transaction_id, key.owner_id, key.instrument_id
        );

        let (updated, ticker, name, instrument_type) = self.commit_with_retry(|conn| {
            // Re-read under the bucket lock; the pre-read above only resolved
            // the bucket to lock on.
            let current = self.repository.find_active(conn, owner_id, transaction_id)?;
            let merged = patch.apply(&current)?;

            if merged.kind.is_reducing() {
                let held = self.held_quantity_excluding(conn, &key, &current.id)?;
                check_reduction(merged.kind, merged.quantity, held)?;
            }

            let updated = self.repository.update(conn, merged)?;
            self.refresh_position(conn, &key)?;

            let (ticker, name, instrument_type) =
                self.repository.instrument_meta(conn, &updated.instrument_id)?;
            Ok((updated, ticker, name, instrument_type))
        })?;

        Ok(TransactionDetails::from_transaction(
            updated,
            ticker,
            name,
            instrument_type,
        ))
    }

    async fn delete_transaction(
        &self,
        owner_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction> {
        let existing = self.repository.get_active_by_id(owner_id, transaction_id)?;
        let key = PositionKey::new(owner_id, &existing.instrument_id);
        let lock = self.bucket_lock(&key);
        let _guard = lock.lock().await;

        debug!(
            "Deleting transaction {} from bucket {}/{}",
            transaction_id, key.owner_id, key.instrument_id
        );

        self.commit_with_retry(|conn| {
            let deleted = self.repository.soft_delete(conn, owner_id, transaction_id)?;
            self.refresh_position(conn, &key)?;
            Ok(deleted)
        })
    }

    fn get_transactions(&self, owner_id: &str) -> Result<Vec<TransactionDetails>> {
        Ok(self.repository.list_details(owner_id)?)
    }

    fn get_transaction(&self, owner_id: &str, transaction_id: &str) -> Result<TransactionDetails> {
        Ok(self.repository.get_details(owner_id, transaction_id)?)
    }
}
