use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{get_connection, DbConnection};
use crate::positions::PositionKey;
use crate::schema::{instruments, transactions};

use super::ledger_errors::{LedgerError, Result};
use super::ledger_model::{Transaction, TransactionDB, TransactionDetails};

/// Repository for the append-only transaction ledger. Rows are never
/// physically removed; deletion marks `deleted_at` and all reads skip
/// marked rows.
pub struct LedgerRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Lists the active transactions of an owner with instrument metadata,
    /// most recent occurrence first
    pub fn list_details(&self, owner_id: &str) -> Result<Vec<TransactionDetails>> {
        let mut conn = self.connection()?;

        let rows = transactions::table
            .inner_join(instruments::table)
            .filter(transactions::owner_id.eq(owner_id))
            .filter(transactions::deleted_at.is_null())
            .order(transactions::occurred_at.desc())
            .select((
                TransactionDB::as_select(),
                instruments::ticker,
                instruments::name,
                instruments::instrument_type,
            ))
            .load::<(TransactionDB, String, String, String)>(&mut conn)?;

        rows.into_iter()
            .map(|(row, ticker, name, instrument_type)| {
                Ok(TransactionDetails::from_transaction(
                    Transaction::try_from(row)?,
                    ticker,
                    name,
                    instrument_type,
                ))
            })
            .collect()
    }

    /// Retrieves one active transaction of an owner with instrument metadata
    pub fn get_details(&self, owner_id: &str, transaction_id: &str) -> Result<TransactionDetails> {
        let mut conn = self.connection()?;

        let (row, ticker, name, instrument_type) = transactions::table
            .inner_join(instruments::table)
            .filter(transactions::id.eq(transaction_id))
            .filter(transactions::owner_id.eq(owner_id))
            .filter(transactions::deleted_at.is_null())
            .select((
                TransactionDB::as_select(),
                instruments::ticker,
                instruments::name,
                instruments::instrument_type,
            ))
            .first::<(TransactionDB, String, String, String)>(&mut conn)?;

        Ok(TransactionDetails::from_transaction(
            Transaction::try_from(row)?,
            ticker,
            name,
            instrument_type,
        ))
    }

    /// Retrieves one active transaction of an owner
    pub fn get_active_by_id(&self, owner_id: &str, transaction_id: &str) -> Result<Transaction> {
        let mut conn = self.connection()?;
        self.find_active(&mut conn, owner_id, transaction_id)
    }

    /// Retrieves one active transaction on the caller's connection
    pub fn find_active(
        &self,
        conn: &mut SqliteConnection,
        owner_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction> {
        let row = transactions::table
            .filter(transactions::id.eq(transaction_id))
            .filter(transactions::owner_id.eq(owner_id))
            .filter(transactions::deleted_at.is_null())
            .first::<TransactionDB>(conn)?;

        Transaction::try_from(row)
    }

    /// Loads the active history of one bucket in occurrence order
    pub fn list_active_by_key(
        &self,
        conn: &mut SqliteConnection,
        key: &PositionKey,
    ) -> Result<Vec<Transaction>> {
        let rows = transactions::table
            .filter(transactions::owner_id.eq(&key.owner_id))
            .filter(transactions::instrument_id.eq(&key.instrument_id))
            .filter(transactions::deleted_at.is_null())
            .order(transactions::occurred_at.asc())
            .load::<TransactionDB>(conn)?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    /// Inserts a new transaction row, assigning its id and timestamps
    pub fn insert(
        &self,
        conn: &mut SqliteConnection,
        mut transaction: Transaction,
    ) -> Result<Transaction> {
        let now = Utc::now();
        transaction.id = Uuid::new_v4().to_string();
        transaction.created_at = now;
        transaction.updated_at = now;

        let transaction_db: TransactionDB = transaction.into();

        let row = diesel::insert_into(transactions::table)
            .values(&transaction_db)
            .get_result::<TransactionDB>(conn)?;

        Transaction::try_from(row)
    }

    /// Rewrites an existing transaction row, refreshing its update timestamp
    pub fn update(
        &self,
        conn: &mut SqliteConnection,
        mut transaction: Transaction,
    ) -> Result<Transaction> {
        transaction.updated_at = Utc::now();

        let transaction_db: TransactionDB = transaction.into();

        let row = diesel::update(transactions::table.find(&transaction_db.id))
            .set(&transaction_db)
            .get_result::<TransactionDB>(conn)?;

        Transaction::try_from(row)
    }

    /// Marks an active transaction as deleted
    pub fn soft_delete(
        &self,
        conn: &mut SqliteConnection,
        owner_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction> {
        let now = Utc::now().naive_utc();

        let row = diesel::update(
            transactions::table
                .filter(transactions::id.eq(transaction_id))
                .filter(transactions::owner_id.eq(owner_id))
                .filter(transactions::deleted_at.is_null()),
        )
        .set((
            transactions::deleted_at.eq(Some(now)),
            transactions::updated_at.eq(now),
        ))
        .get_result::<TransactionDB>(conn)?;

        Transaction::try_from(row)
    }

    /// Fetches ticker, name and type of an instrument, including
    /// soft-deleted ones, for response assembly
    pub fn instrument_meta(
        &self,
        conn: &mut SqliteConnection,
        instrument_id: &str,
    ) -> Result<(String, String, String)> {
        let meta = instruments::table
            .find(instrument_id)
            .select((
                instruments::ticker,
                instruments::name,
                instruments::instrument_type,
            ))
            .first::<(String, String, String)>(conn)?;

        Ok(meta)
    }

    fn connection(&self) -> Result<DbConnection> {
        get_connection(&self.pool).map_err(|e| LedgerError::DatabaseError(e.to_string()))
    }
}
