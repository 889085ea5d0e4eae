use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::constants::DECIMAL_PRECISION;
use crate::db::{get_connection, DbConnection};
use crate::schema::{instruments, positions};

use super::positions_errors::{PositionError, Result};
use super::positions_model::{Position, PositionDB, PositionDetails, PositionKey};

/// Repository for the derived position snapshots
pub struct PositionRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl PositionRepository {
    /// Creates a new PositionRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Reads the snapshot of one bucket. Runs on the caller's connection so
    /// it can participate in a write transaction.
    pub fn get_by_key(
        &self,
        conn: &mut SqliteConnection,
        key: &PositionKey,
    ) -> Result<Option<Position>> {
        let result = positions::table
            .filter(positions::owner_id.eq(&key.owner_id))
            .filter(positions::instrument_id.eq(&key.instrument_id))
            .first::<PositionDB>(conn)
            .optional()?;

        Ok(result.map(Position::from))
    }

    /// Writes the freshly computed snapshot of a bucket, replacing any
    /// previous one. The row id and creation date survive replacement.
    pub fn upsert(&self, conn: &mut SqliteConnection, position: &Position) -> Result<()> {
        let now = Utc::now().naive_utc();
        let row = PositionDB {
            id: Uuid::new_v4().to_string(),
            owner_id: position.owner_id.clone(),
            instrument_id: position.instrument_id.clone(),
            quantity: position.quantity.round_dp(DECIMAL_PRECISION).to_string(),
            average_cost: position
                .average_cost
                .round_dp(DECIMAL_PRECISION)
                .to_string(),
            total_invested: position
                .total_invested
                .round_dp(DECIMAL_PRECISION)
                .to_string(),
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(positions::table)
            .values(&row)
            .on_conflict((positions::owner_id, positions::instrument_id))
            .do_update()
            .set((
                positions::quantity.eq(&row.quantity),
                positions::average_cost.eq(&row.average_cost),
                positions::total_invested.eq(&row.total_invested),
                positions::updated_at.eq(now),
            ))
            .execute(conn)?;

        Ok(())
    }

    /// Drops the snapshot of a bucket. Liquidated buckets have no row.
    pub fn delete_by_key(&self, conn: &mut SqliteConnection, key: &PositionKey) -> Result<usize> {
        let deleted = diesel::delete(
            positions::table
                .filter(positions::owner_id.eq(&key.owner_id))
                .filter(positions::instrument_id.eq(&key.instrument_id)),
        )
        .execute(conn)?;

        Ok(deleted)
    }

    /// Retrieves one position row by its ID, scoped to its owner
    pub fn get_by_id(&self, owner_id: &str, position_id: &str) -> Result<PositionDetails> {
        let mut conn = self.connection()?;

        let (row, ticker, name, instrument_type) = positions::table
            .inner_join(instruments::table)
            .filter(positions::id.eq(position_id))
            .filter(positions::owner_id.eq(owner_id))
            .select((
                PositionDB::as_select(),
                instruments::ticker,
                instruments::name,
                instruments::instrument_type,
            ))
            .first::<(PositionDB, String, String, String)>(&mut conn)?;

        Ok(PositionDetails::from_row(row, ticker, name, instrument_type))
    }

    /// Lists all positions of an owner, largest invested capital first
    pub fn list(&self, owner_id: &str) -> Result<Vec<PositionDetails>> {
        let mut conn = self.connection()?;

        let rows = positions::table
            .inner_join(instruments::table)
            .filter(positions::owner_id.eq(owner_id))
            .select((
                PositionDB::as_select(),
                instruments::ticker,
                instruments::name,
                instruments::instrument_type,
            ))
            .load::<(PositionDB, String, String, String)>(&mut conn)?;

        Ok(Self::sorted_details(rows))
    }

    /// Lists the positions of an owner filtered by instrument type
    pub fn list_by_type(
        &self,
        owner_id: &str,
        instrument_type: &str,
    ) -> Result<Vec<PositionDetails>> {
        let mut conn = self.connection()?;

        let rows = positions::table
            .inner_join(instruments::table)
            .filter(positions::owner_id.eq(owner_id))
            .filter(instruments::instrument_type.eq(instrument_type))
            .select((
                PositionDB::as_select(),
                instruments::ticker,
                instruments::name,
                instruments::instrument_type,
            ))
            .load::<(PositionDB, String, String, String)>(&mut conn)?;

        Ok(Self::sorted_details(rows))
    }

    // Invested amounts live in TEXT columns, so the numeric ordering happens
    // here rather than in SQL.
    fn sorted_details(rows: Vec<(PositionDB, String, String, String)>) -> Vec<PositionDetails> {
        let mut details: Vec<PositionDetails> = rows
            .into_iter()
            .map(|(row, ticker, name, instrument_type)| {
                PositionDetails::from_row(row, ticker, name, instrument_type)
            })
            .collect();
        details.sort_by(|a, b| b.total_invested.cmp(&a.total_invested));
        details
    }

    fn connection(&self) -> Result<DbConnection> {
        get_connection(&self.pool).map_err(|e| PositionError::DatabaseError(e.to_string()))
    }
}
