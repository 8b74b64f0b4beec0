//! PostgreSQL-backed `HistoryRepository` implementation using Diesel ORM.
//!
//! Retention trimming keeps the newest rows by `created_at`, breaking ties on
//! `id`, and deletes everything past the limit.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{HistoryRepository, HistoryRepositoryError};
use crate::domain::{HistoryEntry, NewHistoryEntry, RetentionLimit};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{HistoryRow, NewHistoryRow};
use super::pool::{DbPool, PoolError};
use super::schema::history;

/// Diesel-backed history store.
#[derive(Clone)]
pub struct DieselHistoryRepository {
    pool: DbPool,
}

impl DieselHistoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> HistoryRepositoryError {
    map_pool_error(error, HistoryRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> HistoryRepositoryError {
    map_diesel_error(
        error,
        HistoryRepositoryError::query,
        HistoryRepositoryError::connection,
    )
}

#[async_trait]
impl HistoryRepository for DieselHistoryRepository {
    async fn insert(&self, entry: &NewHistoryEntry) -> Result<HistoryEntry, HistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewHistoryRow {
            prompt: &entry.prompt,
            response: &entry.response,
            language: entry.language.as_str(),
        };
        let stored: HistoryRow = diesel::insert_into(history::table)
            .values(&row)
            .returning(HistoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(stored.into())
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>, HistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<HistoryRow> = history::table
            .select(HistoryRow::as_select())
            .order((history::created_at.desc(), history::id.desc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }

    async fn trim_to(&self, keep: RetentionLimit) -> Result<usize, HistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let surplus: Vec<i64> = history::table
            .select(history::id)
            .order((history::created_at.desc(), history::id.desc()))
            .offset(i64::from(keep.get()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        if surplus.is_empty() {
            return Ok(0);
        }
        diesel::delete(history::table.filter(history::id.eq_any(&surplus)))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)
    }
}
