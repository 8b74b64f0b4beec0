//! PostgreSQL-backed `SnippetRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SnippetRepository, SnippetRepositoryError};
use crate::domain::{NewSnippet, Snippet};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewSnippetRow, SnippetRow};
use super::pool::{DbPool, PoolError};
use super::schema::snippets;

/// Diesel-backed snippet store.
#[derive(Clone)]
pub struct DieselSnippetRepository {
    pool: DbPool,
}

impl DieselSnippetRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> SnippetRepositoryError {
    map_pool_error(error, SnippetRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> SnippetRepositoryError {
    map_diesel_error(
        error,
        SnippetRepositoryError::query,
        SnippetRepositoryError::connection,
    )
}

#[async_trait]
impl SnippetRepository for DieselSnippetRepository {
    async fn insert(&self, snippet: &NewSnippet) -> Result<Snippet, SnippetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewSnippetRow {
            title: snippet.title(),
            language: snippet.language().as_str(),
            code: snippet.code(),
            description: snippet.description(),
        };
        let stored: SnippetRow = diesel::insert_into(snippets::table)
            .values(&row)
            .returning(SnippetRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(stored.into())
    }

    async fn list(&self) -> Result<Vec<Snippet>, SnippetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<SnippetRow> = snippets::table
            .select(SnippetRow::as_select())
            .order((snippets::created_at.desc(), snippets::id.desc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Snippet::from).collect())
    }

    async fn delete(&self, id: i64) -> Result<bool, SnippetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(snippets::table.filter(snippets::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}
