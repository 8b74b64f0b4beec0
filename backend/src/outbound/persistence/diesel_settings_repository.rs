//! PostgreSQL-backed `SettingsRepository` storing the options bag as JSONB.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::Options;
use crate::domain::ports::{SettingsRepository, SettingsRepositoryError};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewSettingsRow;
use super::pool::{DbPool, PoolError};
use super::schema::settings;
use super::settings_document::OptionsDocument;

const SETTINGS_ROW_ID: i16 = 1;

/// Diesel-backed options store; a missing row reads as the defaults.
#[derive(Clone)]
pub struct DieselSettingsRepository {
    pool: DbPool,
}

impl DieselSettingsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> SettingsRepositoryError {
    map_pool_error(error, SettingsRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> SettingsRepositoryError {
    map_diesel_error(
        error,
        SettingsRepositoryError::query,
        SettingsRepositoryError::connection,
    )
}

pub(crate) fn decode_options(value: serde_json::Value) -> Result<Options, SettingsRepositoryError> {
    let document: OptionsDocument = serde_json::from_value(value)
        .map_err(|error| SettingsRepositoryError::corrupt(error.to_string()))?;
    Options::try_from(document).map_err(SettingsRepositoryError::corrupt)
}

#[async_trait]
impl SettingsRepository for DieselSettingsRepository {
    async fn load(&self) -> Result<Options, SettingsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let stored: Option<serde_json::Value> = settings::table
            .filter(settings::id.eq(SETTINGS_ROW_ID))
            .select(settings::options)
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        stored.map_or_else(|| Ok(Options::default()), decode_options)
    }

    async fn save(&self, options: &Options) -> Result<(), SettingsRepositoryError> {
        let value = serde_json::to_value(OptionsDocument::from(options))
            .map_err(|error| SettingsRepositoryError::query(error.to_string()))?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(settings::table)
            .values(&NewSettingsRow {
                id: SETTINGS_ROW_ID,
                options: &value,
            })
            .on_conflict(settings::id)
            .do_update()
            .set((
                settings::options.eq(excluded(settings::options)),
                settings::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }
}
