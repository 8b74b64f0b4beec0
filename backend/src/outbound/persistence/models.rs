//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::warn;

use super::schema::{history, settings, snippets};
use crate::domain::{HistoryEntry, Language, Snippet};

/// Row struct for reading from the snippets table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = snippets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SnippetRow {
    pub id: i64,
    pub title: String,
    pub language: String,
    pub code: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new snippets.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = snippets)]
pub(crate) struct NewSnippetRow<'a> {
    pub title: &'a str,
    pub language: &'a str,
    pub code: &'a str,
    pub description: Option<&'a str>,
}

/// Row struct for reading from the history table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HistoryRow {
    pub id: i64,
    pub prompt: String,
    pub response: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new history entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = history)]
pub(crate) struct NewHistoryRow<'a> {
    pub prompt: &'a str,
    pub response: &'a str,
    pub language: &'a str,
}

/// Insertable struct for the options row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = settings)]
pub(crate) struct NewSettingsRow<'a> {
    pub id: i16,
    pub options: &'a serde_json::Value,
}

/// Parse a stored language tag, keeping unrecognised values verbatim.
fn stored_language(raw: String, table: &'static str, id: i64) -> Language {
    match Language::parse(&raw) {
        Ok(language) => language,
        Err(error) => {
            warn!(%table, id, value = %raw, %error, "unparseable language tag in storage");
            Language::Other(raw)
        }
    }
}

impl From<SnippetRow> for Snippet {
    fn from(row: SnippetRow) -> Self {
        Self {
            language: stored_language(row.language, "snippets", row.id),
            id: row.id,
            title: row.title,
            code: row.code,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        Self {
            language: stored_language(row.language, "history", row.id),
            id: row.id,
            prompt: row.prompt,
            response: row.response,
            created_at: row.created_at,
        }
    }
}
