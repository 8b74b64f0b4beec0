//! In-memory repositories for development without PostgreSQL and for tests.
//!
//! Ordering and retention match the Diesel adapters: newest first by
//! creation time, ties broken by id.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    HistoryRepository, HistoryRepositoryError, SettingsRepository, SettingsRepositoryError,
    SnippetRepository, SnippetRepositoryError,
};
use crate::domain::{HistoryEntry, NewHistoryEntry, NewSnippet, Options, RetentionLimit, Snippet};

fn lock<'a, T, E>(
    mutex: &'a Mutex<T>,
    connection: impl FnOnce(&'static str) -> E,
) -> Result<MutexGuard<'a, T>, E> {
    mutex.lock().map_err(|_| connection("in-memory store poisoned"))
}

struct Rows<T> {
    next_id: i64,
    rows: Vec<T>,
}

impl<T> Default for Rows<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: Vec::new(),
        }
    }
}

impl<T> Rows<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Snippet store backed by a vector.
pub struct MemorySnippetRepository {
    clock: Arc<dyn Clock>,
    state: Mutex<Rows<Snippet>>,
}

impl MemorySnippetRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(Rows::default()),
        }
    }
}

#[async_trait]
impl SnippetRepository for MemorySnippetRepository {
    async fn insert(&self, snippet: &NewSnippet) -> Result<Snippet, SnippetRepositoryError> {
        let mut state = lock(&self.state, SnippetRepositoryError::connection)?;
        let id = state.allocate_id();
        let stored = snippet.clone().into_snippet(id, self.clock.utc());
        state.rows.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Snippet>, SnippetRepositoryError> {
        let state = lock(&self.state, SnippetRepositoryError::connection)?;
        let mut rows = state.rows.clone();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(rows)
    }

    async fn delete(&self, id: i64) -> Result<bool, SnippetRepositoryError> {
        let mut state = lock(&self.state, SnippetRepositoryError::connection)?;
        let before = state.rows.len();
        state.rows.retain(|row| row.id != id);
        Ok(state.rows.len() < before)
    }
}

/// History store backed by a vector.
pub struct MemoryHistoryRepository {
    clock: Arc<dyn Clock>,
    state: Mutex<Rows<HistoryEntry>>,
}

impl MemoryHistoryRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(Rows::default()),
        }
    }
}

#[async_trait]
impl HistoryRepository for MemoryHistoryRepository {
    async fn insert(&self, entry: &NewHistoryEntry) -> Result<HistoryEntry, HistoryRepositoryError> {
        let mut state = lock(&self.state, HistoryRepositoryError::connection)?;
        let stored = HistoryEntry {
            id: state.allocate_id(),
            prompt: entry.prompt.clone(),
            response: entry.response.clone(),
            language: entry.language.clone(),
            created_at: self.clock.utc(),
        };
        state.rows.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>, HistoryRepositoryError> {
        let state = lock(&self.state, HistoryRepositoryError::connection)?;
        let mut rows = state.rows.clone();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(rows)
    }

    async fn trim_to(&self, keep: RetentionLimit) -> Result<usize, HistoryRepositoryError> {
        let mut state = lock(&self.state, HistoryRepositoryError::connection)?;
        state
            .rows
            .sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        let keep = usize::try_from(keep.get()).unwrap_or(usize::MAX);
        let removed = state.rows.len().saturating_sub(keep);
        state.rows.truncate(keep);
        Ok(removed)
    }
}

/// Options bag held in memory; starts from the defaults.
#[derive(Default)]
pub struct MemorySettingsRepository {
    options: Mutex<Options>,
}

impl MemorySettingsRepository {
    pub fn new(options: Options) -> Self {
        Self {
            options: Mutex::new(options),
        }
    }
}

#[async_trait]
impl SettingsRepository for MemorySettingsRepository {
    async fn load(&self) -> Result<Options, SettingsRepositoryError> {
        Ok(lock(&self.options, SettingsRepositoryError::connection)?.clone())
    }

    async fn save(&self, options: &Options) -> Result<(), SettingsRepositoryError> {
        *lock(&self.options, SettingsRepositoryError::connection)? = options.clone();
        Ok(())
    }
}
