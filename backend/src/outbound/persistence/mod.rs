//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module; connections come from a `bb8` pool driven by
//! `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use devassist::outbound::persistence::{DbPool, DieselSnippetRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/devassist")).await?;
//! let snippets = DieselSnippetRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_history_repository;
mod diesel_settings_repository;
mod diesel_snippet_repository;
mod migrations;
mod models;
mod pool;
mod schema;
mod settings_document;

pub use diesel_history_repository::DieselHistoryRepository;
pub use diesel_settings_repository::DieselSettingsRepository;
pub use diesel_snippet_repository::DieselSnippetRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
