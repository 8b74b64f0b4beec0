//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **llm**: Anthropic Messages API client (reqwest)
//! - **source_hosting**: GitHub REST client (reqwest)
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **memory**: in-memory repositories for development and tests
//! - **filesystem**: cap-std plugin workspace and code file store
//! - **php_lint**: `php -l` syntax checker
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod filesystem;
pub mod llm;
pub mod memory;
pub mod persistence;
pub mod php_lint;
pub mod source_hosting;
