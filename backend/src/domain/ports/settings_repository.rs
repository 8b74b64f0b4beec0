//! Driven port for the options bag.
//!
//! Implementations return [`Options::default`] until something is saved.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::Options;

define_port_error! {
    /// Errors raised by settings repositories.
    pub enum SettingsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "settings repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "settings repository query failed: {message}",
        /// The stored document could not be decoded.
        Corrupt { message: String } => "stored settings are unreadable: {message}",
    }
}

/// Port for reading and replacing the options bag.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load the stored options or the defaults.
    async fn load(&self) -> Result<Options, SettingsRepositoryError>;

    /// Replace the stored options.
    async fn save(&self, options: &Options) -> Result<(), SettingsRepositoryError>;
}

/// Fixture repository that always yields the given options and discards saves.
#[derive(Debug, Clone, Default)]
pub struct FixtureSettingsRepository {
    options: Options,
}

impl FixtureSettingsRepository {
    /// Serve `options` from every load.
    pub fn new(options: Options) -> Self {
        Self { options }
    }
}

#[async_trait]
impl SettingsRepository for FixtureSettingsRepository {
    async fn load(&self) -> Result<Options, SettingsRepositoryError> {
        Ok(self.options.clone())
    }

    async fn save(&self, _options: &Options) -> Result<(), SettingsRepositoryError> {
        Ok(())
    }
}
