//! Driving port for viewing and updating the options bag.

use async_trait::async_trait;

use crate::domain::{Error, OptionsUpdate, OptionsView};

/// Domain use-case port for settings administration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsAdmin: Send + Sync {
    /// Current options with secrets redacted.
    async fn view(&self) -> Result<OptionsView, Error>;

    /// Merge `update` and return the redacted result.
    async fn update(&self, update: OptionsUpdate) -> Result<OptionsView, Error>;
}
