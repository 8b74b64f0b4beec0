//! Settings administration service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{SettingsAdmin, SettingsRepository};
use crate::domain::service_support::{load_options, map_settings_error};
use crate::domain::{Error, OptionsUpdate, OptionsView};

/// Service implementing [`SettingsAdmin`].
#[derive(Clone)]
pub struct SettingsService<S> {
    repo: Arc<S>,
}

impl<S> SettingsService<S> {
    /// Create a new service.
    pub fn new(repo: Arc<S>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<S> SettingsAdmin for SettingsService<S>
where
    S: SettingsRepository,
{
    async fn view(&self) -> Result<OptionsView, Error> {
        Ok(load_options(self.repo.as_ref()).await?.view())
    }

    async fn update(&self, update: OptionsUpdate) -> Result<OptionsView, Error> {
        let current = load_options(self.repo.as_ref()).await?;
        let next = current.merged(update).map_err(|error| {
            Error::invalid_request(error.to_string())
                .with_details(json!({ "field": error.field(), "code": "invalid_value" }))
        })?;
        self.repo.save(&next).await.map_err(map_settings_error)?;
        info!(
            php_injection = next.enable_php_injection,
            max_history_items = next.max_history_items.get(),
            "settings updated"
        );
        Ok(next.view())
    }
}
