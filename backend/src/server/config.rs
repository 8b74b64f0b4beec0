//! Deployment settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `DEVASSIST_*` environment variables and an
//! optional config file. The mutable options bag is not configured here; it
//! lives in the settings table.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

use devassist::domain::{
    DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_FILES, DeploymentPaths, ParseLimits, Secret,
};
use devassist::outbound::llm::AnthropicModelSettings;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PHP_BINARY: &str = "php";
const DEFAULT_LLM_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
const DEFAULT_PLUGINS_ROOT: &str = "data/plugins";
const DEFAULT_UPLOADS_ROOT: &str = "data/uploads";
const DEFAULT_THEME_FUNCTIONS: &str = "data/theme/functions.php";

/// Configuration values for one server process.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DEVASSIST")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-memory repositories are used when absent.
    pub database_url: Option<String>,
    /// Directory receiving generated plugins.
    pub plugins_root: Option<PathBuf>,
    /// Root for exports and backups.
    pub uploads_root: Option<PathBuf>,
    /// Target of the `functions` injection mode.
    pub theme_functions_path: Option<PathBuf>,
    /// PHP interpreter used for `-l` syntax checks.
    pub php_binary: Option<PathBuf>,
    pub llm_endpoint: Option<String>,
    pub llm_model: Option<String>,
    pub llm_max_tokens: Option<u32>,
    pub llm_temperature: Option<f32>,
    /// Seconds before a model call is abandoned.
    #[ortho_config(default = 60)]
    pub llm_timeout_secs: u64,
    pub github_api_base: Option<String>,
    #[ortho_config(default = 30)]
    pub github_timeout_secs: u64,
    /// Bearer token guarding `/api/v1`.
    pub admin_token: Option<String>,
    pub max_generated_files: Option<usize>,
    pub max_generated_file_bytes: Option<usize>,
}

/// Problems found while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("bind_addr {value:?} is not a socket address")]
    BindAddr { value: String },
    #[error("{field} {value:?} is not a valid URL: {message}")]
    Url {
        field: &'static str,
        value: String,
        message: String,
    },
    #[error("admin_token must be set (DEVASSIST_ADMIN_TOKEN)")]
    MissingAdminToken,
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|err| SettingsError::Url {
        field,
        value: value.to_owned(),
        message: err.to_string(),
    })
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    /// Configured admin token; a blank value counts as missing.
    pub fn admin_token(&self) -> Result<Secret, SettingsError> {
        self.admin_token
            .as_deref()
            .map(Secret::new)
            .filter(Secret::is_set)
            .ok_or(SettingsError::MissingAdminToken)
    }

    pub fn deployment_paths(&self) -> DeploymentPaths {
        DeploymentPaths {
            plugins_root: self
                .plugins_root
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PLUGINS_ROOT)),
            uploads_root: self
                .uploads_root
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOADS_ROOT)),
            theme_functions_path: self
                .theme_functions_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_THEME_FUNCTIONS)),
        }
    }

    pub fn php_binary(&self) -> PathBuf {
        self.php_binary
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PHP_BINARY))
    }

    pub fn llm_endpoint(&self) -> Result<Url, SettingsError> {
        parse_url(
            "llm_endpoint",
            self.llm_endpoint.as_deref().unwrap_or(DEFAULT_LLM_ENDPOINT),
        )
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    /// Model parameters, falling back to the adapter defaults per key.
    pub fn llm_model_settings(&self) -> AnthropicModelSettings {
        let defaults = AnthropicModelSettings::default();
        AnthropicModelSettings {
            model: self.llm_model.clone().unwrap_or(defaults.model),
            max_tokens: self.llm_max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.llm_temperature.unwrap_or(defaults.temperature),
        }
    }

    pub fn github_api_base(&self) -> Result<Url, SettingsError> {
        parse_url(
            "github_api_base",
            self.github_api_base
                .as_deref()
                .unwrap_or(DEFAULT_GITHUB_API_BASE),
        )
    }

    pub fn github_timeout(&self) -> Duration {
        Duration::from_secs(self.github_timeout_secs)
    }

    pub fn parse_limits(&self) -> ParseLimits {
        ParseLimits {
            max_files: self.max_generated_files.unwrap_or(DEFAULT_MAX_FILES),
            max_file_bytes: self
                .max_generated_file_bytes
                .unwrap_or(DEFAULT_MAX_FILE_BYTES),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "DEVASSIST_BIND_ADDR",
        "DEVASSIST_DATABASE_URL",
        "DEVASSIST_ADMIN_TOKEN",
        "DEVASSIST_LLM_MODEL",
        "DEVASSIST_MAX_GENERATED_FILES",
        "DEVASSIST_PLUGINS_ROOT",
        "DEVASSIST_LLM_TIMEOUT_SECS",
        "DEVASSIST_GITHUB_TIMEOUT_SECS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("devassist")]).expect("config should load")
    }

    #[rstest]
    fn defaults_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url.is_none());
        assert!(matches!(
            settings.admin_token(),
            Err(SettingsError::MissingAdminToken)
        ));
        assert_eq!(settings.llm_model_settings(), AnthropicModelSettings::default());
        assert_eq!(settings.parse_limits(), ParseLimits::default());
        assert_eq!(
            settings.llm_endpoint().expect("default endpoint").as_str(),
            DEFAULT_LLM_ENDPOINT
        );
        assert_eq!(settings.github_timeout(), Duration::from_secs(30));
        assert_eq!(settings.llm_timeout(), Duration::from_secs(60));
    }

    #[rstest]
    fn timeouts_can_be_overridden() {
        let _guard = lock_env([
            ("DEVASSIST_LLM_TIMEOUT_SECS", Some("5".to_owned())),
            ("DEVASSIST_GITHUB_TIMEOUT_SECS", None),
        ]);
        let settings = load_from_empty_args();
        assert_eq!(settings.llm_timeout(), Duration::from_secs(5));
        assert_eq!(settings.github_timeout(), Duration::from_secs(30));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("DEVASSIST_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "DEVASSIST_DATABASE_URL",
                Some("postgres://localhost/devassist".to_owned()),
            ),
            ("DEVASSIST_ADMIN_TOKEN", Some(" s3cret ".to_owned())),
            ("DEVASSIST_LLM_MODEL", Some("claude-test".to_owned())),
            ("DEVASSIST_MAX_GENERATED_FILES", Some("3".to_owned())),
            ("DEVASSIST_PLUGINS_ROOT", Some("/srv/plugins".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address").port(),
            9000
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/devassist")
        );
        assert_eq!(settings.admin_token().expect("token").expose(), "s3cret");
        assert_eq!(settings.llm_model_settings().model, "claude-test");
        assert_eq!(settings.llm_model_settings().max_tokens, 4000);
        assert_eq!(settings.parse_limits().max_files, 3);
        assert_eq!(
            settings.deployment_paths().plugins_root,
            PathBuf::from("/srv/plugins")
        );
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));
        let settings = AppSettings {
            bind_addr: Some("nowhere".to_owned()),
            ..load_from_empty_args()
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }
}
