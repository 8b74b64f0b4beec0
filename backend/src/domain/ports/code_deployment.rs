//! Driving port for PHP injection and code export.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Error, InjectionTarget, Language};

/// PHP code to inject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectRequest {
    /// Code as generated.
    pub code: String,
    /// Destination.
    pub target: InjectionTarget,
}

/// Outcome of a successful injection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectionOutcome {
    /// File written.
    pub file_path: String,
    /// Whether the file was created rather than appended to.
    pub is_new_file: bool,
    /// Backup of the previous contents when appending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<String>,
}

/// Code to export as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Code text.
    pub code: String,
    /// Language, selecting the extension.
    pub language: Language,
    /// Requested file name; sanitised before use.
    pub filename: String,
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportOutcome {
    /// File written.
    pub file_path: String,
    /// Final file name.
    pub filename: String,
}

/// Domain use-case port for writing code to the host.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeDeployment: Send + Sync {
    /// Syntax-check and inject PHP code, if injection is enabled.
    async fn inject(&self, request: InjectRequest) -> Result<InjectionOutcome, Error>;

    /// Write code to the exports directory.
    async fn export(&self, request: ExportRequest) -> Result<ExportOutcome, Error>;
}
