//! Driving port for error analysis and patching.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Error, ErrorAnalysis, ErrorReport};

/// A fix to write over an existing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRequest {
    /// Absolute path of the file to replace.
    pub file: String,
    /// Replacement contents.
    pub code_fix: String,
}

/// Outcome of a successful patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchOutcome {
    /// Patched file.
    pub file_path: String,
    /// Copy of the previous contents.
    pub backup_path: String,
}

/// Domain use-case port for the error debugger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ErrorDebugger: Send + Sync {
    /// Ask the model to explain `report`.
    async fn analyse(&self, report: ErrorReport) -> Result<ErrorAnalysis, Error>;

    /// Back up and overwrite a file with a suggested fix.
    async fn patch(&self, request: PatchRequest) -> Result<PatchOutcome, Error>;
}
