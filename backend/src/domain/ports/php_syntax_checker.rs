//! Driven port for PHP syntax validation.

use async_trait::async_trait;

use super::define_port_error;

/// Result of a syntax check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxCheck {
    /// The code parsed.
    Valid,
    /// The code did not parse; `output` is the checker's diagnostic text.
    Invalid {
        /// Checker output.
        output: String,
    },
}

define_port_error! {
    /// Errors raised when the checker itself cannot run.
    pub enum PhpSyntaxCheckerError {
        /// The interpreter could not be started.
        Unavailable { message: String } => "php syntax checker unavailable: {message}",
        /// Preparing the scratch file failed.
        Io { message: String } => "php syntax check failed: {message}",
    }
}

/// Port for linting PHP source before it is written.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhpSyntaxChecker: Send + Sync {
    /// Check `code` for syntax errors.
    async fn check(&self, code: &str) -> Result<SyntaxCheck, PhpSyntaxCheckerError>;
}

/// Fixture checker accepting everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePhpSyntaxChecker;

#[async_trait]
impl PhpSyntaxChecker for FixturePhpSyntaxChecker {
    async fn check(&self, _code: &str) -> Result<SyntaxCheck, PhpSyntaxCheckerError> {
        Ok(SyntaxCheck::Valid)
    }
}
