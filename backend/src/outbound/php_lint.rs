//! PHP syntax checking by running `php -l` on a scratch file.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{PhpSyntaxChecker, PhpSyntaxCheckerError, SyntaxCheck};

/// Checker shelling out to a PHP interpreter.
#[derive(Debug, Clone)]
pub struct ProcessPhpLinter {
    binary: PathBuf,
}

impl ProcessPhpLinter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

fn lint(binary: &Path, code: &str) -> Result<SyntaxCheck, PhpSyntaxCheckerError> {
    let mut scratch = tempfile::Builder::new()
        .prefix("devassist-lint-")
        .suffix(".php")
        .tempfile()
        .map_err(|error| PhpSyntaxCheckerError::io(error.to_string()))?;
    scratch
        .write_all(code.as_bytes())
        .and_then(|()| scratch.flush())
        .map_err(|error| PhpSyntaxCheckerError::io(error.to_string()))?;

    let output = Command::new(binary)
        .arg("-l")
        .arg(scratch.path())
        .output()
        .map_err(|error| match error.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                PhpSyntaxCheckerError::unavailable(format!("{}: {error}", binary.display()))
            }
            _ => PhpSyntaxCheckerError::io(error.to_string()),
        })?;

    if output.status.success() {
        return Ok(SyntaxCheck::Valid);
    }
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    debug!(status = ?output.status.code(), "php lint rejected code");
    Ok(SyntaxCheck::Invalid {
        output: text.trim().to_owned(),
    })
}

#[async_trait]
impl PhpSyntaxChecker for ProcessPhpLinter {
    async fn check(&self, code: &str) -> Result<SyntaxCheck, PhpSyntaxCheckerError> {
        let binary = self.binary.clone();
        let code = code.to_owned();
        tokio::task::spawn_blocking(move || lint(&binary, &code))
            .await
            .map_err(|error| PhpSyntaxCheckerError::io(error.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero_exit("true", true)]
    #[case::non_zero_exit("false", false)]
    #[tokio::test]
    async fn exit_status_decides_validity(#[case] binary: &str, #[case] valid: bool) {
        let result = ProcessPhpLinter::new(binary)
            .check("<?php echo 1;")
            .await
            .expect("checker runs");
        assert_eq!(result == SyntaxCheck::Valid, valid);
    }

    #[tokio::test]
    async fn missing_interpreter_is_unavailable() {
        let error = ProcessPhpLinter::new("/nonexistent/devassist-php")
            .check("<?php echo 1;")
            .await
            .expect_err("no interpreter");
        assert!(matches!(error, PhpSyntaxCheckerError::Unavailable { .. }));
    }
}
