//! PHP injection and code export.
//!
//! Injection is a guarded linear sequence: gate, resolve target, syntax
//! check, back up, write. Any failure stops the sequence; nothing is undone.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    CodeDeployment, CodeFileStore, ExportOutcome, ExportRequest, InjectRequest, InjectionOutcome,
    PhpSyntaxChecker, SettingsRepository,
};
use crate::domain::service_support::{
    back_up, ensure_valid_php, load_options, map_file_store_error, missing_field,
};
use crate::domain::{
    DeploymentPaths, Error, InjectionTarget, append_code, custom_file_name,
    extract_target_comment, export_file_name, new_plugin_name, new_plugin_source,
};

const INJECTION_DISABLED: &str =
    "PHP code injection is disabled. Enable it in the plugin settings first.";

/// Service implementing [`CodeDeployment`].
#[derive(Clone)]
pub struct CodeDeploymentService<F, C, S> {
    files: Arc<F>,
    checker: Arc<C>,
    settings_repo: Arc<S>,
    paths: DeploymentPaths,
    clock: Arc<dyn Clock>,
}

impl<F, C, S> CodeDeploymentService<F, C, S> {
    /// Create a new service.
    pub fn new(
        files: Arc<F>,
        checker: Arc<C>,
        settings_repo: Arc<S>,
        paths: DeploymentPaths,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            files,
            checker,
            settings_repo,
            paths,
            clock,
        }
    }
}

/// Resolved destination of one injection.
struct Placement {
    path: PathBuf,
    code: String,
    is_new_file: bool,
}

impl<F, C, S> CodeDeploymentService<F, C, S>
where
    F: CodeFileStore,
    C: PhpSyntaxChecker,
    S: SettingsRepository,
{
    async fn exists(&self, path: &Path) -> Result<bool, Error> {
        self.files.exists(path).await.map_err(map_file_store_error)
    }

    async fn place(
        &self,
        target: InjectionTarget,
        code: String,
        timestamp: i64,
    ) -> Result<Placement, Error> {
        match target {
            InjectionTarget::Functions => {
                let path = self.paths.theme_functions_path.clone();
                if !self.exists(&path).await? {
                    return Err(Error::not_found(format!(
                        "Theme functions file does not exist: {}",
                        path.display()
                    )));
                }
                Ok(Placement {
                    path,
                    code,
                    is_new_file: false,
                })
            }
            InjectionTarget::NewPlugin => {
                let name = new_plugin_name(timestamp);
                let path = self
                    .paths
                    .plugins_root
                    .join(&name)
                    .join(format!("{name}.php"));
                if self.exists(&path).await? {
                    return Err(Error::conflict(format!("{name} already exists.")));
                }
                Ok(Placement {
                    path,
                    code: new_plugin_source(timestamp, &code),
                    is_new_file: true,
                })
            }
            InjectionTarget::CustomFile => {
                let (directive, code) = extract_target_comment(&code);
                let path = directive.map_or_else(
                    || self.paths.uploads_root.join(custom_file_name(timestamp)),
                    PathBuf::from,
                );
                let is_new_file = !self.exists(&path).await?;
                Ok(Placement {
                    path,
                    code,
                    is_new_file,
                })
            }
        }
    }
}

#[async_trait]
impl<F, C, S> CodeDeployment for CodeDeploymentService<F, C, S>
where
    F: CodeFileStore,
    C: PhpSyntaxChecker,
    S: SettingsRepository,
{
    async fn inject(&self, request: InjectRequest) -> Result<InjectionOutcome, Error> {
        let options = load_options(self.settings_repo.as_ref()).await?;
        if !options.enable_php_injection {
            return Err(Error::forbidden(INJECTION_DISABLED));
        }
        if request.code.trim().is_empty() {
            return Err(missing_field("code", "code must not be empty"));
        }

        let timestamp = self.clock.utc().timestamp();
        let placement = self.place(request.target, request.code, timestamp).await?;
        ensure_valid_php(self.checker.as_ref(), &placement.code, "code").await?;

        let backup_path = if placement.is_new_file {
            self.files
                .write(&placement.path, &placement.code)
                .await
                .map_err(map_file_store_error)?;
            None
        } else {
            let backup = back_up(self.files.as_ref(), &self.paths, &placement.path, timestamp).await?;
            let existing = self
                .files
                .read(&placement.path)
                .await
                .map_err(map_file_store_error)?;
            self.files
                .write(&placement.path, &append_code(&existing, &placement.code))
                .await
                .map_err(map_file_store_error)?;
            Some(backup.display().to_string())
        };

        info!(
            injection_target = ?request.target,
            file = %placement.path.display(),
            is_new_file = placement.is_new_file,
            "injected PHP code"
        );
        Ok(InjectionOutcome {
            file_path: placement.path.display().to_string(),
            is_new_file: placement.is_new_file,
            backup_path,
        })
    }

    async fn export(&self, request: ExportRequest) -> Result<ExportOutcome, Error> {
        if request.code.trim().is_empty() {
            return Err(missing_field("code", "code must not be empty"));
        }
        let filename = export_file_name(&request.filename, &request.language);
        let path = self.paths.exports_dir().join(&filename);
        self.files
            .write(&path, &request.code)
            .await
            .map_err(map_file_store_error)?;
        info!(file = %path.display(), "exported code");
        Ok(ExportOutcome {
            file_path: path.display().to_string(),
            filename,
        })
    }
}

#[cfg(test)]
#[path = "code_deployment_service_tests.rs"]
mod tests;

