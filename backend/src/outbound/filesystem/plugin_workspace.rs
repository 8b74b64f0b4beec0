//! Capability-scoped plugin workspace rooted at the plugins directory.
//!
//! Materialisation stages every file in a hidden sibling directory
//! `.tmp-<slug>-<uuid>`, then claims `<slug>` with `mkdir` and moves the
//! staged entries into it. `mkdir` fails if anything, even an empty
//! directory, already holds the name, so a concurrent publisher wins and
//! this attempt reports a collision. The stage directory is always removed.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;
use uuid::Uuid;

use super::archive::write_archive;
use crate::domain::ports::{PluginWorkspace, PluginWorkspaceError};
use crate::domain::{PluginFiles, PluginSlug};

/// Plugin workspace writing below `plugins_root`.
#[derive(Debug, Clone)]
pub struct CapStdPluginWorkspace {
    plugins_root: PathBuf,
}

impl CapStdPluginWorkspace {
    pub fn new(plugins_root: impl Into<PathBuf>) -> Self {
        Self {
            plugins_root: plugins_root.into(),
        }
    }

    fn open_root(&self) -> io::Result<Dir> {
        Dir::create_ambient_dir_all(&self.plugins_root, ambient_authority())?;
        Dir::open_ambient_dir(&self.plugins_root, ambient_authority())
    }

    async fn blocking<T, F>(&self, work: F) -> Result<T, PluginWorkspaceError>
    where
        T: Send + 'static,
        F: FnOnce(Dir) -> Result<T, PluginWorkspaceError> + Send + 'static,
    {
        let root = self.open_root().map_err(io_error)?;
        tokio::task::spawn_blocking(move || work(root))
            .await
            .map_err(|error| PluginWorkspaceError::io(error.to_string()))?
    }
}

fn io_error(error: io::Error) -> PluginWorkspaceError {
    PluginWorkspaceError::io(error.to_string())
}

fn write_stage(root: &Dir, stage: &str, files: &[(PathBuf, String)]) -> Result<(), PluginWorkspaceError> {
    root.create_dir(stage).map_err(io_error)?;
    let stage_dir = root.open_dir(stage).map_err(io_error)?;
    for (relative, contents) in files {
        if let Some(parent) = relative.parent().filter(|p| !p.as_os_str().is_empty()) {
            stage_dir.create_dir_all(parent).map_err(io_error)?;
        }
        stage_dir.write(relative, contents.as_bytes()).map_err(|error| {
            PluginWorkspaceError::io(format!("{}: {error}", relative.display()))
        })?;
    }
    Ok(())
}

/// Create `<slug>`; fails if the name is taken in any form.
fn claim(root: &Dir, slug: &str) -> Result<(), PluginWorkspaceError> {
    root.create_dir(slug).map_err(|error| {
        if error.kind() == io::ErrorKind::AlreadyExists {
            PluginWorkspaceError::already_exists(slug)
        } else {
            io_error(error)
        }
    })
}

fn move_entries(root: &Dir, stage: &str, slug: &str) -> io::Result<()> {
    let from = root.open_dir(stage)?;
    let to = root.open_dir(slug)?;
    let names = from
        .entries()?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<io::Result<Vec<_>>>()?;
    for name in names {
        from.rename(&name, &to, &name)?;
    }
    Ok(())
}

fn discard(root: &Dir, name: &str) {
    if root.exists(name) {
        if let Err(error) = root.remove_dir_all(name) {
            debug!(%name, %error, "failed to remove plugin directory");
        }
    }
}

fn publish(root: &Dir, slug: &str, files: &[(PathBuf, String)]) -> Result<(), PluginWorkspaceError> {
    if root.exists(slug) {
        return Err(PluginWorkspaceError::already_exists(slug));
    }
    let stage = format!(".tmp-{slug}-{}", Uuid::new_v4());
    let outcome = write_stage(root, &stage, files)
        .and_then(|()| claim(root, slug))
        .and_then(|()| {
            move_entries(root, &stage, slug).map_err(|error| {
                // Only ever removes the directory `claim` just created.
                discard(root, slug);
                io_error(error)
            })
        });
    discard(root, &stage);
    outcome
}

#[async_trait]
impl PluginWorkspace for CapStdPluginWorkspace {
    async fn exists(&self, slug: &PluginSlug) -> Result<bool, PluginWorkspaceError> {
        let slug = slug.as_str().to_owned();
        self.blocking(move |root| Ok(root.exists(&slug))).await
    }

    async fn materialize(
        &self,
        slug: &PluginSlug,
        files: &PluginFiles,
    ) -> Result<PathBuf, PluginWorkspaceError> {
        let owned: Vec<(PathBuf, String)> = files
            .iter()
            .map(|(path, contents)| (path.to_path_buf(), contents.clone()))
            .collect();
        let name = slug.as_str().to_owned();
        self.blocking(move |root| publish(&root, &name, &owned))
            .await?;
        Ok(self.plugins_root.join(slug.as_str()))
    }

    async fn archive(&self, slug: &PluginSlug) -> Result<PathBuf, PluginWorkspaceError> {
        let name = slug.as_str().to_owned();
        let archive = self
            .blocking(move |root| {
                let temp = format!(".{name}.zip.{}", Uuid::new_v4());
                write_archive(&root, &name, &temp)
                    .map_err(|error| PluginWorkspaceError::archive(error.to_string()))
            })
            .await?;
        Ok(self.plugins_root.join(archive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParseLimits, parse_plugin_files};
    use crate::test_support::cap_fs::{list_names, path_exists, read_file_to_string, write_file};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    fn slug(raw: &str) -> PluginSlug {
        PluginSlug::new(raw).expect("valid slug")
    }

    fn files() -> PluginFiles {
        let reply = "```demo.php```\n<?php // main\n```\n```includes/admin.php```\n<?php // admin\n```";
        parse_plugin_files(reply, ParseLimits::default()).expect("reply parses")
    }

    #[rstest]
    #[tokio::test]
    async fn publishes_the_whole_tree(temp: TempDir) {
        let workspace = CapStdPluginWorkspace::new(temp.path());
        let dir = workspace
            .materialize(&slug("demo"), &files())
            .await
            .expect("materialise");

        assert_eq!(dir, temp.path().join("demo"));
        assert!(path_exists(&dir.join("includes/admin.php")));
        assert_eq!(list_names(temp.path()).expect("list"), ["demo"]);
        assert!(workspace.exists(&slug("demo")).await.expect("exists"));
    }

    #[rstest]
    #[tokio::test]
    async fn existing_directory_is_left_untouched(temp: TempDir) {
        write_file(&temp.path().join("demo/keep.txt"), b"mine").expect("seed");
        let workspace = CapStdPluginWorkspace::new(temp.path());

        let error = workspace
            .materialize(&slug("demo"), &files())
            .await
            .expect_err("collision");
        assert_eq!(error, PluginWorkspaceError::already_exists("demo"));
        assert_eq!(
            read_file_to_string(&temp.path().join("demo/keep.txt")).expect("read"),
            "mine"
        );
        assert_eq!(list_names(&temp.path().join("demo")).expect("list"), ["keep.txt"]);
    }

    #[rstest]
    fn empty_directory_still_blocks_the_claim(temp: TempDir) {
        let root = Dir::open_ambient_dir(temp.path(), ambient_authority()).expect("open root");
        root.create_dir("demo").expect("someone else's empty dir");

        let error = claim(&root, "demo").expect_err("taken");
        assert_eq!(error, PluginWorkspaceError::already_exists("demo"));
    }

    #[rstest]
    fn publish_moves_staged_files_into_the_claimed_directory(temp: TempDir) {
        let root = Dir::open_ambient_dir(temp.path(), ambient_authority()).expect("open root");
        let owned: Vec<(PathBuf, String)> = files()
            .iter()
            .map(|(path, contents)| (path.to_path_buf(), contents.clone()))
            .collect();

        publish(&root, "demo", &owned).expect("publish");

        assert_eq!(list_names(temp.path()).expect("list"), ["demo"]);
        assert_eq!(
            read_file_to_string(&temp.path().join("demo/includes/admin.php")).expect("read"),
            "<?php // admin\n"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn failed_writes_leave_no_stage_behind(temp: TempDir) {
        // A file where a directory is needed makes the second write fail.
        let reply = "```lib```\nnot a dir\n```\n```lib/inner.php```\n<?php\n```";
        let broken = parse_plugin_files(reply, ParseLimits::default()).expect("reply parses");
        let workspace = CapStdPluginWorkspace::new(temp.path());

        let error = workspace
            .materialize(&slug("demo"), &broken)
            .await
            .expect_err("write fails");
        assert!(matches!(error, PluginWorkspaceError::Io { .. }));
        assert!(list_names(temp.path()).expect("list").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn archive_sits_beside_the_plugin(temp: TempDir) {
        let workspace = CapStdPluginWorkspace::new(temp.path());
        workspace
            .materialize(&slug("demo"), &files())
            .await
            .expect("materialise");

        let zip = workspace.archive(&slug("demo")).await.expect("archive");
        assert_eq!(zip, temp.path().join("demo.zip"));
        assert_eq!(list_names(temp.path()).expect("list"), ["demo", "demo.zip"]);
    }

    #[rstest]
    #[tokio::test]
    async fn archiving_a_missing_plugin_fails_softly(temp: TempDir) {
        let workspace = CapStdPluginWorkspace::new(temp.path());
        let error = workspace.archive(&slug("ghost")).await.expect_err("missing");
        assert!(matches!(error, PluginWorkspaceError::Archive { .. }));
    }
}
