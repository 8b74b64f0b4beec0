//! Absolute-path file store for injection targets, backups and exports.
//!
//! Each call opens the parent directory with ambient authority and performs
//! the operation relative to it.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;

use crate::domain::ports::{CodeFileStore, CodeFileStoreError};

/// File store with no root of its own; paths come fully resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapStdCodeFileStore;

/// Parent directory and final name; a bare name lives in the working directory.
fn split(path: &Path) -> io::Result<(PathBuf, OsString)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path must name a file")
    })?;
    Ok((parent.to_path_buf(), name.to_os_string()))
}

fn map_io(path: &Path, error: io::Error) -> CodeFileStoreError {
    let shown = path.display().to_string();
    if error.kind() == io::ErrorKind::NotFound {
        CodeFileStoreError::not_found(shown)
    } else {
        CodeFileStoreError::io(shown, error.to_string())
    }
}

async fn blocking<T, F>(path: &Path, work: F) -> Result<T, CodeFileStoreError>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|error| CodeFileStoreError::io(path.display().to_string(), error.to_string()))?
        .map_err(|error| map_io(path, error))
}

#[async_trait]
impl CodeFileStore for CapStdCodeFileStore {
    async fn exists(&self, path: &Path) -> Result<bool, CodeFileStoreError> {
        let target = path.to_path_buf();
        blocking(path, move || {
            let (parent, name) = split(&target)?;
            match Dir::open_ambient_dir(&parent, ambient_authority()) {
                Ok(dir) => Ok(dir.is_file(&name)),
                Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
                Err(error) => Err(error),
            }
        })
        .await
    }

    async fn read(&self, path: &Path) -> Result<String, CodeFileStoreError> {
        let target = path.to_path_buf();
        blocking(path, move || {
            let (parent, name) = split(&target)?;
            Dir::open_ambient_dir(&parent, ambient_authority())?.read_to_string(&name)
        })
        .await
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<(), CodeFileStoreError> {
        let target = path.to_path_buf();
        let contents = contents.to_owned();
        blocking(path, move || {
            let (parent, name) = split(&target)?;
            Dir::create_ambient_dir_all(&parent, ambient_authority())?;
            Dir::open_ambient_dir(&parent, ambient_authority())?.write(&name, contents.as_bytes())
        })
        .await
    }

    async fn copy(&self, from: &Path, to: &Path) -> Result<PathBuf, CodeFileStoreError> {
        let source = from.to_path_buf();
        let destination = to.to_path_buf();
        blocking(from, move || {
            let (from_parent, from_name) = split(&source)?;
            let (to_parent, to_name) = split(&destination)?;
            let from_dir = Dir::open_ambient_dir(&from_parent, ambient_authority())?;
            Dir::create_ambient_dir_all(&to_parent, ambient_authority())?;
            let to_dir = Dir::open_ambient_dir(&to_parent, ambient_authority())?;
            from_dir.copy(&from_name, &to_dir, &to_name)?;
            Ok(destination)
        })
        .await
    }
}
