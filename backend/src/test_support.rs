//! Helpers for unit and integration tests.
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature so the
//! suites under `tests/` can share them.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

/// [`Clock`] that only moves when told to.
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    /// Start at `seconds` past the Unix epoch.
    ///
    /// # Panics
    /// When `seconds` is outside chrono's range.
    pub fn at_timestamp(seconds: i64) -> Self {
        let Some(start) = DateTime::from_timestamp(seconds, 0) else {
            panic!("timestamp out of range: {seconds}");
        };
        Self(Mutex::new(start))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        let mut now = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += TimeDelta::seconds(seconds);
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub mod cap_fs {
    //! Inspect and seed temp trees through `cap_std` directory handles.

    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    fn parent_of(path: &Path) -> &Path {
        path.parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    /// Open the parent of `path` and hand its last component to `op`.
    fn in_parent<T>(path: &Path, op: impl FnOnce(&Dir, &Path) -> io::Result<T>) -> io::Result<T> {
        let name = path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "path has no final component")
        })?;
        let dir = Dir::open_ambient_dir(parent_of(path), ambient_authority())?;
        op(&dir, Path::new(name))
    }

    /// # Examples
    ///
    /// ```rust
    /// use devassist::test_support::cap_fs::{read_file_to_string, write_file};
    ///
    /// let dir = tempfile::tempdir()?;
    /// let path = dir.path().join("nested/hello.php");
    /// write_file(&path, b"<?php echo 1;\n")?;
    /// assert_eq!(read_file_to_string(&path)?, "<?php echo 1;\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn read_file_to_string(path: &Path) -> io::Result<String> {
        in_parent(path, |dir, name| dir.read_to_string(name))
    }

    pub fn read_file(path: &Path) -> io::Result<Vec<u8>> {
        in_parent(path, |dir, name| dir.read(name))
    }

    /// Write `contents`, creating missing parent directories first.
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        Dir::create_ambient_dir_all(parent_of(path), ambient_authority())?;
        in_parent(path, |dir, name| dir.write(name, contents))
    }

    pub fn path_exists(path: &Path) -> bool {
        in_parent(path, |dir, name| Ok(dir.exists(name))).unwrap_or(false)
    }

    /// Sorted entry names of the directory at `path`.
    pub fn list_names(path: &Path) -> io::Result<Vec<String>> {
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        let mut names = dir
            .entries()?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<io::Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }
}
