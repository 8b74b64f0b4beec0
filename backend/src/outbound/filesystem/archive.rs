//! Zip packaging of a published plugin directory.
//!
//! Entries are named `<slug>/<relative path>` so extracting the archive
//! recreates the plugin directory itself. Only regular files are stored.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cap_std::fs::Dir;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Collect regular files under `dir` as `(archive name, bytes)`, sorted.
fn collect_files(dir: &Dir, prefix: &Path, out: &mut Vec<(String, Vec<u8>)>) -> io::Result<()> {
    let mut entries = dir.entries()?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());
    for entry in entries {
        let name = entry.file_name();
        let path = prefix.join(&name);
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&dir.open_dir(&name)?, &path, out)?;
        } else if file_type.is_file() {
            out.push((archive_name(&path), dir.read(&name)?));
        }
    }
    Ok(())
}

/// Zip entry names always use forward slashes.
fn archive_name(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Stream `files` into `temp_name`, then rename it to `final_name`.
fn zip_into(
    root: &Dir,
    files: &[(String, Vec<u8>)],
    temp_name: &str,
    final_name: &str,
) -> io::Result<()> {
    let mut writer = ZipWriter::new(root.create(temp_name)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in files {
        writer.start_file(name.as_str(), options).map_err(io::Error::other)?;
        writer.write_all(bytes)?;
    }
    writer.finish().map_err(io::Error::other)?;
    root.rename(temp_name, root, final_name)
}

/// Write `<slug>.zip` beside the plugin directory inside `root`.
///
/// The archive is written under a temporary name and renamed into place so a
/// failed run never leaves a truncated zip behind.
pub(super) fn write_archive(root: &Dir, slug: &str, temp_name: &str) -> io::Result<PathBuf> {
    let mut files = Vec::new();
    collect_files(&root.open_dir(slug)?, Path::new(slug), &mut files)?;

    let final_name = format!("{slug}.zip");
    if let Err(error) = zip_into(root, &files, temp_name, &final_name) {
        if root.exists(temp_name) {
            if let Err(cleanup) = root.remove_file(temp_name) {
                debug!(%temp_name, error = %cleanup, "failed to remove partial archive");
            }
        }
        return Err(error);
    }
    Ok(PathBuf::from(final_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cap_std::ambient_authority;
    use std::io::Read;

    #[test]
    fn entries_are_prefixed_with_the_slug() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = Dir::open_ambient_dir(temp.path(), ambient_authority()).expect("open root");
        root.create_dir_all("demo/includes").expect("mkdir");
        root.write("demo/demo.php", "<?php // main").expect("write main");
        root.write("demo/includes/a.php", "<?php // a").expect("write include");

        let name = write_archive(&root, "demo", ".demo.zip.part").expect("archive");
        assert_eq!(name, PathBuf::from("demo.zip"));
        assert!(!root.exists(".demo.zip.part"));

        let file = root.open("demo.zip").expect("open zip").into_std();
        let mut archive = zip::ZipArchive::new(file).expect("read zip");
        let mut names: Vec<_> = archive.file_names().map(str::to_owned).collect();
        names.sort();
        assert_eq!(names, ["demo/demo.php", "demo/includes/a.php"]);

        let mut contents = String::new();
        archive
            .by_name("demo/includes/a.php")
            .expect("entry")
            .read_to_string(&mut contents)
            .expect("read entry");
        assert_eq!(contents, "<?php // a");
    }

    #[test]
    fn failed_publish_removes_the_partial_archive() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = Dir::open_ambient_dir(temp.path(), ambient_authority()).expect("open root");
        root.create_dir_all("demo").expect("mkdir");
        root.write("demo/demo.php", "<?php // main").expect("write main");
        root.create_dir_all("demo.zip/occupied").expect("block the archive name");

        write_archive(&root, "demo", ".demo.zip.part").expect_err("rename onto a directory");

        assert!(!root.exists(".demo.zip.part"));
        assert!(root.is_dir("demo.zip"));
    }
}
