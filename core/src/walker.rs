//! Directory walker
//!
//! Lists every regular file under a site root exactly once. Symlinks are
//! not followed, so a link cycle cannot hang a build. Entries are sorted
//! by file name at each level, making walk order (and therefore table
//! order in the generated artifact) reproducible across filesystems.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Recursively collects the paths of all regular files under `root`.
///
/// Fails with [`Error::NotFound`] if `root` does not exist,
/// [`Error::NotADirectory`] if it is a file, and [`Error::Permission`] if
/// any entry cannot be read. A failure aborts the whole walk; no partial
/// result is returned.
pub fn walk(root: &Path) -> Result<Vec<PathBuf>> {
    let meta = std::fs::symlink_metadata(root).map_err(|e| classify(e, root))?;
    if !meta.is_dir() {
        return Err(Error::NotADirectory(root.display().to_string()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .map_or_else(|| root.display().to_string(), |p| p.display().to_string());
                let err = match e.into_io_error() {
                    Some(io_err) => classify(io_err, Path::new(&path)),
                    None => Error::Permission(path),
                };
                return Err(err);
            }
        };
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn classify(e: io::Error, path: &Path) -> Error {
    let shown = path.display().to_string();
    match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound(shown),
        io::ErrorKind::PermissionDenied => Error::Permission(shown),
        _ => Error::Io(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_nested_files_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::write(dir.path().join("sub").join("c.txt"), "c").unwrap();

        let files = walk(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "sub/c.txt"]);
    }

    #[test]
    fn missing_root_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(walk(&missing), Err(Error::NotFound(_))));
    }

    #[test]
    fn file_root_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("site.html");
        std::fs::write(&file, "<html>").unwrap();
        assert!(matches!(walk(&file), Err(Error::NotADirectory(_))));
    }

    #[test]
    fn empty_directory_yields_no_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(walk(dir.path()).unwrap().is_empty());
    }
}
