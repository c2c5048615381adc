//! File resolution and raw file access for stores.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{Result, StoreError};

use super::format::KNOWN_EXTENSIONS;

/// Build `<dir>/<name>.<extension>`, dropping a known extension from `name`.
pub fn resolve(name: &str, dir: Option<&Path>, extension: &str) -> Result<PathBuf> {
    if name.trim().is_empty() {
        return Err(StoreError::EmptyName);
    }

    let file_name = format!("{}.{}", strip_known_extension(name), extension);
    match dir {
        Some(dir) if !dir.as_os_str().is_empty() => {
            let dir = dir.to_string_lossy().replace('\\', "/");
            Ok(PathBuf::from(dir).join(file_name))
        }
        _ => Ok(PathBuf::from(file_name)),
    }
}

fn strip_known_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && KNOWN_EXTENSIONS.iter().any(|k| k.eq_ignore_ascii_case(ext)) =>
        {
            stem
        }
        _ => name,
    }
}

/// Create an empty file (and its directories) unless it exists.
///
/// Returns true if the file was created.
pub fn create(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::Write {
            path: path.to_path_buf(),
            message: format!("Failed to create directory: {}", e),
        })?;
    }
    fs::write(path, "").map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        message: format!("Failed to create file: {}", e),
    })?;
    Ok(true)
}

pub fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|_| StoreError::Read {
        path: path.to_path_buf(),
    })
}

pub fn write(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Modification time, or `None` if the file is gone or the platform lacks it.
pub fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_adds_extension() {
        let path = resolve("config", None, "ls").unwrap();
        assert_eq!(path, PathBuf::from("config.ls"));
    }

    #[test]
    fn test_resolve_replaces_known_extension() {
        let path = resolve("config.yml", Some(Path::new("data")), "ls").unwrap();
        assert_eq!(path, PathBuf::from("data/config.ls"));

        let path = resolve("v1.2", None, "ls").unwrap();
        assert_eq!(path, PathBuf::from("v1.2.ls"));
    }

    #[test]
    fn test_resolve_normalises_backslashes() {
        let path = resolve("a", Some(Path::new("plugins\\demo")), "ls").unwrap();
        assert_eq!(path, PathBuf::from("plugins/demo/a.ls"));
    }

    #[test]
    fn test_resolve_empty_name() {
        assert!(matches!(resolve("  ", None, "ls"), Err(StoreError::EmptyName)));
    }

    #[test]
    fn test_create_makes_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/file.ls");

        assert!(create(&path).unwrap());
        assert!(path.exists());
        assert!(!create(&path).unwrap());
        assert_eq!(read(&path).unwrap(), "");
    }

    #[test]
    fn test_read_missing_file_is_opaque() {
        let dir = tempdir().unwrap();
        let err = read(&dir.path().join("missing.ls")).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
        assert!(modified(&dir.path().join("missing.ls")).is_none());
    }
}
