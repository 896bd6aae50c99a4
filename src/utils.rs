use crate::sinks::error::SinkError;
use log::info;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = "noaa_cdo";

/// Per-user directory the default sinks write into.
pub fn get_data_dir() -> Result<PathBuf, SinkError> {
    dirs::data_dir()
        .map(|p| p.join(DATA_DIR_NAME))
        .ok_or(SinkError::DataDirResolution)
}

pub(crate) fn ensure_dir_exists(path: &Path) -> Result<(), SinkError> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(SinkError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating directory: {}", path.display());
            fs::create_dir_all(path).map_err(|e| SinkError::Io(path.to_path_buf(), e))
        }
        Err(e) => Err(SinkError::Io(path.to_path_buf(), e)),
    }
}

/// Creates the parent directory of `file` if it has one.
pub(crate) fn ensure_parent_exists(file: &Path) -> Result<(), SinkError> {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir_exists(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_exists_creates_nested_dirs() {
        let root = tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
        // Second call is a no-op.
        ensure_dir_exists(&nested).unwrap();
    }

    #[test]
    fn test_ensure_dir_exists_rejects_files() {
        let root = tempdir().unwrap();
        let file = root.path().join("plain.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            ensure_dir_exists(&file),
            Err(SinkError::NotADirectory(_))
        ));
    }
}
