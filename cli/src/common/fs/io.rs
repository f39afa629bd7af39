//! # fnpack Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` that add context to errors:
//! - **`ensure_dir_exists`**: creates a directory (and parents) unless it
//!   already exists, and rejects paths that exist but are not directories.
//! - **`write_bytes_to_file`**: writes a buffer to a file, creating the parent
//!   directory first. Used for artifacts.
//! - **`write_string_to_file`**: the same for text. Used for build reports.
//!
use crate::core::error::{PackError, Result};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or creating
/// the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(PackError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Writes `content` to `path`, overwriting it, after ensuring the parent directory exists.
///
/// # Errors
///
/// Returns an `Err` if the parent directory cannot be created or the write fails.
pub fn write_bytes_to_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    info!("Wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}

/// Writes string content to `path`. See `write_bytes_to_file`.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<()> {
    write_bytes_to_file(path, content.as_bytes())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_exists_creates_new() -> Result<()> {
        let base_dir = tempdir()?;
        let new_dir = base_dir.path().join("dist/nested");
        assert!(!new_dir.exists());
        ensure_dir_exists(&new_dir)?;
        assert!(new_dir.is_dir());
        // A second call is a no-op.
        ensure_dir_exists(&new_dir)?;
        Ok(())
    }

    #[test]
    fn test_ensure_dir_exists_path_is_file() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("a_file.txt");
        fs::write(&file_path, "hello")?;
        let result = ensure_dir_exists(&file_path);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Path exists but is not a directory"));
        Ok(())
    }

    #[test]
    fn test_write_bytes_creates_parent() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("dist/api.zip");
        write_bytes_to_file(&file_path, &[0x50, 0x4b, 0x05, 0x06])?;
        assert_eq!(fs::read(&file_path)?, vec![0x50, 0x4b, 0x05, 0x06]);
        write_string_to_file(&file_path, "replaced")?;
        assert_eq!(fs::read_to_string(&file_path)?, "replaced");
        Ok(())
    }
}
