//! # fnpack Tree Scanning (`common::fs::tree`)
//!
//! File: cli/src/common/fs/tree.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Walks a function directory with `walkdir` and produces an
//! `ArtifactDescriptor` of path-backed entries: files only (no directory
//! placeholders), paths relative to the root with `/` separators, sorted by
//! name so the same tree always yields the same descriptor. Sizes and mode
//! bits are recorded at scan time; content is read later by the codec.
//!
//! `.git` directories are never included.
//!
use crate::core::error::{PackError, Result};
use crate::packaging::descriptor::{ArtifactDescriptor, FileEntry};
use anyhow::Context;
use std::fs::Metadata;
use std::path::{Component, Path};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directory names skipped while scanning.
const SKIPPED_DIRS: &[&str] = &[".git"];

/// How to walk the tree.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Follow symbolic links instead of skipping them.
    pub follow_links: bool,
}

/// # Scan a Function Directory (`scan_tree`)
///
/// ## Errors
///
/// Returns an `Err` if `root` is not a directory, a directory entry cannot be
/// read, a path is not valid UTF-8, or the tree contains no files.
pub fn scan_tree(root: &Path, options: &ScanOptions) -> Result<ArtifactDescriptor> {
    if !root.is_dir() {
        anyhow::bail!(PackError::FileSystem(format!(
            "Function directory not found or not a directory: {}",
            root.display()
        )));
    }

    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.file_type().is_dir()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
        });

    let mut entries = Vec::new();
    for item in walker {
        let item = item.with_context(|| format!("Failed to walk {}", root.display()))?;
        let file_type = item.file_type();
        if file_type.is_symlink() {
            warn!("Skipping symbolic link {}", item.path().display());
            continue;
        }
        if !file_type.is_file() {
            continue;
        }
        let relative = relative_path(root, item.path())?;
        let metadata = item
            .metadata()
            .with_context(|| format!("Failed to read metadata of {}", item.path().display()))?;
        debug!("Found {} ({} bytes)", relative, metadata.len());
        entries.push(FileEntry::on_disk(
            relative,
            item.path(),
            metadata.len(),
            mode_of(&metadata),
        ));
    }

    ArtifactDescriptor::new(entries)
        .with_context(|| format!("Failed to describe {}", root.display()))
}

fn relative_path(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{} is outside {}", path.display(), root.display()))?;
    let mut parts = Vec::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            let part = part.to_str().ok_or_else(|| {
                PackError::FileSystem(format!("Path is not valid UTF-8: {}", path.display()))
            })?;
            parts.push(part);
        }
    }
    Ok(parts.join("/"))
}

#[cfg(unix)]
fn mode_of(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn mode_of(_metadata: &Metadata) -> u32 {
    crate::packaging::descriptor::DEFAULT_FILE_MODE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_tree_sorted_relative_files() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("lib/nested"))?;
        fs::create_dir_all(dir.path().join("empty"))?;
        fs::write(dir.path().join("index.js"), "handler")?;
        fs::write(dir.path().join("lib/nested/util.js"), "util")?;
        fs::write(dir.path().join("lib/a.js"), "a")?;

        let descriptor = scan_tree(dir.path(), &ScanOptions::default())?;
        let paths: Vec<_> = descriptor.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["index.js", "lib/a.js", "lib/nested/util.js"]);
        assert_eq!(descriptor.total_bytes(), 7 + 1 + 4);
        assert_eq!(descriptor.entries()[0].read_bytes()?, b"handler");
        Ok(())
    }

    #[test]
    fn test_scan_tree_skips_git() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join(".git/objects"))?;
        fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/main")?;
        fs::write(dir.path().join("main.py"), "print(1)")?;
        let descriptor = scan_tree(dir.path(), &ScanOptions::default())?;
        assert_eq!(descriptor.file_count(), 1);
        Ok(())
    }

    #[test]
    fn test_scan_tree_empty_dir_is_invalid() -> Result<()> {
        let dir = tempdir()?;
        let err = scan_tree(dir.path(), &ScanOptions::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PackError>(),
            Some(PackError::InvalidInput(_))
        ));
        Ok(())
    }

    #[test]
    fn test_scan_tree_missing_root() {
        let err = scan_tree(Path::new("/nonexistent/fnpack/fn"), &ScanOptions::default()).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_tree_records_mode() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir()?;
        let script = dir.path().join("bootstrap");
        fs::write(&script, "#!/bin/sh")?;
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;
        let descriptor = scan_tree(dir.path(), &ScanOptions::default())?;
        assert_eq!(descriptor.entries()[0].mode, 0o755);
        Ok(())
    }
}
