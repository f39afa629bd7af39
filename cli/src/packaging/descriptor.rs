//! # Artifact Descriptor (`packaging::descriptor`)
//!
//! File: cli/src/packaging/descriptor.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! An `ArtifactDescriptor` is the complete, materialized file tree a function
//! bundle is built from: an ordered list of `FileEntry` values, each with a
//! relative path, a declared size, unix mode bits and a content source.
//! Descriptors are validated once on construction and are read-only afterwards;
//! strategies only ever borrow them.
//!
//! Content is either held inline or referenced by a filesystem path that is
//! read lazily by the codec. A path whose on-disk length no longer matches
//! the declared size is reported as an I/O error at read time, which the
//! strategy chain records as an internal failure of that strategy.
//!
use crate::core::error::{PackError, Result};
use anyhow::Context;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Default mode for entries whose permissions are unknown (`rw-r--r--`).
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Where an entry's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Bytes already held in memory.
    Inline(Vec<u8>),
    /// A handle to a file on disk, read on demand.
    Path(PathBuf),
}

/// One file in the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Path relative to the bundle root, `/`-separated.
    pub path: String,
    /// Declared size in bytes.
    pub size: u64,
    /// Unix permission bits.
    pub mode: u32,
    #[serde(skip)]
    pub content: FileContent,
}

impl FileEntry {
    /// Creates an entry from in-memory bytes; the size is taken from the data.
    pub fn inline(path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        FileEntry {
            path: path.into(),
            size: bytes.len() as u64,
            mode: DEFAULT_FILE_MODE,
            content: FileContent::Inline(bytes),
        }
    }

    /// Creates an entry backed by a file on disk with a size recorded at scan time.
    pub fn on_disk(path: impl Into<String>, source: impl Into<PathBuf>, size: u64, mode: u32) -> Self {
        FileEntry {
            path: path.into(),
            size,
            mode,
            content: FileContent::Path(source.into()),
        }
    }

    /// Overrides the mode bits.
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Reads the entry's bytes.
    ///
    /// # Errors
    ///
    /// Fails if a path-backed entry cannot be read or its length differs from
    /// the declared size.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        match &self.content {
            FileContent::Inline(bytes) => Ok(bytes.clone()),
            FileContent::Path(source) => {
                let bytes = std::fs::read(source).with_context(|| {
                    format!("Failed to read '{}' from {}", self.path, source.display())
                })?;
                if bytes.len() as u64 != self.size {
                    anyhow::bail!(
                        "Content of '{}' changed since it was scanned: expected {} bytes, found {}",
                        self.path,
                        self.size,
                        bytes.len()
                    );
                }
                Ok(bytes)
            }
        }
    }
}

/// The ordered, validated file tree of a function bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactDescriptor {
    entries: Vec<FileEntry>,
    #[serde(skip)]
    total_bytes: u64,
}

impl ArtifactDescriptor {
    /// Validates and wraps a list of entries.
    ///
    /// # Errors
    ///
    /// Returns `PackError::InvalidInput` if the list is empty, a path is empty,
    /// absolute, contains `.`/`..` components or a trailing `/` (directory
    /// placeholder), a path appears twice, inline content disagrees with
    /// its declared size, or the declared sizes add up past `u64::MAX`.
    pub fn new(entries: Vec<FileEntry>) -> std::result::Result<Self, PackError> {
        if entries.is_empty() {
            return Err(PackError::InvalidInput(
                "artifact descriptor contains no files".to_string(),
            ));
        }
        let mut seen = HashSet::with_capacity(entries.len());
        let mut total_bytes: u64 = 0;
        for entry in &entries {
            validate_path(&entry.path)?;
            if !seen.insert(entry.path.as_str()) {
                return Err(PackError::InvalidInput(format!(
                    "duplicate path '{}'",
                    entry.path
                )));
            }
            if let FileContent::Inline(bytes) = &entry.content {
                if bytes.len() as u64 != entry.size {
                    return Err(PackError::InvalidInput(format!(
                        "'{}' declares {} bytes but holds {}",
                        entry.path,
                        entry.size,
                        bytes.len()
                    )));
                }
            }
            total_bytes = total_bytes.checked_add(entry.size).ok_or_else(|| {
                PackError::InvalidInput(format!(
                    "declared sizes overflow a 64-bit total at '{}'",
                    entry.path
                ))
            })?;
        }
        Ok(ArtifactDescriptor {
            entries,
            total_bytes,
        })
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn file_count(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Sum of declared entry sizes.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }
}

fn validate_path(path: &str) -> std::result::Result<(), PackError> {
    let invalid = |why: &str| Err(PackError::InvalidInput(format!("path '{}' {}", path, why)));
    if path.is_empty() {
        return Err(PackError::InvalidInput("entry with empty path".to_string()));
    }
    if path.starts_with('/') || path.contains('\\') {
        return invalid("must be relative and '/'-separated");
    }
    if path.ends_with('/') {
        return invalid("is a directory placeholder");
    }
    if path
        .split('/')
        .any(|component| component.is_empty() || component == "." || component == "..")
    {
        return invalid("contains an empty, '.' or '..' component");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_new_accepts_valid_tree() {
        let descriptor = ArtifactDescriptor::new(vec![
            FileEntry::inline("index.js", "exports.handler = 1;"),
            FileEntry::inline("lib/util.js", "module.exports = {};"),
        ])
        .unwrap();
        assert_eq!(descriptor.file_count(), 2);
        assert_eq!(descriptor.total_bytes(), 20 + 20);
    }

    #[test]
    fn test_new_rejects_empty() {
        let err = ArtifactDescriptor::new(vec![]).unwrap_err();
        assert!(matches!(err, PackError::InvalidInput(_)));
    }

    #[test]
    fn test_new_rejects_bad_paths() {
        for bad in ["", "/etc/passwd", "a/../b", "dir/", "a//b", "./a", "win\\path"] {
            let result = ArtifactDescriptor::new(vec![FileEntry::inline(bad, "x")]);
            assert!(
                matches!(result, Err(PackError::InvalidInput(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let err = ArtifactDescriptor::new(vec![
            FileEntry::inline("a.txt", "1"),
            FileEntry::inline("a.txt", "2"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate path 'a.txt'"));
    }

    #[test]
    fn test_new_rejects_inline_size_mismatch() {
        let mut entry = FileEntry::inline("a.txt", "abc");
        entry.size = 10;
        assert!(ArtifactDescriptor::new(vec![entry]).is_err());
    }

    #[test]
    fn test_new_rejects_overflowing_total() {
        let half = u64::MAX / 2 + 1;
        let result = ArtifactDescriptor::new(vec![
            FileEntry::on_disk("a.bin", "/nonexistent/a.bin", half, 0o644),
            FileEntry::on_disk("b.bin", "/nonexistent/b.bin", half, 0o644),
        ]);
        assert!(matches!(result, Err(PackError::InvalidInput(msg)) if msg.contains("overflow")));

        let max = ArtifactDescriptor::new(vec![
            FileEntry::on_disk("a.bin", "/nonexistent/a.bin", u64::MAX, 0o644),
        ])
        .unwrap();
        assert_eq!(max.total_bytes(), u64::MAX);
    }

    #[test]
    fn test_read_bytes_from_disk() -> Result<()> {
        let dir = tempdir()?;
        let source = dir.path().join("handler.py");
        fs::write(&source, "def handler(): pass")?;
        let entry = FileEntry::on_disk("handler.py", &source, 19, 0o755);
        assert_eq!(entry.read_bytes()?, b"def handler(): pass");
        Ok(())
    }

    #[test]
    fn test_read_bytes_detects_changed_file() -> Result<()> {
        let dir = tempdir()?;
        let source = dir.path().join("handler.py");
        fs::write(&source, "short")?;
        let entry = FileEntry::on_disk("handler.py", &source, 999, 0o644);
        let err = entry.read_bytes().unwrap_err();
        assert!(err.to_string().contains("changed since it was scanned"));
        Ok(())
    }
}
