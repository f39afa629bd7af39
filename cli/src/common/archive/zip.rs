//! # fnpack Zip Archive Operations (`common::archive::zip`)
//!
//! File: cli/src/common/archive/zip.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Builds zip archives in memory from a list of named entries, for the
//! `zip-archive`, `zip-with-exclusions` and `layer-split` strategies.
//!
//! Archives are deterministic: entries are written in the order given, each
//! with a fixed 1980-01-01 timestamp and its own unix mode. Entries at
//! compression level 0 are stored rather than deflated.
//!
use super::compression::MAX_LEVEL;
use crate::core::error::Result;
use anyhow::Context;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// One file to place in the archive.
#[derive(Debug, Clone)]
pub struct ZipInput<'a> {
    pub name: &'a str,
    pub mode: u32,
    pub data: Vec<u8>,
}

/// # Create Zip Archive (`zip_entries`)
///
/// Writes `entries` into a zip archive held in memory and returns its bytes.
///
/// ## Errors
///
/// Returns an `Err` if an entry cannot be started or written, or the central
/// directory cannot be finalized.
pub fn zip_entries<'a, I>(entries: I, level: u32) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = ZipInput<'a>>,
{
    let level = level.min(MAX_LEVEL);
    let method = if level == 0 {
        CompressionMethod::Stored
    } else {
        CompressionMethod::Deflated
    };
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for entry in entries {
        let mut options = SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(DateTime::default())
            .unix_permissions(entry.mode);
        if level > 0 {
            options = options.compression_level(Some(i64::from(level)));
        }
        writer
            .start_file(entry.name, options)
            .with_context(|| format!("Failed to start zip entry '{}'", entry.name))?;
        writer
            .write_all(&entry.data)
            .with_context(|| format!("Failed to write zip entry '{}'", entry.name))?;
    }

    let cursor = writer
        .finish()
        .context("Failed to finalize zip central directory")?;
    Ok(cursor.into_inner())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn sample() -> Vec<ZipInput<'static>> {
        vec![
            ZipInput {
                name: "index.js",
                mode: 0o644,
                data: b"exports.handler = () => 1;".to_vec(),
            },
            ZipInput {
                name: "bin/run.sh",
                mode: 0o755,
                data: b"#!/bin/sh\nexec node index.js\n".to_vec(),
            },
        ]
    }

    #[test]
    fn test_zip_entries_reads_back() -> Result<()> {
        let bytes = zip_entries(sample(), 6)?;
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        assert_eq!(archive.len(), 2);

        let mut script = archive.by_name("bin/run.sh")?;
        assert_eq!(script.unix_mode().map(|m| m & 0o777), Some(0o755));
        let mut content = String::new();
        script.read_to_string(&mut content)?;
        assert!(content.starts_with("#!/bin/sh"));
        Ok(())
    }

    #[test]
    fn test_zip_entries_is_deterministic() -> Result<()> {
        assert_eq!(zip_entries(sample(), 6)?, zip_entries(sample(), 6)?);
        Ok(())
    }

    #[test]
    fn test_level_zero_stores() -> Result<()> {
        let bytes = zip_entries(sample(), 0)?;
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        assert_eq!(archive.by_index(0)?.compression(), CompressionMethod::Stored);
        Ok(())
    }
}
