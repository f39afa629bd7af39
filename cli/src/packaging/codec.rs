//! # Codec Seam (`packaging::codec`)
//!
//! File: cli/src/packaging/codec.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Strategies never compress bytes themselves. They assemble a set of entries
//! and hand it to a `Codec`, then measure what comes back against the size
//! policy. The trait is the seam where the real compression libraries plug in
//! (`DefaultCodec`, backed by `common::archive`) and where tests substitute
//! doubles that count calls or fabricate output sizes.
//!
//! Codecs receive borrowed `FileEntry` values and are responsible for reading
//! their content; an unreadable entry surfaces as an `Err`, which the strategy
//! chain records as an internal failure of the strategy that triggered it.
//!
use super::descriptor::FileEntry;
use crate::common::archive::{compression, zip};
use crate::core::error::Result;

/// Default deflate/gzip level.
pub const DEFAULT_LEVEL: u32 = 6;

/// Raw compression primitives used by the strategies.
pub trait Codec: Send + Sync {
    /// Concatenates entry contents without compression.
    fn store(&self, entries: &[&FileEntry]) -> Result<Vec<u8>>;

    /// Gzips a single entry's contents.
    fn gzip(&self, entry: &FileEntry) -> Result<Vec<u8>>;

    /// Archives and compresses the entries into a zip.
    fn zip(&self, entries: &[&FileEntry]) -> Result<Vec<u8>>;
}

/// `Codec` backed by `flate2` and `zip`.
#[derive(Debug, Clone, Copy)]
pub struct DefaultCodec {
    level: u32,
}

impl DefaultCodec {
    pub fn new(level: u32) -> Self {
        DefaultCodec {
            level: level.min(compression::MAX_LEVEL),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Default for DefaultCodec {
    fn default() -> Self {
        DefaultCodec::new(DEFAULT_LEVEL)
    }
}

impl Codec for DefaultCodec {
    fn store(&self, entries: &[&FileEntry]) -> Result<Vec<u8>> {
        let capacity = entries.iter().map(|e| e.size as usize).sum();
        let mut payload = Vec::with_capacity(capacity);
        for entry in entries {
            payload.extend_from_slice(&entry.read_bytes()?);
        }
        Ok(payload)
    }

    fn gzip(&self, entry: &FileEntry) -> Result<Vec<u8>> {
        compression::gzip_bytes(&entry.read_bytes()?, self.level)
    }

    fn zip(&self, entries: &[&FileEntry]) -> Result<Vec<u8>> {
        let inputs = entries
            .iter()
            .map(|entry| {
                Ok(zip::ZipInput {
                    name: entry.path.as_str(),
                    mode: entry.mode,
                    data: entry.read_bytes()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        zip::zip_entries(inputs, self.level)
    }
}
