//! # fnpack Compression Utilities (`common::archive::compression`)
//!
//! File: cli/src/common/archive/compression.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Gzip compression of in-memory buffers, used by the `gzip-single-file`
//! strategy. The gzip header is written with a zero modification time, so the
//! same input and level always produce the same bytes.
//!
use crate::core::error::Result;
use anyhow::Context;
use flate2::{write::GzEncoder, Compression};
use std::io::Write;

/// Highest level accepted by `gzip_bytes` and the zip codec.
pub const MAX_LEVEL: u32 = 9;

/// # Gzip a Buffer (`gzip_bytes`)
///
/// Compresses `data` with gzip at `level` (0-9, clamped).
///
/// ## Errors
///
/// Returns an `Err` if writing to or finishing the encoder fails.
pub fn gzip_bytes(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(
        Vec::with_capacity(data.len() / 2),
        Compression::new(level.min(MAX_LEVEL)),
    );
    encoder
        .write_all(data)
        .context("Failed to write data to gzip encoder")?;
    encoder
        .finish()
        .context("Failed to finish gzip compression stream")
}
