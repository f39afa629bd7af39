//! # fnpack Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module holds the byte-level codecs fnpack packages bundles with. They
//! know nothing about platform limits or strategies; the packaging core calls
//! them through the `packaging::codec::Codec` trait and only looks at the
//! size of what comes back.
//!
//! ## Architecture
//!
//! - **`compression`**: Gzip compression of a single byte buffer (`flate2`).
//! - **`zip`**: Deterministic zip archives of a list of entries (`zip`).
//!
//! ## Usage
//!
//! ```rust
//! use fnpack::common::archive::{compression, zip};
//!
//! # fn main() -> anyhow::Result<()> {
//! let gz = compression::gzip_bytes(b"exports.handler = async () => 42;", 6)?;
//! let archive = zip::zip_entries(vec![zip::ZipInput {
//!     name: "index.js",
//!     mode: 0o644,
//!     data: b"exports.handler = async () => 42;".to_vec(),
//! }], 6)?;
//! assert!(!gz.is_empty() && !archive.is_empty());
//! # Ok(())
//! # }
//! ```
//!

pub mod compression;
pub mod zip;
