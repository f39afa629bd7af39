//! # fnpack Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Filesystem helpers used around the packaging core. The core itself never
//! touches the filesystem directly: `tree` turns a function directory into an
//! `ArtifactDescriptor` before a build, and `io` writes the results after it.
//!
//! - **`io`**: ensuring output directories exist and writing artifact bytes and reports.
//! - **`tree`**: scanning a function directory (`walkdir`) into a descriptor.
//!
//! ```rust
//! use fnpack::common::fs::{io, tree};
//! # use std::fs;
//! # fn main() -> anyhow::Result<()> {
//! # let dir = tempfile::tempdir()?;
//! # fs::write(dir.path().join("index.js"), "exports.handler = () => 1;")?;
//! let descriptor = tree::scan_tree(dir.path(), &tree::ScanOptions::default())?;
//! io::write_bytes_to_file(&dir.path().join("out/listing.txt"), descriptor.entries()[0].path.as_bytes())?;
//! # Ok(())
//! # }
//! ```
//!

/// Output directory creation and file writing.
pub mod io;
/// Directory scanning into an `ArtifactDescriptor`.
pub mod tree;
