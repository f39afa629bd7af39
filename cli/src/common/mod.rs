//! # fnpack Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared utilities the packaging core and the CLI commands lean on. Keeping
//! them here separates the byte and filesystem plumbing from the strategy
//! logic in `packaging` and the command handling in `commands`.
//!
//! - **`archive`**: gzip and zip codecs.
//! - **`fs`**: tree scanning and output writing.
//! - **`ui`**: byte formatting and build summaries.
//!

/// Byte-level codecs (gzip, zip).
pub mod archive;
/// Filesystem scanning and writing.
pub mod fs;
/// Terminal presentation helpers.
pub mod ui;
