//! # fnpack
//!
//! File: cli/src/lib.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! fnpack packages serverless function bundles. Given a function's file tree
//! and the size limits of the platform it deploys to, it tries a list of
//! compression strategies in priority order (store as-is, gzip a single file,
//! zip everything, zip without test/doc files, split heavy dependencies into a
//! separate layer) and keeps the first one whose output fits, along with an
//! audit trail of every attempt.
//!
//! ## Architecture
//!
//! - `packaging`: the strategy selection and chaining engine.
//! - `common`: codecs, filesystem scanning/writing and terminal helpers.
//! - `core`: configuration and error types.
//!
//! The `fnpack` binary (`main.rs`) adds the command-line interface on top.
//!

pub mod common;
pub mod core;
pub mod packaging;
