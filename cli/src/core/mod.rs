//! # fnpack Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Foundational pieces shared by the packaging engine and the commands:
//! - `config`: configuration loading, merging and validation
//! - `error`: the `PackError` type and the crate-wide `Result` alias
//!
//! ```rust
//! use fnpack::core::config; // For loading configuration
//! use fnpack::core::error::{PackError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
