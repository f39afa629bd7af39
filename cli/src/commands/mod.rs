//! # fnpack Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The top-level commands of the fnpack CLI. Each module defines its clap
//! argument struct and an async `handle_*` function that `main.rs` routes to.
//!
//! - `build`: package one or more function directories
//! - `profiles`: list the built-in platform profiles
//!

/// Packages function directories into deployable artifacts.
pub mod build;
/// Lists the built-in platform profiles and their limits.
pub mod profiles;
