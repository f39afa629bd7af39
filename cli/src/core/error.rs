//! # fnpack Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used throughout fnpack. It follows a
//! two-layer approach:
//! - `PackError`: a `thiserror` enum for failures callers need to match on
//!   (malformed input, exhausted strategy chains, bad configuration).
//! - `Result<T>`: an alias for `anyhow::Result<T>` used for application
//!   plumbing, where context strings matter more than the concrete type.
//!
//! Expected strategy outcomes (`NotApplicable`, `LimitExceeded`) are *not*
//! errors: they are recorded as `FailureReason`s in the audit trail (see
//! `packaging::result`). Only defects in the caller's input and the final
//! "nothing fit" condition surface as `PackError`.
//!
//! ## Examples
//!
//! ```rust
//! use fnpack::core::error::PackError;
//!
//! let err = PackError::InvalidInput("duplicate path 'index.js'".into());
//! assert_eq!(err.to_string(), "Invalid input: duplicate path 'index.js'");
//! ```
//!
use crate::packaging::ChainOutcome;
use thiserror::Error;

/// Custom error type for fnpack.
#[derive(Error, Debug)]
pub enum PackError {
    /// Malformed descriptor or profile. Never recorded as a strategy attempt.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every strategy in the chain was attempted and none produced an artifact
    /// within the profile limits. The full audit trail is carried along.
    #[error("No compression strategy produced an artifact within the platform limits ({} attempted)", .outcome.attempts().len())]
    StrategiesExhausted { outcome: Box<ChainOutcome> },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Unknown compression strategy '{0}'")]
    UnknownStrategy(String),

    #[error("Unknown platform profile '{0}'")]
    UnknownProfile(String),
}

impl PackError {
    /// Returns the audit trail if this error is an exhausted chain.
    pub fn outcome(&self) -> Option<&ChainOutcome> {
        match self {
            PackError::StrategiesExhausted { outcome } => Some(outcome),
            _ => None,
        }
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
