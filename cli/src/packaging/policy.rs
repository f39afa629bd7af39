//! # Size Policy (`packaging::policy`)
//!
//! File: cli/src/packaging/policy.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `SizePolicy` is a pure calculator: given the measured sizes of a candidate
//! artifact and a `PlatformProfile`, it decides whether the candidate fits.
//! Checks always run in the same order (compressed size, then uncompressed
//! size, then file count) and the *first* violated limit is reported, so two
//! simultaneous violations resolve deterministically.
//!
use super::profile::PlatformProfile;
use crate::core::error::PackError;
use serde::Serialize;
use std::fmt;

/// Which profile limit a candidate violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Limit {
    Compressed,
    Uncompressed,
    FileCount,
}

impl Limit {
    /// The profile option that carries this limit.
    pub fn option_name(&self) -> &'static str {
        match self {
            Limit::Compressed => "maxCompressedBytes",
            Limit::Uncompressed => "maxUncompressedBytes",
            Limit::FileCount => "maxFileCount",
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.option_name())
    }
}

/// A violated limit with the measured and permitted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub limit: Limit,
    pub actual: u64,
    pub allowed: u64,
}

impl Violation {
    /// How far over the limit the candidate is.
    pub fn excess(&self) -> u64 {
        self.actual.saturating_sub(self.allowed)
    }
}

/// Result of evaluating a candidate against a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    violation: Option<Violation>,
}

impl Verdict {
    pub fn fits(&self) -> bool {
        self.violation.is_none()
    }

    pub fn violated_limit(&self) -> Option<Limit> {
        self.violation.map(|v| v.limit)
    }

    pub fn violation(&self) -> Option<Violation> {
        self.violation
    }
}

/// Stateless limit checker.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizePolicy;

impl SizePolicy {
    /// Evaluates a candidate's measurements against `profile`.
    ///
    /// # Errors
    ///
    /// Returns `PackError::InvalidInput` if the profile itself is malformed;
    /// that is a configuration defect, not a policy rejection.
    pub fn evaluate(
        compressed_bytes: u64,
        uncompressed_bytes: u64,
        file_count: u64,
        profile: &PlatformProfile,
    ) -> Result<Verdict, PackError> {
        profile.validate()?;
        let checks = [
            (Limit::Compressed, compressed_bytes, profile.max_compressed_bytes),
            (Limit::Uncompressed, uncompressed_bytes, profile.max_uncompressed_bytes),
            (Limit::FileCount, file_count, profile.max_file_count),
        ];
        let violation = checks
            .into_iter()
            .find(|(_, actual, allowed)| actual > allowed)
            .map(|(limit, actual, allowed)| Violation {
                limit,
                actual,
                allowed,
            });
        Ok(Verdict { violation })
    }
}
