//! # Platform Profiles (`packaging::profile`)
//!
//! File: cli/src/packaging/profile.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A `PlatformProfile` names the hard limits a deployment target imposes on a
//! function bundle: the size of the uploaded (compressed) artifact, the size
//! of the expanded tree, and the number of entries. Profiles are plain values
//! passed explicitly to every build; there is no process-wide "current"
//! profile.
//!
//! A handful of common targets ship as built-ins (see `builtin_profiles`).
//! Configuration may pick one by name and override individual limits.
//!
use crate::core::error::PackError;
use serde::{Deserialize, Serialize};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

/// Hard size and count limits of an execution platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformProfile {
    pub name: String,
    pub max_compressed_bytes: u64,
    pub max_uncompressed_bytes: u64,
    pub max_file_count: u64,
}

impl PlatformProfile {
    pub fn new(
        name: impl Into<String>,
        max_compressed_bytes: u64,
        max_uncompressed_bytes: u64,
        max_file_count: u64,
    ) -> Self {
        PlatformProfile {
            name: name.into(),
            max_compressed_bytes,
            max_uncompressed_bytes,
            max_file_count,
        }
    }

    /// Checks that every limit is a positive integer.
    pub fn validate(&self) -> Result<(), PackError> {
        let limits = [
            ("maxCompressedBytes", self.max_compressed_bytes),
            ("maxUncompressedBytes", self.max_uncompressed_bytes),
            ("maxFileCount", self.max_file_count),
        ];
        for (label, value) in limits {
            if value == 0 {
                return Err(PackError::InvalidInput(format!(
                    "profile '{}' has {} = 0; limits must be positive",
                    self.name, label
                )));
            }
        }
        Ok(())
    }

    /// Returns a copy with any provided limit replaced.
    pub fn with_overrides(
        mut self,
        max_compressed_bytes: Option<u64>,
        max_uncompressed_bytes: Option<u64>,
        max_file_count: Option<u64>,
    ) -> Self {
        if let Some(value) = max_compressed_bytes {
            self.max_compressed_bytes = value;
        }
        if let Some(value) = max_uncompressed_bytes {
            self.max_uncompressed_bytes = value;
        }
        if let Some(value) = max_file_count {
            self.max_file_count = value;
        }
        self
    }
}

/// The profiles fnpack knows by name.
pub fn builtin_profiles() -> Vec<PlatformProfile> {
    vec![
        // Direct zip upload limit and unzipped code size for functions.
        PlatformProfile::new("aws-lambda", 50 * MIB, 250 * MIB, 65_535),
        PlatformProfile::new("gcp-functions", 100 * MIB, 500 * MIB, 65_535),
        PlatformProfile::new("azure-functions", GIB, GIB, 100_000),
        PlatformProfile::new("edge-worker", MIB, 10 * MIB, 1_000),
    ]
}

/// Looks up a built-in profile by name (case-insensitive).
pub fn builtin_profile(name: &str) -> Result<PlatformProfile, PackError> {
    builtin_profiles()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| PackError::UnknownProfile(name.to_string()))
}
