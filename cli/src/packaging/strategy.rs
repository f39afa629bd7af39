//! # Compression Strategies (`packaging::strategy`)
//!
//! File: cli/src/packaging/strategy.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A compression strategy is one way of turning an `ArtifactDescriptor` into
//! a candidate artifact. Strategies form a closed set, `CompressionStrategy`,
//! so the chain can reason about all of them and adding one means adding a
//! variant here:
//!
//! | Name                  | Behaviour |
//! |-----------------------|-----------|
//! | `store-raw`           | No compression; payload is the entries concatenated. |
//! | `gzip-single-file`    | Gzips the only file; not applicable to multi-file trees. |
//! | `zip-archive`         | Zips the whole tree. |
//! | `zip-with-exclusions` | Drops files matching the exclusion patterns, zips the rest. |
//! | `layer-split`         | Zips only the "core" files; matching files are deferred to the caller. |
//!
//! Every `attempt` is side-effect free: it assembles inputs, calls the codec,
//! measures the result against `SizePolicy` and shapes a `StrategyResult`.
//! Unexpected failures (an unreadable file, a codec error) are returned as
//! `Err` and turned into `InternalError` records by the chain.
//!
use super::codec::Codec;
use super::descriptor::{ArtifactDescriptor, FileEntry};
use super::matcher::PathMatcher;
use super::policy::SizePolicy;
use super::profile::PlatformProfile;
use super::result::{
    ArtifactFormat, CompressedArtifact, FailureReason, Measurements, StrategyResult,
};
use crate::core::error::{PackError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Strategy names, as used in configuration and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    StoreRaw,
    GzipSingleFile,
    ZipArchive,
    ZipWithExclusions,
    LayerSplit,
}

impl StrategyKind {
    /// Every strategy, in the default attempt order.
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::StoreRaw,
        StrategyKind::GzipSingleFile,
        StrategyKind::ZipArchive,
        StrategyKind::ZipWithExclusions,
        StrategyKind::LayerSplit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::StoreRaw => "store-raw",
            StrategyKind::GzipSingleFile => "gzip-single-file",
            StrategyKind::ZipArchive => "zip-archive",
            StrategyKind::ZipWithExclusions => "zip-with-exclusions",
            StrategyKind::LayerSplit => "layer-split",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = PackError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PackError::UnknownStrategy(wanted.to_string()))
    }
}

/// A configured strategy, ready to attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionStrategy {
    StoreRaw,
    GzipSingleFile,
    ZipArchive,
    ZipWithExclusions { exclude: PathMatcher },
    LayerSplit { defer: PathMatcher },
}

impl CompressionStrategy {
    /// Builds the strategy for `kind`, taking the predicate it needs.
    pub fn from_kind(kind: StrategyKind, exclude: &PathMatcher, defer: &PathMatcher) -> Self {
        match kind {
            StrategyKind::StoreRaw => CompressionStrategy::StoreRaw,
            StrategyKind::GzipSingleFile => CompressionStrategy::GzipSingleFile,
            StrategyKind::ZipArchive => CompressionStrategy::ZipArchive,
            StrategyKind::ZipWithExclusions => CompressionStrategy::ZipWithExclusions {
                exclude: exclude.clone(),
            },
            StrategyKind::LayerSplit => CompressionStrategy::LayerSplit {
                defer: defer.clone(),
            },
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            CompressionStrategy::StoreRaw => StrategyKind::StoreRaw,
            CompressionStrategy::GzipSingleFile => StrategyKind::GzipSingleFile,
            CompressionStrategy::ZipArchive => StrategyKind::ZipArchive,
            CompressionStrategy::ZipWithExclusions { .. } => StrategyKind::ZipWithExclusions,
            CompressionStrategy::LayerSplit { .. } => StrategyKind::LayerSplit,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Tries to produce an artifact for `artifact` that fits `profile`.
    ///
    /// # Errors
    ///
    /// Returns an `Err` only for unexpected failures: content that cannot be
    /// read, a codec error, or a malformed profile (`PackError::InvalidInput`).
    pub fn attempt(
        &self,
        artifact: &ArtifactDescriptor,
        profile: &PlatformProfile,
        codec: &dyn Codec,
    ) -> Result<StrategyResult> {
        debug!(
            "Attempting '{}' on {} files ({} bytes)",
            self.name(),
            artifact.file_count(),
            artifact.total_bytes()
        );
        match self {
            CompressionStrategy::StoreRaw => store_raw(artifact, profile, codec),
            CompressionStrategy::GzipSingleFile => gzip_single_file(artifact, profile, codec),
            CompressionStrategy::ZipArchive => {
                let entries: Vec<&FileEntry> = artifact.entries().iter().collect();
                zip_subset(self.name(), &entries, profile, codec)
            }
            CompressionStrategy::ZipWithExclusions { exclude } => {
                let (excluded, kept) = partition(artifact, exclude);
                let excluded_paths = paths_of(&excluded);
                debug!("Excluding {} files before archiving", excluded.len());
                let result = if kept.is_empty() {
                    not_applicable(
                        self.name(),
                        "every file matches the exclusion patterns",
                        artifact,
                    )
                } else {
                    zip_subset(self.name(), &kept, profile, codec)?
                };
                Ok(result.with_excluded_paths(excluded_paths))
            }
            CompressionStrategy::LayerSplit { defer } => {
                let (deferred, core) = partition(artifact, defer);
                let deferred_paths = paths_of(&deferred);
                debug!(
                    "Layer split: {} core files, {} deferred",
                    core.len(),
                    deferred.len()
                );
                let result = if core.is_empty() {
                    not_applicable(self.name(), "every file matches the deferral patterns", artifact)
                } else {
                    zip_subset(self.name(), &core, profile, codec)?
                };
                Ok(result.with_deferred_paths(deferred_paths))
            }
        }
    }
}

impl fmt::Display for CompressionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Turns an ordered list of strategy names into strategies sharing the given predicates.
pub fn resolve_strategies(
    kinds: &[StrategyKind],
    exclude: &PathMatcher,
    defer: &PathMatcher,
) -> Vec<CompressionStrategy> {
    kinds
        .iter()
        .map(|kind| CompressionStrategy::from_kind(*kind, exclude, defer))
        .collect()
}

fn store_raw(
    artifact: &ArtifactDescriptor,
    profile: &PlatformProfile,
    codec: &dyn Codec,
) -> Result<StrategyResult> {
    let name = StrategyKind::StoreRaw.name();
    let total = artifact.total_bytes();
    let count = artifact.file_count();

    // Raw output size is known up front; skip materializing a payload that cannot fit.
    if let Some(violation) = SizePolicy::evaluate(total, total, count, profile)?.violation() {
        return Ok(StrategyResult::failed(
            name,
            FailureReason::LimitExceeded { violation },
            Measurements {
                compressed_bytes: Some(total),
                uncompressed_bytes: Some(total),
                file_count: Some(count),
            },
        ));
    }

    let entries: Vec<&FileEntry> = artifact.entries().iter().collect();
    let payload = codec.store(&entries)?;
    if payload.len() as u64 != total {
        anyhow::bail!(
            "store codec returned {} bytes for {} declared bytes",
            payload.len(),
            total
        );
    }
    measure(name, ArtifactFormat::Raw, payload, total, count, profile)
}

fn gzip_single_file(
    artifact: &ArtifactDescriptor,
    profile: &PlatformProfile,
    codec: &dyn Codec,
) -> Result<StrategyResult> {
    let name = StrategyKind::GzipSingleFile.name();
    match artifact.entries() {
        [only] => {
            let payload = codec.gzip(only)?;
            measure(name, ArtifactFormat::Gzip, payload, only.size, 1, profile)
        }
        entries => Ok(not_applicable(
            name,
            &format!("expects exactly one file, found {}", entries.len()),
            artifact,
        )),
    }
}

fn zip_subset(
    name: &str,
    entries: &[&FileEntry],
    profile: &PlatformProfile,
    codec: &dyn Codec,
) -> Result<StrategyResult> {
    let uncompressed = entries.iter().map(|e| e.size).sum();
    let payload = codec.zip(entries)?;
    measure(
        name,
        ArtifactFormat::Zip,
        payload,
        uncompressed,
        entries.len() as u64,
        profile,
    )
}

/// Wraps a payload and checks it against the policy.
fn measure(
    name: &str,
    format: ArtifactFormat,
    payload: Vec<u8>,
    uncompressed_bytes: u64,
    file_count: u64,
    profile: &PlatformProfile,
) -> Result<StrategyResult> {
    let artifact = CompressedArtifact::new(format, payload);
    let verdict = SizePolicy::evaluate(artifact.size(), uncompressed_bytes, file_count, profile)?;
    let result = match verdict.violation() {
        None => StrategyResult::succeeded(name, artifact, uncompressed_bytes, file_count),
        Some(violation) => StrategyResult::failed(
            name,
            FailureReason::LimitExceeded { violation },
            Measurements {
                compressed_bytes: Some(artifact.size()),
                uncompressed_bytes: Some(uncompressed_bytes),
                file_count: Some(file_count),
            },
        ),
    };
    debug!("{}", result);
    Ok(result)
}

fn not_applicable(name: &str, detail: &str, artifact: &ArtifactDescriptor) -> StrategyResult {
    StrategyResult::failed(
        name,
        FailureReason::NotApplicable {
            detail: detail.to_string(),
        },
        Measurements {
            compressed_bytes: None,
            uncompressed_bytes: Some(artifact.total_bytes()),
            file_count: Some(artifact.file_count()),
        },
    )
}

/// Splits entries into (matching, rest), both in descriptor order.
fn partition<'a>(
    artifact: &'a ArtifactDescriptor,
    matcher: &PathMatcher,
) -> (Vec<&'a FileEntry>, Vec<&'a FileEntry>) {
    artifact
        .entries()
        .iter()
        .partition(|entry| matcher.is_match(&entry.path))
}

fn paths_of(entries: &[&FileEntry]) -> Vec<String> {
    entries.iter().map(|e| e.path.clone()).collect()
}
