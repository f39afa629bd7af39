//! # Strategy Outcomes (`packaging::result`)
//!
//! File: cli/src/packaging/result.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the value objects that flow out of the packaging core:
//!
//! - `CompressedArtifact`: the produced payload, its size, format and SHA-256 digest.
//! - `FailureReason`: why a strategy did not produce an acceptable artifact.
//! - `StrategyResult`: the outcome of one strategy attempt, the record that
//!   makes up the audit trail.
//! - `ChainOutcome`: the ordered audit trail plus the terminal (selected) result.
//!
//! `StrategyResult` can only be built through `succeeded` / `failed`, which
//! keep its invariant: a `done` result always holds an artifact and both byte
//! counts, a failed one always holds a reason.
//!
use super::policy::Violation;
use crate::common::ui::format_bytes;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

/// Container format of a produced artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// Uncompressed concatenation of the entries, in descriptor order.
    Raw,
    Gzip,
    Zip,
}

impl ArtifactFormat {
    /// File extension used when the artifact is written to disk.
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::Raw => "raw",
            ArtifactFormat::Gzip => "gz",
            ArtifactFormat::Zip => "zip",
        }
    }
}

/// An immutable packaged payload.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CompressedArtifact {
    format: ArtifactFormat,
    size: u64,
    digest: String,
    #[serde(skip)]
    bytes: Arc<[u8]>,
}

impl CompressedArtifact {
    pub fn new(format: ArtifactFormat, bytes: Vec<u8>) -> Self {
        let digest = format!("{:x}", Sha256::digest(&bytes));
        CompressedArtifact {
            format,
            size: bytes.len() as u64,
            digest,
            bytes: Arc::from(bytes),
        }
    }

    pub fn format(&self) -> ArtifactFormat {
        self.format
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Lowercase hex SHA-256 of the payload.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for CompressedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressedArtifact")
            .field("format", &self.format)
            .field("size", &self.size)
            .field("digest", &self.digest)
            .finish()
    }
}

/// Why a strategy attempt did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FailureReason {
    /// The strategy cannot handle this artifact's shape.
    NotApplicable { detail: String },
    /// The candidate was produced but breaks a profile limit.
    LimitExceeded { violation: Violation },
    /// Something unexpected failed inside the strategy.
    InternalError { message: String },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NotApplicable { detail } => write!(f, "not applicable ({})", detail),
            FailureReason::LimitExceeded { violation } => match violation.limit {
                super::policy::Limit::FileCount => write!(
                    f,
                    "exceeded {} by {} files ({} > {})",
                    violation.limit,
                    violation.excess(),
                    violation.actual,
                    violation.allowed
                ),
                _ => write!(
                    f,
                    "exceeded {} by {}",
                    violation.limit,
                    format_bytes(violation.excess())
                ),
            },
            FailureReason::InternalError { message } => write!(f, "internal error: {}", message),
        }
    }
}

/// Measurements a strategy took of its candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Measurements {
    pub compressed_bytes: Option<u64>,
    pub uncompressed_bytes: Option<u64>,
    pub file_count: Option<u64>,
}

/// Outcome of a single strategy attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyResult {
    done: bool,
    strategy_name: String,
    compressed_bytes: Option<u64>,
    uncompressed_bytes: Option<u64>,
    file_count: Option<u64>,
    artifact: Option<CompressedArtifact>,
    reason: Option<FailureReason>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    excluded_paths: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    deferred_paths: Vec<String>,
}

impl StrategyResult {
    /// A completed attempt. Byte counts are taken from the caller's
    /// measurement and the artifact.
    pub fn succeeded(
        strategy_name: &str,
        artifact: CompressedArtifact,
        uncompressed_bytes: u64,
        file_count: u64,
    ) -> Self {
        StrategyResult {
            done: true,
            strategy_name: strategy_name.to_string(),
            compressed_bytes: Some(artifact.size()),
            uncompressed_bytes: Some(uncompressed_bytes),
            file_count: Some(file_count),
            artifact: Some(artifact),
            reason: None,
            excluded_paths: Vec::new(),
            deferred_paths: Vec::new(),
        }
    }

    /// A failed attempt with whatever measurements were taken before it stopped.
    pub fn failed(strategy_name: &str, reason: FailureReason, measured: Measurements) -> Self {
        StrategyResult {
            done: false,
            strategy_name: strategy_name.to_string(),
            compressed_bytes: measured.compressed_bytes,
            uncompressed_bytes: measured.uncompressed_bytes,
            file_count: measured.file_count,
            artifact: None,
            reason: Some(reason),
            excluded_paths: Vec::new(),
            deferred_paths: Vec::new(),
        }
    }

    pub fn with_excluded_paths(mut self, paths: Vec<String>) -> Self {
        self.excluded_paths = paths;
        self
    }

    pub fn with_deferred_paths(mut self, paths: Vec<String>) -> Self {
        self.deferred_paths = paths;
        self
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    pub fn compressed_bytes(&self) -> Option<u64> {
        self.compressed_bytes
    }

    pub fn uncompressed_bytes(&self) -> Option<u64> {
        self.uncompressed_bytes
    }

    pub fn file_count(&self) -> Option<u64> {
        self.file_count
    }

    pub fn artifact(&self) -> Option<&CompressedArtifact> {
        self.artifact.as_ref()
    }

    pub fn reason(&self) -> Option<&FailureReason> {
        self.reason.as_ref()
    }

    /// Paths dropped by `zip-with-exclusions`.
    pub fn excluded_paths(&self) -> &[String] {
        &self.excluded_paths
    }

    /// Paths left for the caller to package separately (`layer-split`).
    pub fn deferred_paths(&self) -> &[String] {
        &self.deferred_paths
    }
}

impl fmt::Display for StrategyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.reason, &self.artifact) {
            (Some(reason), _) => write!(f, "{}: {}", self.strategy_name, reason),
            (None, Some(artifact)) => write!(
                f,
                "{}: ok, {} ({} uncompressed, {} files)",
                self.strategy_name,
                format_bytes(artifact.size()),
                format_bytes(self.uncompressed_bytes.unwrap_or_default()),
                self.file_count.unwrap_or_default()
            ),
            (None, None) => write!(f, "{}: no result", self.strategy_name),
        }
    }
}

/// Everything a chain run produced: every attempt, in order, and the one selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChainOutcome {
    attempts: Vec<StrategyResult>,
    #[serde(skip)]
    terminal: Option<usize>,
}

impl ChainOutcome {
    /// Appends an attempt. The first `done` result becomes terminal.
    pub(crate) fn record(&mut self, result: StrategyResult) {
        if result.done() && self.terminal.is_none() {
            self.terminal = Some(self.attempts.len());
        }
        self.attempts.push(result);
    }

    /// The audit trail, in invocation order.
    pub fn attempts(&self) -> &[StrategyResult] {
        &self.attempts
    }

    /// The selected result, if any strategy succeeded.
    pub fn terminal(&self) -> Option<&StrategyResult> {
        self.terminal.and_then(|i| self.attempts.get(i))
    }

    pub fn is_success(&self) -> bool {
        self.terminal.is_some()
    }
}

impl fmt::Display for ChainOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, attempt) in self.attempts.iter().enumerate() {
            let marker = if Some(i) == self.terminal { "*" } else { "-" };
            writeln!(f, "  {} {}", marker, attempt)?;
        }
        Ok(())
    }
}
