//! # Artifact Builder (`packaging::builder`)
//!
//! File: cli/src/packaging/builder.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `ArtifactBuilder` is the entry point surrounding tooling (the CLI, a
//! packaging pipeline, a build orchestrator) uses. It owns the codec, runs the
//! strategy chain for one descriptor and profile, and returns either the
//! selected artifact with its audit trail or the full audit trail as the
//! error payload.
//!
//! A builder holds no per-build state, so one instance can serve concurrent
//! builds of different artifacts from several threads.
//!
//! ## Usage
//!
//! ```rust
//! use fnpack::packaging::{
//!     ArtifactBuilder, ArtifactDescriptor, CompressionStrategy, FileEntry, PlatformProfile,
//! };
//!
//! let descriptor = ArtifactDescriptor::new(vec![FileEntry::inline("main.py", "print('hi')")]).unwrap();
//! let profile = PlatformProfile::new("tiny", 1000, 1000, 10);
//! let packaged = ArtifactBuilder::new()
//!     .build(&descriptor, &profile, &[CompressionStrategy::StoreRaw])
//!     .unwrap();
//! assert_eq!(packaged.artifact.size(), 11);
//! ```
//!
use super::chain::StrategyChain;
use super::codec::{Codec, DefaultCodec};
use super::descriptor::ArtifactDescriptor;
use super::profile::PlatformProfile;
use super::result::{ChainOutcome, CompressedArtifact, StrategyResult};
use super::strategy::CompressionStrategy;
use crate::core::error::PackError;
use tracing::info;

/// A successful build: the selected artifact plus the audit trail that led to it.
#[derive(Debug, Clone)]
pub struct Packaged {
    pub artifact: CompressedArtifact,
    pub outcome: ChainOutcome,
}

impl Packaged {
    /// The terminal result the artifact came from.
    pub fn selected(&self) -> Option<&StrategyResult> {
        self.outcome.terminal()
    }

    /// Paths the selected strategy left for the caller to package separately.
    pub fn deferred_paths(&self) -> &[String] {
        self.selected().map(|r| r.deferred_paths()).unwrap_or_default()
    }
}

/// Top-level façade over the strategy chain.
pub struct ArtifactBuilder {
    codec: Box<dyn Codec>,
}

impl ArtifactBuilder {
    /// A builder using `DefaultCodec` at the default level.
    pub fn new() -> Self {
        Self::with_codec(DefaultCodec::default())
    }

    pub fn with_codec(codec: impl Codec + 'static) -> Self {
        ArtifactBuilder {
            codec: Box::new(codec),
        }
    }

    /// Packages `descriptor` for `profile`, trying `strategy_order` in order.
    ///
    /// # Errors
    ///
    /// - `PackError::InvalidInput` for an empty strategy order, a malformed
    ///   profile, or a repeated strategy. Nothing is attempted.
    /// - `PackError::StrategiesExhausted` carrying the full `ChainOutcome`
    ///   when no strategy produced an artifact within the limits.
    pub fn build(
        &self,
        descriptor: &ArtifactDescriptor,
        profile: &PlatformProfile,
        strategy_order: &[CompressionStrategy],
    ) -> Result<Packaged, PackError> {
        if strategy_order.is_empty() {
            return Err(PackError::InvalidInput(
                "at least one compression strategy is required".to_string(),
            ));
        }
        info!(
            "Packaging {} files for '{}' with [{}]",
            descriptor.file_count(),
            profile.name,
            strategy_order
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let outcome = StrategyChain::new(self.codec.as_ref()).run(descriptor, profile, strategy_order)?;
        match outcome.terminal().and_then(|r| r.artifact()).cloned() {
            Some(artifact) => Ok(Packaged { artifact, outcome }),
            None => Err(PackError::StrategiesExhausted {
                outcome: Box::new(outcome),
            }),
        }
    }
}

impl Default for ArtifactBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packaging::descriptor::FileEntry;
    use crate::packaging::result::ArtifactFormat;

    fn one_file() -> ArtifactDescriptor {
        ArtifactDescriptor::new(vec![FileEntry::inline("handler.js", "0123456789")]).unwrap()
    }

    #[test]
    fn test_build_returns_artifact_and_trail() {
        let profile = PlatformProfile::new("p", 1000, 1000, 10);
        let packaged = ArtifactBuilder::new()
            .build(&one_file(), &profile, &[CompressionStrategy::StoreRaw])
            .unwrap();
        assert_eq!(packaged.artifact.format(), ArtifactFormat::Raw);
        assert_eq!(packaged.artifact.bytes(), b"0123456789");
        assert_eq!(packaged.selected().unwrap().strategy_name(), "store-raw");
        assert!(packaged.deferred_paths().is_empty());
    }

    #[test]
    fn test_build_exhausted_carries_outcome() {
        let profile = PlatformProfile::new("p", 5, 1000, 10);
        let err = ArtifactBuilder::new()
            .build(
                &one_file(),
                &profile,
                &[CompressionStrategy::StoreRaw, CompressionStrategy::GzipSingleFile],
            )
            .unwrap_err();
        let outcome = err.outcome().expect("exhausted error carries the trail");
        assert_eq!(outcome.attempts().len(), 2);
        assert!(outcome.terminal().is_none());
    }

    #[test]
    fn test_build_requires_strategies() {
        let profile = PlatformProfile::new("p", 5, 1000, 10);
        let err = ArtifactBuilder::new().build(&one_file(), &profile, &[]).unwrap_err();
        assert!(matches!(err, PackError::InvalidInput(_)));
    }
}
