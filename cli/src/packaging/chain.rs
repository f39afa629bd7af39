//! # Strategy Chain (`packaging::chain`)
//!
//! File: cli/src/packaging/chain.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `StrategyChain` runs an ordered list of strategies against one artifact and
//! stops at the first one that reports `done`. Every attempt, successful or
//! not, is appended to the audit trail of the returned `ChainOutcome`.
//!
//! ## Guarantees
//!
//! - Strategies run sequentially in the order given. Nothing is reordered or
//!   retried, and each strategy is invoked at most once per run.
//! - Once a strategy succeeds, later strategies are never invoked.
//! - An `Err` or a panic escaping a strategy is recorded as
//!   `FailureReason::InternalError` and the chain moves on, so one broken
//!   strategy cannot block the ones after it.
//! - `PackError::InvalidInput` is the exception: it is a defect in the
//!   caller's input, so it aborts the run and is never recorded as an attempt.
//!
use super::codec::Codec;
use super::descriptor::ArtifactDescriptor;
use super::profile::PlatformProfile;
use super::result::{ChainOutcome, FailureReason, Measurements, StrategyResult};
use super::strategy::CompressionStrategy;
use crate::core::error::PackError;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Runs strategies in order until one succeeds.
pub struct StrategyChain<'c> {
    codec: &'c dyn Codec,
}

impl<'c> StrategyChain<'c> {
    pub fn new(codec: &'c dyn Codec) -> Self {
        StrategyChain { codec }
    }

    /// Attempts `strategies` in order against `artifact`.
    ///
    /// # Errors
    ///
    /// Returns `PackError::InvalidInput` if the profile is malformed, the same
    /// strategy appears twice in `strategies`, or a strategy reports invalid
    /// input. Strategy failures are *not* errors; they are in the outcome.
    pub fn run(
        &self,
        artifact: &ArtifactDescriptor,
        profile: &PlatformProfile,
        strategies: &[CompressionStrategy],
    ) -> Result<ChainOutcome, PackError> {
        profile.validate()?;
        for (i, strategy) in strategies.iter().enumerate() {
            if strategies[..i].contains(strategy) {
                return Err(PackError::InvalidInput(format!(
                    "strategy '{}' appears more than once in the order",
                    strategy
                )));
            }
        }

        let mut outcome = ChainOutcome::default();
        for strategy in strategies {
            let result = self.attempt_guarded(strategy, artifact, profile)?;
            let done = result.done();
            outcome.record(result);
            if done {
                info!(
                    "'{}' produced an artifact within '{}' limits",
                    strategy, profile.name
                );
                break;
            }
        }

        if !outcome.is_success() {
            warn!(
                "All {} strategies were rejected for profile '{}'",
                outcome.attempts().len(),
                profile.name
            );
        }
        Ok(outcome)
    }

    /// Runs one strategy, converting unexpected failures into a result record.
    fn attempt_guarded(
        &self,
        strategy: &CompressionStrategy,
        artifact: &ArtifactDescriptor,
        profile: &PlatformProfile,
    ) -> Result<StrategyResult, PackError> {
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
            strategy.attempt(artifact, profile, self.codec)
        }));
        let message = match attempt {
            Ok(Ok(result)) => {
                debug!("{}", result);
                return Ok(result);
            }
            Ok(Err(err)) => match err.downcast::<PackError>() {
                Ok(PackError::InvalidInput(msg)) => return Err(PackError::InvalidInput(msg)),
                Ok(other) => other.to_string(),
                Err(err) => format!("{:#}", err),
            },
            Err(payload) => format!("strategy panicked: {}", panic_message(payload.as_ref())),
        };
        warn!("'{}' failed unexpectedly: {}", strategy, message);
        Ok(StrategyResult::failed(
            strategy.name(),
            FailureReason::InternalError { message },
            Measurements {
                uncompressed_bytes: Some(artifact.total_bytes()),
                file_count: Some(artifact.file_count()),
                ..Measurements::default()
            },
        ))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result;
    use crate::packaging::codec::DefaultCodec;
    use crate::packaging::descriptor::FileEntry;
    use crate::packaging::matcher::PathMatcher;
    use crate::packaging::policy::Limit;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Codec double that counts calls and returns fixed-size payloads
    /// without reading any content.
    #[derive(Default)]
    struct CountingCodec {
        zip_output: usize,
        fail_zip: bool,
        reject_zip: bool,
        panic_gzip: bool,
        store_calls: AtomicUsize,
        gzip_calls: AtomicUsize,
        zip_calls: AtomicUsize,
    }

    impl Codec for CountingCodec {
        fn store(&self, entries: &[&FileEntry]) -> Result<Vec<u8>> {
            self.store_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![0; entries.iter().map(|e| e.size as usize).sum()])
        }

        fn gzip(&self, _entry: &FileEntry) -> Result<Vec<u8>> {
            self.gzip_calls.fetch_add(1, Ordering::SeqCst);
            if self.panic_gzip {
                panic!("gzip backend exploded");
            }
            Ok(vec![0; 4])
        }

        fn zip(&self, _entries: &[&FileEntry]) -> Result<Vec<u8>> {
            self.zip_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_zip {
                anyhow::bail!("zip backend unavailable");
            }
            if self.reject_zip {
                anyhow::bail!(PackError::InvalidInput("entry name is not valid in a zip".into()));
            }
            Ok(vec![0; self.zip_output])
        }
    }

    fn descriptor(files: usize, size: usize) -> ArtifactDescriptor {
        ArtifactDescriptor::new(
            (0..files)
                .map(|i| FileEntry::inline(format!("f{}.txt", i), vec![b'x'; size]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_stops_at_first_success() -> Result<()> {
        let codec = CountingCodec {
            zip_output: 10,
            ..Default::default()
        };
        let profile = PlatformProfile::new("p", 100, 10_000, 100);
        let order = [
            CompressionStrategy::StoreRaw,
            CompressionStrategy::ZipArchive,
            CompressionStrategy::ZipWithExclusions {
                exclude: PathMatcher::empty(),
            },
        ];
        let outcome = StrategyChain::new(&codec).run(&descriptor(5, 100), &profile, &order)?;

        assert_eq!(outcome.attempts().len(), 2);
        assert_eq!(outcome.terminal().unwrap().strategy_name(), "zip-archive");
        assert_eq!(codec.zip_calls.load(Ordering::SeqCst), 1);
        // store-raw was rejected on size before materializing anything.
        assert_eq!(codec.store_calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[test]
    fn test_first_strategy_success_short_circuits() -> Result<()> {
        let codec = CountingCodec::default();
        let profile = PlatformProfile::new("p", 1000, 1000, 10);
        let order = [CompressionStrategy::StoreRaw, CompressionStrategy::ZipArchive];
        let outcome = StrategyChain::new(&codec).run(&descriptor(1, 10), &profile, &order)?;
        assert_eq!(outcome.attempts().len(), 1);
        assert_eq!(codec.zip_calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[test]
    fn test_exhaustion_keeps_full_trail() -> Result<()> {
        let codec = CountingCodec {
            zip_output: 500,
            ..Default::default()
        };
        let profile = PlatformProfile::new("p", 100, 10_000, 100);
        let order = [
            CompressionStrategy::StoreRaw,
            CompressionStrategy::GzipSingleFile,
            CompressionStrategy::ZipArchive,
        ];
        let outcome = StrategyChain::new(&codec).run(&descriptor(3, 100), &profile, &order)?;

        assert!(outcome.terminal().is_none());
        let names: Vec<_> = outcome.attempts().iter().map(|r| r.strategy_name()).collect();
        assert_eq!(names, ["store-raw", "gzip-single-file", "zip-archive"]);
        assert!(outcome.attempts().iter().all(|r| r.reason().is_some()));
        assert!(matches!(
            outcome.attempts()[2].reason(),
            Some(FailureReason::LimitExceeded { violation }) if violation.limit == Limit::Compressed
        ));
        Ok(())
    }

    #[test]
    fn test_codec_error_becomes_internal_error() -> Result<()> {
        let codec = CountingCodec {
            fail_zip: true,
            ..Default::default()
        };
        let profile = PlatformProfile::new("p", 10, 10_000, 100);
        let order = [CompressionStrategy::ZipArchive, CompressionStrategy::StoreRaw];
        let outcome = StrategyChain::new(&codec).run(&descriptor(1, 5), &profile, &order)?;

        assert_eq!(outcome.attempts().len(), 2);
        match outcome.attempts()[0].reason() {
            Some(FailureReason::InternalError { message }) => {
                assert!(message.contains("zip backend unavailable"))
            }
            other => panic!("expected internal error, got {:?}", other),
        }
        assert_eq!(outcome.terminal().unwrap().strategy_name(), "store-raw");
        Ok(())
    }

    #[test]
    fn test_invalid_input_from_strategy_aborts_run() {
        let codec = CountingCodec {
            reject_zip: true,
            ..Default::default()
        };
        let profile = PlatformProfile::new("p", 10, 10_000, 100);
        let order = [CompressionStrategy::ZipArchive, CompressionStrategy::StoreRaw];
        let result = StrategyChain::new(&codec).run(&descriptor(1, 5), &profile, &order);

        assert!(matches!(result, Err(PackError::InvalidInput(msg)) if msg.contains("not valid in a zip")));
        // The run stopped before store-raw, which would have fit.
        assert_eq!(codec.store_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_panic_is_contained() -> Result<()> {
        let codec = CountingCodec {
            panic_gzip: true,
            zip_output: 5,
            ..Default::default()
        };
        let profile = PlatformProfile::new("p", 100, 100, 10);
        let order = [CompressionStrategy::GzipSingleFile, CompressionStrategy::ZipArchive];
        let outcome = StrategyChain::new(&codec).run(&descriptor(1, 50), &profile, &order)?;

        assert!(matches!(
            outcome.attempts()[0].reason(),
            Some(FailureReason::InternalError { message }) if message.contains("gzip backend exploded")
        ));
        assert!(outcome.is_success());
        Ok(())
    }

    #[test]
    fn test_invalid_profile_is_not_recorded() {
        let codec = DefaultCodec::default();
        let profile = PlatformProfile::new("broken", 0, 100, 10);
        let result = StrategyChain::new(&codec).run(
            &descriptor(1, 5),
            &profile,
            &[CompressionStrategy::StoreRaw],
        );
        assert!(matches!(result, Err(PackError::InvalidInput(_))));
    }

    #[test]
    fn test_duplicate_strategy_rejected() {
        let codec = DefaultCodec::default();
        let profile = PlatformProfile::new("p", 100, 100, 10);
        let result = StrategyChain::new(&codec).run(
            &descriptor(1, 5),
            &profile,
            &[CompressionStrategy::ZipArchive, CompressionStrategy::ZipArchive],
        );
        assert!(matches!(result, Err(PackError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_order_yields_empty_outcome() -> Result<()> {
        let codec = DefaultCodec::default();
        let profile = PlatformProfile::new("p", 100, 100, 10);
        let outcome = StrategyChain::new(&codec).run(&descriptor(1, 5), &profile, &[])?;
        assert!(outcome.attempts().is_empty());
        assert!(outcome.terminal().is_none());
        Ok(())
    }
}
