//! # fnpack Packaging Core (`packaging`)
//!
//! File: cli/src/packaging/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The compression-strategy selection and chaining engine. Given a function's
//! file tree and a target platform's limits, it tries compression strategies
//! in priority order until one produces an artifact that fits.
//!
//! ## Architecture
//!
//! Leaves first:
//! - **`profile`** / **`policy`**: platform limits and the pure check against them.
//! - **`descriptor`**: the validated input file tree.
//! - **`matcher`**: path patterns for exclusions and layer splitting.
//! - **`codec`**: the compression primitives strategies delegate to.
//! - **`strategy`**: the closed set of strategies and their `attempt`.
//! - **`result`**: per-attempt results, artifacts and the chain outcome.
//! - **`chain`**: ordered, short-circuiting evaluation with failure containment.
//! - **`builder`**: the façade callers use.
//!
//! Data flows `ArtifactBuilder` -> `StrategyChain` -> `CompressionStrategy::attempt`
//! -> `Codec` + `SizePolicy` -> `StrategyResult` -> `ChainOutcome`.
//!

pub mod builder;
pub mod chain;
pub mod codec;
pub mod descriptor;
pub mod matcher;
pub mod policy;
pub mod profile;
pub mod result;
pub mod strategy;

pub use builder::{ArtifactBuilder, Packaged};
pub use chain::StrategyChain;
pub use codec::{Codec, DefaultCodec};
pub use descriptor::{ArtifactDescriptor, FileContent, FileEntry};
pub use matcher::PathMatcher;
pub use policy::{Limit, SizePolicy, Verdict, Violation};
pub use profile::{builtin_profile, builtin_profiles, PlatformProfile};
pub use result::{ArtifactFormat, ChainOutcome, CompressedArtifact, FailureReason, StrategyResult};
pub use strategy::{resolve_strategies, CompressionStrategy, StrategyKind};
