//! # fnpack Build Command
//!
//! File: cli/src/commands/build.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `fnpack build`, which packages one or more function directories
//! for a target platform.
//!
//! ## Architecture
//!
//! The command flow follows these steps:
//! 1. Load the merged configuration and apply command-line overrides.
//! 2. Resolve the platform profile and the ordered strategy list.
//! 3. For every directory, on tokio's blocking pool: scan it into an
//!    `ArtifactDescriptor` and run `ArtifactBuilder::build`. Directories are
//!    independent, so they are packaged concurrently; results are reported in
//!    the order the directories were given.
//! 4. Print the audit trail of each build (or JSON with `--json`).
//! 5. Unless `--dry-run`, write `<out>/<name>.<zip|gz|raw>` for successful
//!    builds and `<out>/<name>.report.json` for every build.
//! 6. Fail if any function could not be packaged.
//!
//! ## Examples
//!
//! ```bash
//! # Package the current directory for the default profile
//! fnpack build
//!
//! # Package two functions for an edge runtime, zip strategies only
//! fnpack build --profile edge-worker --strategy zip-archive,zip-with-exclusions ./api ./auth
//!
//! # See what would happen without writing anything
//! fnpack build --dry-run --json ./api
//! ```
//!
use clap::Parser;
use fnpack::common::fs::{io, tree};
use fnpack::common::ui;
use fnpack::core::config::{self, Config};
use fnpack::core::error::{PackError, Result};
use fnpack::packaging::{
    ArtifactBuilder, ArtifactDescriptor, ChainOutcome, CompressedArtifact, DefaultCodec,
    FileEntry, Packaged, PlatformProfile, StrategyKind,
};
use anyhow::Context;
use futures_util::future::join_all;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// # Build Arguments (`BuildArgs`)
///
/// Command-line arguments for `fnpack build`. Every option falls back to the
/// configuration file when omitted.
#[derive(Parser, Debug, Default)]
pub struct BuildArgs {
    /// Function directories to package.
    #[arg(default_value = ".")]
    dirs: Vec<PathBuf>,

    /// Built-in platform profile to package for (e.g. aws-lambda, edge-worker).
    #[arg(short, long, env = "FNPACK_PROFILE")]
    profile: Option<String>,

    /// Strategy order, comma-separated or repeated. Replaces the configured order.
    #[arg(short = 's', long = "strategy", value_delimiter = ',')]
    strategies: Vec<StrategyKind>,

    /// Exclusion pattern for zip-with-exclusions. Replaces the configured list.
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Deferral pattern for layer-split. Replaces the configured list.
    #[arg(long)]
    defer: Vec<String>,

    /// Compression level (0-9).
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=9))]
    level: Option<u32>,

    /// Override the profile's compressed size limit, in bytes.
    #[arg(long)]
    max_compressed_bytes: Option<u64>,

    /// Override the profile's uncompressed size limit, in bytes.
    #[arg(long)]
    max_uncompressed_bytes: Option<u64>,

    /// Override the profile's file count limit.
    #[arg(long)]
    max_file_count: Option<u64>,

    /// Output directory for artifacts and reports.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Follow symbolic links while scanning.
    #[arg(long)]
    follow_links: bool,

    /// Run the strategies but write nothing.
    #[arg(long)]
    dry_run: bool,

    /// Print build reports as JSON.
    #[arg(long)]
    json: bool,
}

/// One function's scan and build result.
struct FunctionBuild {
    name: String,
    descriptor: ArtifactDescriptor,
    result: std::result::Result<Packaged, PackError>,
}

impl FunctionBuild {
    fn outcome(&self) -> Option<&ChainOutcome> {
        match &self.result {
            Ok(packaged) => Some(&packaged.outcome),
            Err(err) => err.outcome(),
        }
    }
}

/// JSON report written next to each artifact.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildReport<'a> {
    function: &'a str,
    profile: &'a PlatformProfile,
    selected_strategy: Option<&'a str>,
    artifact: Option<&'a CompressedArtifact>,
    deferred_paths: &'a [String],
    error: Option<String>,
    entries: &'a [FileEntry],
    attempts: Option<&'a ChainOutcome>,
}

impl<'a> BuildReport<'a> {
    fn new(build: &'a FunctionBuild, profile: &'a PlatformProfile) -> Self {
        let packaged = build.result.as_ref().ok();
        BuildReport {
            function: &build.name,
            profile,
            selected_strategy: packaged
                .and_then(|p| p.selected())
                .map(|r| r.strategy_name()),
            artifact: packaged.map(|p| &p.artifact),
            deferred_paths: packaged.map(|p| p.deferred_paths()).unwrap_or_default(),
            error: build.result.as_ref().err().map(|e| e.to_string()),
            entries: build.descriptor.entries(),
            attempts: build.outcome(),
        }
    }
}

/// # Handle Build Command (`handle_build`)
///
/// ## Returns
///
/// * `Result<()>`: `Ok(())` if every function was packaged; an `Err` if
///   configuration is invalid, a directory cannot be scanned, outputs cannot
///   be written, or at least one function exhausted its strategies.
pub async fn handle_build(args: BuildArgs) -> Result<()> {
    info!("Handling build command...");
    debug!("Build args: {:?}", args);

    let cfg = config::load_config().context("Failed to load fnpack configuration")?;
    let cfg = apply_overrides(cfg, &args);
    config::validate_config(&cfg).context("Invalid build options")?;

    let profile = Arc::new(cfg.platform_profile()?);
    let strategies = Arc::new(cfg.strategies()?);
    let builder = Arc::new(ArtifactBuilder::with_codec(DefaultCodec::new(
        cfg.packaging.compression_level,
    )));
    let out_dir = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.output.directory));
    let scan_options = tree::ScanOptions {
        follow_links: args.follow_links,
    };

    let targets = resolve_targets(&args.dirs)?;
    info!(
        "Packaging {} function(s) for profile '{}'",
        targets.len(),
        profile.name
    );

    let tasks = targets.into_iter().map(|(name, dir)| {
        let profile = Arc::clone(&profile);
        let strategies = Arc::clone(&strategies);
        let builder = Arc::clone(&builder);
        let scan_options = scan_options.clone();
        tokio::task::spawn_blocking(move || -> Result<FunctionBuild> {
            let descriptor = tree::scan_tree(&dir, &scan_options)?;
            let result = builder.build(&descriptor, &profile, &strategies);
            Ok(FunctionBuild {
                name,
                descriptor,
                result,
            })
        })
    });

    let mut builds = Vec::new();
    for joined in join_all(tasks).await {
        builds.push(joined.context("Packaging task panicked")??);
    }

    if args.json {
        let reports: Vec<_> = builds.iter().map(|b| BuildReport::new(b, &profile)).collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    let mut failed = Vec::new();
    for build in &builds {
        if !args.json {
            print_build(build, &profile);
        }
        if !args.dry_run {
            for path in write_outputs(build, &profile, &out_dir)? {
                if args.json {
                    info!("Wrote {}", path.display());
                } else {
                    println!("  wrote {}", path.display());
                }
            }
        }
        if build.result.is_err() {
            failed.push(build.name.as_str());
        }
    }

    if !failed.is_empty() {
        anyhow::bail!(
            "{} of {} function(s) could not be packaged: {}",
            failed.len(),
            builds.len(),
            failed.join(", ")
        );
    }
    info!("All functions packaged successfully");
    Ok(())
}

/// Layers command-line options over the loaded configuration.
fn apply_overrides(mut cfg: Config, args: &BuildArgs) -> Config {
    if let Some(profile) = &args.profile {
        cfg.profile.name = profile.clone();
    }
    if args.max_compressed_bytes.is_some() {
        cfg.profile.max_compressed_bytes = args.max_compressed_bytes;
    }
    if args.max_uncompressed_bytes.is_some() {
        cfg.profile.max_uncompressed_bytes = args.max_uncompressed_bytes;
    }
    if args.max_file_count.is_some() {
        cfg.profile.max_file_count = args.max_file_count;
    }
    if !args.strategies.is_empty() {
        cfg.packaging.strategies = args.strategies.clone();
    }
    if !args.exclude.is_empty() {
        cfg.packaging.exclude = args.exclude.clone();
    }
    if !args.defer.is_empty() {
        cfg.packaging.defer = args.defer.clone();
    }
    if let Some(level) = args.level {
        cfg.packaging.compression_level = level;
    }
    cfg
}

/// Names each directory after its final path component, rejecting clashes.
fn resolve_targets(dirs: &[PathBuf]) -> Result<Vec<(String, PathBuf)>> {
    let mut seen = HashSet::new();
    let mut targets = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let canonical = std::fs::canonicalize(dir)
            .with_context(|| format!("Function directory not found: {}", dir.display()))?;
        let name = canonical
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "function".to_string());
        if !seen.insert(name.clone()) {
            anyhow::bail!(PackError::InvalidInput(format!(
                "two function directories are both named '{}'",
                name
            )));
        }
        targets.push((name, canonical));
    }
    Ok(targets)
}

fn print_build(build: &FunctionBuild, profile: &PlatformProfile) {
    match (&build.result, build.outcome()) {
        (_, Some(outcome)) => print!("{}", ui::render_summary(&build.name, profile, outcome)),
        (Err(err), None) => println!("{} [{}]: {}", build.name, profile.name, err),
        (Ok(_), None) => {}
    }
    if let Ok(packaged) = &build.result {
        println!(
            "  artifact: {} ({}, sha256 {})",
            ui::format_bytes(packaged.artifact.size()),
            packaged.artifact.format().extension(),
            packaged.artifact.digest()
        );
        let deferred = packaged.deferred_paths();
        if !deferred.is_empty() {
            println!("  deferred to a separate layer: {} file(s)", deferred.len());
        }
    }
}

/// Writes the artifact (if any) and the report, returning the paths written.
fn write_outputs(
    build: &FunctionBuild,
    profile: &PlatformProfile,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(2);
    if let Ok(packaged) = &build.result {
        let artifact_path = out_dir.join(format!(
            "{}.{}",
            build.name,
            packaged.artifact.format().extension()
        ));
        io::write_bytes_to_file(&artifact_path, packaged.artifact.bytes())?;
        written.push(artifact_path);
    } else {
        warn!("No artifact written for '{}'", build.name);
    }
    let report_path = out_dir.join(format!("{}.report.json", build.name));
    let report = serde_json::to_string_pretty(&BuildReport::new(build, profile))
        .context("Failed to serialize build report")?;
    io::write_string_to_file(&report_path, &report)?;
    written.push(report_path);
    Ok(written)
}
