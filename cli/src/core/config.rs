//! # fnpack Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module loads, merges and validates fnpack's configuration: which
//! platform profile to package for, which strategies to try in which order,
//! the exclusion and deferral patterns, the compression level and where
//! artifacts are written.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags (applied by the command handlers on top of this).
//! 2. Project-specific `.fnpack.toml` in the current directory or an ancestor
//!    (the search stops at the first directory containing `.git`).
//! 3. User-specific `config.toml` in the platform config directory.
//! 4. Default values defined in the code.
//!
//! ## Examples
//!
//! ```toml
//! [profile]
//! name = "aws-lambda"
//! max_compressed_bytes = 10485760
//!
//! [packaging]
//! strategies = ["gzip-single-file", "zip-archive", "zip-with-exclusions"]
//! exclude = ["tests/", "*.md"]
//! compression_level = 9
//!
//! [output]
//! directory = "~/builds/functions"
//! ```
//!
use crate::core::error::{PackError, Result};
use crate::packaging::{
    builtin_profile, codec::DEFAULT_LEVEL, resolve_strategies, CompressionStrategy, PathMatcher,
    PlatformProfile, StrategyKind,
};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::HashSet;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// The resolved configuration: built-in defaults with every config file
/// layered on top.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Config {
    pub profile: ProfileConfig,
    pub packaging: PackagingConfig,
    pub output: OutputConfig,
}

/// Which platform to package for, with optional per-limit overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileConfig {
    /// Name of a built-in profile.
    pub name: String,
    pub max_compressed_bytes: Option<u64>,
    pub max_uncompressed_bytes: Option<u64>,
    pub max_file_count: Option<u64>,
}

/// Strategy order and the predicates strategies use.
#[derive(Debug, Clone, PartialEq)]
pub struct PackagingConfig {
    pub strategies: Vec<StrategyKind>,
    /// Patterns dropped by `zip-with-exclusions`.
    pub exclude: Vec<String>,
    /// Patterns moved out of the core bundle by `layer-split`.
    pub defer: Vec<String>,
    pub compression_level: u32,
}

/// Where build results go.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    /// Output directory (can use ~). Will be expanded.
    pub directory: String,
}

/// One TOML configuration file as written. Only the keys a file sets are
/// `Some`, so layering a file never resets a value to its default.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub profile: ProfileFile,
    #[serde(default)]
    pub packaging: PackagingFile,
    #[serde(default)]
    pub output: OutputFile,
}

/// `[profile]` section.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProfileFile {
    pub name: Option<String>,
    pub max_compressed_bytes: Option<u64>,
    pub max_uncompressed_bytes: Option<u64>,
    pub max_file_count: Option<u64>,
}

/// `[packaging]` section.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PackagingFile {
    pub strategies: Option<Vec<StrategyKind>>,
    pub exclude: Option<Vec<String>>,
    pub defer: Option<Vec<String>>,
    pub compression_level: Option<u32>,
}

/// `[output]` section.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputFile {
    pub directory: Option<String>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        ProfileConfig {
            name: default_profile_name(),
            max_compressed_bytes: None,
            max_uncompressed_bytes: None,
            max_file_count: None,
        }
    }
}

impl Default for PackagingConfig {
    fn default() -> Self {
        PackagingConfig {
            strategies: default_strategies(),
            exclude: default_exclude(),
            defer: default_defer(),
            compression_level: default_compression_level(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            directory: default_output_dir(),
        }
    }
}

fn default_profile_name() -> String {
    "aws-lambda".to_string()
}
fn default_strategies() -> Vec<StrategyKind> {
    StrategyKind::ALL.to_vec()
}
fn default_exclude() -> Vec<String> {
    ["tests/", "test/", "__tests__/", "docs/", "*.md", "*.map"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_defer() -> Vec<String> {
    vec!["node_modules/".to_string()]
}
fn default_compression_level() -> u32 {
    DEFAULT_LEVEL
}
fn default_output_dir() -> String {
    "dist".to_string()
}

impl Config {
    /// Applies every value `file` sets on top of `self`.
    pub fn layer(mut self, file: ConfigFile) -> Self {
        let ConfigFile {
            profile,
            packaging,
            output,
        } = file;
        if let Some(name) = profile.name {
            self.profile.name = name;
        }
        if profile.max_compressed_bytes.is_some() {
            self.profile.max_compressed_bytes = profile.max_compressed_bytes;
        }
        if profile.max_uncompressed_bytes.is_some() {
            self.profile.max_uncompressed_bytes = profile.max_uncompressed_bytes;
        }
        if profile.max_file_count.is_some() {
            self.profile.max_file_count = profile.max_file_count;
        }
        if let Some(strategies) = packaging.strategies {
            self.packaging.strategies = strategies;
        }
        if let Some(exclude) = packaging.exclude {
            self.packaging.exclude = exclude;
        }
        if let Some(defer) = packaging.defer {
            self.packaging.defer = defer;
        }
        if let Some(level) = packaging.compression_level {
            self.packaging.compression_level = level;
        }
        if let Some(directory) = output.directory {
            self.output.directory = directory;
        }
        self
    }

    /// Resolves the configured profile: the named built-in plus any overrides.
    pub fn platform_profile(&self) -> std::result::Result<PlatformProfile, PackError> {
        Ok(builtin_profile(&self.profile.name)?.with_overrides(
            self.profile.max_compressed_bytes,
            self.profile.max_uncompressed_bytes,
            self.profile.max_file_count,
        ))
    }

    /// Compiles the configured strategy order with its predicates.
    pub fn strategies(&self) -> std::result::Result<Vec<CompressionStrategy>, PackError> {
        let exclude = PathMatcher::new(&self.packaging.exclude)?;
        let defer = PathMatcher::new(&self.packaging.defer)?;
        Ok(resolve_strategies(
            &self.packaging.strategies,
            &exclude,
            &defer,
        ))
    }
}

const PROJECT_CONFIG_FILENAME: &str = ".fnpack.toml";

/// Loads the user and project files and layers them over the defaults.
///
/// The result is not validated yet: command handlers apply their flag
/// overrides first and then call `validate_config`, so a flag can replace a
/// bad file value.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();
    if let Some(user) = load_user_config()? {
        config = config.layer(user);
    }
    if let Some(project) = load_project_config()? {
        config = config.layer(project);
    }
    expand_config_paths(&mut config).context("Failed to expand paths in configuration")?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<ConfigFile>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "fnpack", "fnpack") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigFile>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.fnpack.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

/// Reads and parses one TOML configuration file.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    config.output.directory = shellexpand::tilde(&config.output.directory).into_owned();
    debug!("Expanded output directory: {}", config.output.directory);
    Ok(())
}

/// Checks a merged configuration for values no build could use.
pub fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if config.packaging.compression_level > 9 {
        return Err(anyhow!(PackError::Config(format!(
            "compression_level must be between 0 and 9, got {}",
            config.packaging.compression_level
        ))));
    }
    if config.packaging.strategies.is_empty() {
        return Err(anyhow!(PackError::Config(
            "packaging.strategies must list at least one strategy".to_string()
        )));
    }
    let mut seen = HashSet::new();
    for kind in &config.packaging.strategies {
        if !seen.insert(kind) {
            return Err(anyhow!(PackError::Config(format!(
                "strategy '{}' is listed more than once",
                kind
            ))));
        }
    }
    if config.output.directory.trim().is_empty() {
        return Err(anyhow!(PackError::Config(
            "output.directory cannot be empty".to_string()
        )));
    }
    // Surfaces unknown profiles, zero limits and blank patterns.
    config
        .platform_profile()?
        .validate()
        .map_err(|e| PackError::Config(e.to_string()))?;
    config
        .strategies()
        .map_err(|e| PackError::Config(e.to_string()))?;
    info!("Configuration validation successful.");
    Ok(())
}
