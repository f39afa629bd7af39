//! # fnpack CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each `.rs` file
//! in that directory (that isn't a module like this one) is compiled as a
//! separate test crate.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;

/// # Get fnpack Command (`fnpack_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `fnpack` binary.
///
/// The user config directory is pointed at `isolated_home` so a developer's
/// own `~/.config/fnpack/config.toml` cannot leak into test runs, and
/// `RUST_LOG` / `FNPACK_PROFILE` are cleared.
///
/// ## Panics
/// Panics if the `fnpack` binary cannot be found via `Command::cargo_bin`.
pub fn fnpack_cmd(isolated_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fnpack").expect("Failed to find fnpack binary for testing");
    cmd.env("HOME", isolated_home)
        .env("XDG_CONFIG_HOME", isolated_home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("FNPACK_PROFILE");
    cmd
}

/// Writes `files` (relative path, content) under `root`, creating directories.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        fs::write(&path, content).expect("Failed to write fixture file");
    }
}
