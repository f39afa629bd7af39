//! # fnpack Profiles Command
//!
//! File: cli/src/commands/profiles.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `fnpack profiles`, which prints the platform profiles fnpack
//! knows by name and the limits each one enforces.
//!
//! ```bash
//! fnpack profiles
//! fnpack profiles --json
//! ```
//!
use clap::Parser;
use fnpack::common::ui::format_bytes;
use fnpack::core::error::Result;
use fnpack::packaging::{builtin_profiles, PlatformProfile};
use tracing::info;

/// Arguments for `fnpack profiles`.
#[derive(Parser, Debug)]
pub struct ProfilesArgs {
    /// Print the profiles as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

/// Handles `fnpack profiles`.
pub async fn handle_profiles(args: ProfilesArgs) -> Result<()> {
    info!("Listing built-in platform profiles");
    let profiles = builtin_profiles();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
    } else {
        print!("{}", render_table(&profiles));
    }
    Ok(())
}

fn render_table(profiles: &[PlatformProfile]) -> String {
    let mut out = format!(
        "{:<18} {:>12} {:>14} {:>10}\n",
        "PROFILE", "COMPRESSED", "UNCOMPRESSED", "FILES"
    );
    for profile in profiles {
        out.push_str(&format!(
            "{:<18} {:>12} {:>14} {:>10}\n",
            profile.name,
            format_bytes(profile.max_compressed_bytes),
            format_bytes(profile.max_uncompressed_bytes),
            profile.max_file_count
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_lists_every_profile() {
        let table = render_table(&builtin_profiles());
        assert!(table.starts_with("PROFILE"));
        for profile in builtin_profiles() {
            assert!(table.contains(&profile.name));
        }
        assert!(table.contains("52.4 MB"));
    }
}
