//! # fnpack UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Small helpers for presenting packaging results in the terminal: human
//! readable byte sizes and the per-function summary block printed by
//! `fnpack build`.
//!
use crate::packaging::{ChainOutcome, PlatformProfile};

const UNITS: [&str; 5] = ["B", "kB", "MB", "GB", "TB"];

/// Formats a byte count with decimal units and one fractional digit
/// (`1_200_000` -> `"1.2 MB"`). Counts below 1000 are printed exactly.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1000 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Renders the summary printed after packaging one function.
pub fn render_summary(function: &str, profile: &PlatformProfile, outcome: &ChainOutcome) -> String {
    let status = match outcome.terminal() {
        Some(selected) => format!("packaged with {}", selected.strategy_name()),
        None => "FAILED, no strategy fit".to_string(),
    };
    let mut out = format!("{} [{}]: {}\n", function, profile.name, status);
    out.push_str(&outcome.to_string());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(999), "999 B");
        assert_eq!(format_bytes(1000), "1.0 kB");
        assert_eq!(format_bytes(1_200_000), "1.2 MB");
        assert_eq!(format_bytes(52_428_800), "52.4 MB");
        assert_eq!(format_bytes(3_000_000_000), "3.0 GB");
    }

    #[test]
    fn test_render_summary_failure() {
        let profile = PlatformProfile::new("edge-worker", 1, 1, 1);
        let text = render_summary("api", &profile, &ChainOutcome::default());
        assert!(text.starts_with("api [edge-worker]: FAILED"));
    }

    #[test]
    fn test_render_summary_lists_attempts() {
        use crate::packaging::{ArtifactBuilder, ArtifactDescriptor, CompressionStrategy, FileEntry};

        let descriptor = ArtifactDescriptor::new(vec![FileEntry::inline("a.js", "x")]).unwrap();
        let profile = PlatformProfile::new("p", 100, 100, 10);
        let packaged = ArtifactBuilder::new()
            .build(&descriptor, &profile, &[CompressionStrategy::StoreRaw])
            .unwrap();
        let text = render_summary("api", &profile, &packaged.outcome);
        assert_eq!(
            text,
            "api [p]: packaged with store-raw\n  * store-raw: ok, 1 B (1 B uncompressed, 1 files)\n"
        );
    }
}
