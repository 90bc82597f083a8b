//! Size and duration formatting, and the build summary table.

use beacon_bundler::BuildManifest;
use console::Term;
use owo_colors::OwoColorize;
use std::time::Duration;

use super::colors_enabled;

/// Format a byte count with the largest fitting unit.
///
/// ```
/// use beacon_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;
    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format a duration as `ms`, seconds, or `Xm Ys`.
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print every script and stylesheet in the manifest with its size.
///
/// Public assets are only counted in the total.
pub fn print_build_summary(manifest: &BuildManifest, elapsed: Duration) {
    let width = (Term::stderr().size().1 as usize).clamp(20, 80);
    let rule = "─".repeat(width);
    let color = colors_enabled();

    if color {
        eprintln!("\n{}", "Build Summary".bold().underline());
    } else {
        eprintln!("\nBuild Summary");
    }
    eprintln!("{}", rule);

    for entry in manifest.scripts().chain(manifest.stylesheets()) {
        let size = format_size(entry.size);
        let marker = if entry.is_entry { " (entry)" } else { "" };
        if color {
            eprintln!(
                "  {} {} {}{}",
                "▸".blue(),
                entry.relative_path.bright_white().bold(),
                size.dimmed(),
                marker.dimmed()
            );
        } else {
            eprintln!("  ▸ {} {}{}", entry.relative_path, size, marker);
        }
    }

    eprintln!("{}", rule);
    let total = format!(
        "{} files, {} in {}",
        manifest.len(),
        format_size(manifest.total_size()),
        format_duration(elapsed)
    );
    if color {
        eprintln!("  {} {}", "Total:".bold(), total.green());
    } else {
        eprintln!("  Total: {}", total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_bundler::{AssetKind, ManifestEntry};

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1_572_864), "1.50 MB");
        assert_eq!(format_size(2_147_483_648), "2.00 GB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
    }

    #[test]
    fn test_print_build_summary() {
        let manifest = BuildManifest::new(vec![
            ManifestEntry::new("assets/index-abc.js", AssetKind::Js, true, 15_234),
            ManifestEntry::new("assets/styles.css", AssetKind::Css, true, 3_100),
            ManifestEntry::new("favicon.ico", AssetKind::Other, false, 900),
        ]);
        print_build_summary(&manifest, Duration::from_millis(420));
        print_build_summary(&BuildManifest::default(), Duration::ZERO);
    }
}
