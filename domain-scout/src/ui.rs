//! Display logic for the domain-scout CLI.
//!
//! Available domains go to stdout, everything else (pattern headers,
//! rejections, summaries) goes to stderr so stdout can be piped.

use console::{pad_str, style, Alignment};
use domain_scout_lib::{
    CacheStats, CombinationCount, DomainScoutError, HuntEvent, HuntSummary, PatternAnalysis,
    ProbeOutcome, SegmentKind,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

// ── Analysis ─────────────────────────────────────────────────────────────────

/// JSON shape of `--analyze --json`.
#[derive(Debug, Serialize)]
pub struct AnalysisReport<'a> {
    pub pattern: &'a str,
    pub extensions: &'a [String],
    pub segments: Vec<SegmentKind>,
    pub combination_count: CombinationCount,
    pub total_domain_count: CombinationCount,
    pub saturated: bool,
}

impl<'a> From<&'a PatternAnalysis> for AnalysisReport<'a> {
    fn from(analysis: &'a PatternAnalysis) -> Self {
        Self {
            pattern: &analysis.pattern,
            extensions: &analysis.extensions,
            segments: analysis.parts.kinds(),
            combination_count: analysis.combination_count,
            total_domain_count: analysis.total_domain_count,
            saturated: analysis.total_domain_count.is_saturated(),
        }
    }
}

/// Print the segment breakdown and counts for one pattern.
pub fn print_analysis(analysis: &PatternAnalysis) {
    let segments: Vec<String> = analysis.parts.kinds().iter().map(|k| k.to_string()).collect();

    println!(
        "{}  {}",
        style(&analysis.pattern).bold(),
        style(format!("[{}]", segments.join(", "))).dim()
    );
    println!(
        "  combinations: {}",
        style(analysis.combination_count).cyan()
    );
    println!(
        "  domains:      {}  {}",
        style(analysis.total_domain_count).cyan().bold(),
        style(format!("({})", analysis.extensions.join(", "))).dim()
    );
    if analysis.total_domain_count.is_saturated() {
        println!(
            "  {}",
            style("count exceeds u128 and cannot be enumerated").yellow()
        );
    }
}

// ── Hunt events ──────────────────────────────────────────────────────────────

/// Print one hunt event. Only available domains reach stdout.
pub fn print_event(event: &HuntEvent, json: bool) -> io::Result<()> {
    match event {
        HuntEvent::PatternStarted(analysis) => {
            if !json {
                eprintln!(
                    "{} {} {}",
                    style("▸").cyan(),
                    style(&analysis.pattern).bold(),
                    style(format!(
                        "{} domains across {}",
                        analysis.total_domain_count,
                        analysis.extensions.join(", ")
                    ))
                    .dim()
                );
            }
        }
        HuntEvent::PatternRejected { pattern, error } => print_rejected(pattern, error),
        HuntEvent::Checked(outcome) if outcome.success && outcome.available => {
            let mut stdout = io::stdout().lock();
            if json {
                writeln!(stdout, "{}", serde_json::to_string(outcome)?)?;
            } else {
                writeln!(stdout, "{}", format_available(outcome))?;
            }
        }
        HuntEvent::Checkpoint { bits_set } => {
            tracing::debug!(bits_set, "checkpoint");
        }
        _ => {}
    }
    Ok(())
}

fn format_available(outcome: &ProbeOutcome) -> String {
    let padded = pad_str(&outcome.domain, 30, Alignment::Left, Some(".."));
    format!(
        "  {}  {}",
        style(padded).white(),
        style("AVAILABLE").green().bold()
    )
}

pub fn print_rejected(pattern: &str, error: &DomainScoutError) {
    eprintln!(
        "{} {}: {}",
        style("✗").red(),
        style(pattern).bold(),
        style(error).red()
    );
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), style(message).yellow());
}

// ── Summary ──────────────────────────────────────────────────────────────────

pub fn print_summary(summary: &HuntSummary, duration: Duration) {
    eprintln!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    eprintln!(
        "  {} checked in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(summary.checked).bold(),
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", summary.available)).green(),
        style("|").dim(),
        style(format!("{} skipped (cached)", summary.skipped_cached)).dim(),
        style("|").dim(),
        style(format!("{} failed", summary.failed)).yellow(),
    );
    if summary.cancelled {
        eprintln!("  {}", style("Stopped early; progress was saved.").yellow());
    }
}

pub fn print_cache_stats(stats: &CacheStats, path: Option<&Path>) {
    let location = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "not persisted".to_string());
    eprintln!(
        "  cache: {} of {} bits set ({:.3}%)  {}",
        stats.bits_set,
        stats.capacity,
        fill_percent(stats),
        style(location).dim()
    );
}

fn fill_percent(stats: &CacheStats) -> f64 {
    if stats.capacity == 0 {
        0.0
    } else {
        stats.bits_set as f64 * 100.0 / stats.capacity as f64
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use domain_scout_lib::{analyze_pattern, PatternEntry};

    #[test]
    fn test_analysis_report_json() {
        let entry = PatternEntry::new("ll", vec![".com".into(), ".net".into(), ".org".into()]);
        let analysis = analyze_pattern(&entry).unwrap();
        let json = serde_json::to_value(AnalysisReport::from(&analysis)).unwrap();

        assert_eq!(json["pattern"], "ll");
        assert_eq!(json["segments"], serde_json::json!(["letter", "letter"]));
        assert_eq!(json["combination_count"], 676);
        assert_eq!(json["total_domain_count"], 2028);
        assert_eq!(json["saturated"], false);
    }

    #[test]
    fn test_format_available_contains_domain() {
        let outcome = ProbeOutcome::answered("brava.io", true, Duration::from_millis(12));
        let line = format_available(&outcome);
        assert!(line.contains("brava.io"));
        assert!(line.contains("AVAILABLE"));
    }

    #[test]
    fn test_fill_percent() {
        let stats = CacheStats {
            capacity: 200,
            bits_set: 50,
        };
        assert!((fill_percent(&stats) - 25.0).abs() < f64::EPSILON);
    }
}
