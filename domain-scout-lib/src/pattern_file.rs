//! Pattern-file reader.
//!
//! Each useful line has the shape
//!
//! ```text
//! PATTERN [; key=value ...] [# comment]
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. The only recognised
//! key is `ext` (alias `extensions`), a comma-separated extension list.
//! Entries without one get the configured default extensions. Patterns and
//! extensions are not validated here; that happens when each entry is
//! analyzed, so a bad pattern only costs its own line.

use crate::config::split_list;
use crate::error::DomainScoutError;
use crate::types::PatternEntry;
use std::fs;
use std::path::Path;

/// Parse one line of a pattern file.
///
/// Returns `None` for blank and comment-only lines. `line_number` is
/// 1-based and only used in error messages.
///
/// # Examples
///
/// ```
/// use domain_scout_lib::parse_pattern_line;
///
/// let defaults = vec![".com".to_string()];
/// let entry = parse_pattern_line("cvcv; ext=.io,.ai # short", 1, &defaults)
///     .unwrap()
///     .unwrap();
/// assert_eq!(entry.pattern, "cvcv");
/// assert_eq!(entry.extensions, vec![".io", ".ai"]);
/// assert_eq!(entry.comment.as_deref(), Some("short"));
/// ```
pub fn parse_pattern_line(
    line: &str,
    line_number: usize,
    default_extensions: &[String],
) -> Option<Result<PatternEntry, DomainScoutError>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let (body, comment) = match trimmed.split_once('#') {
        Some((body, comment)) => (body, Some(comment.trim())),
        None => (trimmed, None),
    };

    let mut parts = body.split(';');
    let pattern = parts.next().unwrap_or_default().trim();
    if pattern.is_empty() {
        return Some(Err(DomainScoutError::pattern_file(
            line_number,
            "missing pattern before options",
        )));
    }

    let mut extensions: Option<Vec<String>> = None;
    for option in parts.map(str::trim).filter(|o| !o.is_empty()) {
        let Some((key, value)) = option.split_once('=') else {
            return Some(Err(DomainScoutError::pattern_file(
                line_number,
                format!("option '{}' is not key=value", option),
            )));
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "ext" | "extensions" => extensions = Some(split_list(value)),
            other => tracing::warn!(
                line = line_number,
                key = other,
                "ignoring unknown pattern option"
            ),
        }
    }

    let mut entry = PatternEntry::new(
        pattern,
        extensions.unwrap_or_else(|| default_extensions.to_vec()),
    );
    if let Some(comment) = comment.filter(|c| !c.is_empty()) {
        entry = entry.with_comment(comment);
    }
    Some(Ok(entry))
}

/// Parse every line of a pattern source, keeping per-line errors.
pub fn parse_pattern_source(
    text: &str,
    default_extensions: &[String],
) -> Vec<Result<PatternEntry, DomainScoutError>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| parse_pattern_line(line, i + 1, default_extensions))
        .collect()
}

/// Read and parse a pattern file.
///
/// The outer error covers reading the file; the inner results are per line.
pub fn load_pattern_file<P: AsRef<Path>>(
    path: P,
    default_extensions: &[String],
) -> Result<Vec<Result<PatternEntry, DomainScoutError>>, DomainScoutError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        DomainScoutError::file_error(
            path.to_string_lossy(),
            format!("Failed to read pattern file: {}", e),
        )
    })?;
    let entries = parse_pattern_source(&text, default_extensions);
    tracing::debug!(path = %path.display(), entries = entries.len(), "read pattern file");
    Ok(entries)
}
