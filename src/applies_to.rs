//! Semantic analysis of applies_to values.
//!
//! One applies_to value is a comma list of lifecycle+version clauses, e.g.
//! `ga 9.1+, preview 9.0-9.1`. The analyzer parses each clause and runs a
//! fixed sequence of checks over the list: implicit-syntax hints, multiple
//! unbound entries, inverted ranges, an exact-version `removed` standing as
//! the final state, and overlapping coverage. All checks are pure functions
//! of the entry list; identical input yields an identical diagnostic list.

use std::cmp::Ordering;

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Range};

use crate::diagnostics::{codes, make_diagnostic};
use crate::version::{
    compare_versions, format_version, parse_version_entry, Lifecycle, ParsedVersionEntry, Version,
};

/// Analyzes one raw applies_to value.
///
/// The value is comma-split and trimmed; clauses that do not start with a
/// lifecycle word become Errors, and the surviving entries go through
/// [`analyze_entries`]. `range` is the span of the value in its document and
/// is attached to every diagnostic.
pub fn analyze_value(value: &str, range: Range) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut entries = Vec::new();

    for raw in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match parse_version_entry(raw) {
            Some(entry) => entries.push(entry),
            None => diagnostics.push(make_diagnostic(
                range,
                DiagnosticSeverity::ERROR,
                codes::INVALID_LIFECYCLE,
                format!(
                    "`{}` does not start with a lifecycle state (expected one of: {})",
                    raw,
                    Lifecycle::all()
                        .iter()
                        .map(|l| l.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )),
        }
    }

    diagnostics.extend(analyze_entries(&entries, range));
    diagnostics
}

/// Runs the semantic checks over an already-parsed entry list.
///
/// Diagnostics are emitted in a fixed order: implicit-syntax hint, multiple
/// unbound entries, invalid ranges, removed-exact-as-highest, overlap.
pub fn analyze_entries(entries: &[ParsedVersionEntry], range: Range) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let implicit_count = entries.iter().filter(|e| e.is_implicit()).count();
    let versioned_count = entries.iter().filter(|e| e.start_version.is_some()).count();
    let all_implicit = versioned_count > 0 && implicit_count == versioned_count;

    if implicit_count > 0 {
        let message = if all_implicit {
            "All version entries use implicit syntax; consider converting the set to \
             explicit ranges (`A-B`) so coverage is unambiguous"
                .to_string()
        } else {
            "Some version entries use implicit syntax; pick `+` (this version and later) \
             or `=` (exactly this version) for each"
                .to_string()
        };
        diagnostics.push(make_diagnostic(
            range,
            DiagnosticSeverity::HINT,
            codes::IMPLICIT_VERSION_SYNTAX,
            message,
        ));
    }

    // Bare-word and `all` entries cover every version by definition, so only
    // unbound entries with a start version can stack up ambiguously.
    let unbound_count = entries
        .iter()
        .filter(|e| e.is_unbound && e.start_version.is_some())
        .count();
    if unbound_count > 1 && !all_implicit {
        diagnostics.push(make_diagnostic(
            range,
            DiagnosticSeverity::WARNING,
            codes::MULTIPLE_UNBOUND_VERSIONS,
            format!(
                "{unbound_count} entries have no upper version bound; at most one lifecycle \
                 can apply from a version onwards"
            ),
        ));
    }

    for entry in entries.iter().filter(|e| e.is_range) {
        if let (Some(start), Some(end)) = (&entry.start_version, &entry.end_version) {
            if compare_versions(start, end) == Ordering::Greater {
                diagnostics.push(make_diagnostic(
                    range,
                    DiagnosticSeverity::WARNING,
                    codes::INVALID_VERSION_RANGE,
                    format!(
                        "Invalid range `{}`: {} is greater than {}",
                        entry.version_spec.as_deref().unwrap_or_default(),
                        format_version(start),
                        format_version(end),
                    ),
                ));
            }
        }
    }

    if let Some(diag) = removed_exact_as_highest(entries, range) {
        diagnostics.push(diag);
    }

    if !all_implicit {
        if let Some(diag) = first_overlap(entries, range) {
            diagnostics.push(diag);
        }
    }

    diagnostics
}

/// Hints when the entry with the highest effective version is an exact
/// `removed =X`. Removal in exactly one version is rarely the intent when it
/// is also the latest state; `removed X+` usually is. Ties keep the first
/// entry encountered.
fn removed_exact_as_highest(
    entries: &[ParsedVersionEntry],
    range: Range,
) -> Option<Diagnostic> {
    let mut highest: Option<&ParsedVersionEntry> = None;
    for entry in entries {
        let Some(version) = entry.effective_version() else {
            continue;
        };
        match highest.and_then(ParsedVersionEntry::effective_version) {
            Some(best) if compare_versions(version, best) != Ordering::Greater => {}
            _ => highest = Some(entry),
        }
    }

    let highest = highest?;
    if highest.lifecycle != Lifecycle::Removed || !highest.is_exact {
        return None;
    }

    let version = format_version(highest.effective_version()?);
    Some(make_diagnostic(
        range,
        DiagnosticSeverity::HINT,
        codes::REMOVED_EXACT_VERSION,
        format!(
            "`removed ={version}` only applies to version {version} itself; if the feature \
             stays removed, use `removed {version}+`"
        ),
    ))
}

/// Reports the first pair of entries whose version coverage intersects.
///
/// Entries without a start version (bare word, `all`, unparseable bound)
/// never participate. An absent end means "to infinity" and is modeled as
/// the explicit `None` below rather than a sentinel tuple. Only the first
/// overlap (ascending `i`, then first `j > i`) is reported.
fn first_overlap(entries: &[ParsedVersionEntry], range: Range) -> Option<Diagnostic> {
    let bounded: Vec<(&Version, Option<&Version>)> = entries
        .iter()
        .filter_map(|e| e.start_version.as_ref().map(|s| (s, e.end_version.as_ref())))
        .collect();

    for i in 0..bounded.len() {
        for j in (i + 1)..bounded.len() {
            let (a_start, a_end) = bounded[i];
            let (b_start, b_end) = bounded[j];
            if starts_before_end(a_start, b_end) && starts_before_end(b_start, a_end) {
                let at = match compare_versions(a_start, b_start) {
                    Ordering::Less => b_start,
                    _ => a_start,
                };
                return Some(make_diagnostic(
                    range,
                    DiagnosticSeverity::WARNING,
                    codes::OVERLAPPING_VERSIONS,
                    format!(
                        "Version coverage overlaps starting at {}",
                        format_version(at)
                    ),
                ));
            }
        }
    }
    None
}

/// `start <= end`, where an absent end is unbounded and admits everything.
fn starts_before_end(start: &[u32], end: Option<&Version>) -> bool {
    match end {
        None => true,
        Some(end) => compare_versions(start, end) != Ordering::Greater,
    }
}
