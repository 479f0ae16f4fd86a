//! Document diagnostics.
//!
//! The single entry point the host editor calls: one document's text in,
//! one ordered diagnostic list out. Directive-block validation and
//! applies_to analysis run as independent streams and merge here; both are
//! pure, so identical text always produces an identical list.

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Range};

use crate::block_parser::parse_blocks;
use crate::config::Settings;
use crate::frontmatter::{self, Frontmatter};
use crate::substitution::find_substitutions;
use crate::validate::validate_block;

/// Stable machine-readable diagnostic codes. Downstream quick-fix tooling
/// and the test suite key off these strings; do not rename them.
pub mod codes {
    pub const MISSING_CLOSING_DIRECTIVE: &str = "missing_closing_directive";
    pub const MISMATCHED_FENCE_WIDTH: &str = "mismatched_fence_width";
    pub const UNKNOWN_DIRECTIVE: &str = "unknown_directive";
    pub const MISSING_DIRECTIVE_ARGUMENT: &str = "missing_directive_argument";
    pub const UNKNOWN_DIRECTIVE_PARAMETER: &str = "unknown_directive_parameter";
    pub const INVALID_BUTTON_CONTENT: &str = "invalid_button_content";
    pub const MALFORMED_DIRECTIVE: &str = "malformed_directive";
    pub const INVALID_LIFECYCLE: &str = "invalid_lifecycle";
    pub const IMPLICIT_VERSION_SYNTAX: &str = "implicit_version_syntax";
    pub const MULTIPLE_UNBOUND_VERSIONS: &str = "multiple_unbound_versions";
    pub const INVALID_VERSION_RANGE: &str = "invalid_version_range";
    pub const REMOVED_EXACT_VERSION: &str = "removed_exact_version";
    pub const OVERLAPPING_VERSIONS: &str = "overlapping_versions";
    pub const UNKNOWN_APPLIES_KEY: &str = "unknown_applies_key";
    pub const UNKNOWN_SUBSTITUTION: &str = "unknown_substitution";
}

/// Builds one diagnostic with the crate's source tag and a stable code.
pub fn make_diagnostic(
    range: Range,
    severity: DiagnosticSeverity,
    code: &str,
    message: String,
) -> Diagnostic {
    Diagnostic {
        range,
        severity: Some(severity),
        code: Some(NumberOrString::String(code.to_string())),
        source: Some("docslint".into()),
        message,
        ..Default::default()
    }
}

/// Computes every diagnostic for one document.
///
/// Directive diagnostics come first in block-discovery order, then the
/// applies_to stream in document order, then substitution checks when
/// enabled. The caller hands the host editor the list as-is.
pub fn document_diagnostics(text: &str, settings: &Settings) -> Vec<Diagnostic> {
    let lines: Vec<&str> = text.lines().collect();
    let parsed = parse_blocks(&lines);

    let mut diagnostics = Vec::new();

    if settings.directive_diagnostics {
        for block in &parsed.blocks {
            diagnostics.extend(validate_block(block, &lines, settings));
        }
    }

    if settings.applies_to_diagnostics {
        let mut applies = frontmatter::applies_diagnostics(&lines, &parsed);
        if !settings.implicit_syntax_hints {
            applies.retain(|d| {
                d.code
                    != Some(NumberOrString::String(
                        codes::IMPLICIT_VERSION_SYNTAX.to_string(),
                    ))
            });
        }
        diagnostics.extend(applies);
    }

    if settings.substitution_diagnostics {
        let known = Frontmatter::new(text).unwrap_or_default().sub;
        diagnostics.extend(substitution_diagnostics(&lines, |name| {
            known.contains_key(name)
        }));
    }

    diagnostics
}

/// Warns for `{{name}}` references whose variable is not defined. The
/// resolved substitution set lives with the host (docset configuration plus
/// frontmatter), so the known-name predicate is the caller's.
pub fn substitution_diagnostics(
    lines: &[&str],
    is_known: impl Fn(&str) -> bool,
) -> Vec<Diagnostic> {
    find_substitutions(lines)
        .into_iter()
        .filter(|(expr, _)| !is_known(&expr.name))
        .map(|(expr, range)| {
            make_diagnostic(
                range,
                DiagnosticSeverity::WARNING,
                codes::UNKNOWN_SUBSTITUTION,
                format!("Unknown substitution `{}`", expr.name),
            )
        })
        .collect()
}
