//! Directive block validation.
//!
//! Takes one parsed [`DirectiveBlock`](crate::block_parser::DirectiveBlock)
//! and checks it against the static registry. Rules run independently and
//! all apply, with one exception: a block with no closing fence produces a
//! single Error and nothing else, because further checks are meaningless
//! without a closing boundary.

use once_cell::sync::Lazy;
use regex::Regex;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity};

use crate::block_parser::{line_range, DirectiveBlock};
use crate::config::Settings;
use crate::diagnostics::{codes, make_diagnostic};
use crate::directives;

/// Exactly one `[text](url)` Markdown link and nothing else.
static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[^\]]+\]\([^()\s]+\)$").unwrap());

/// Validates one block against the registry. Diagnostics come back in rule
/// order; the caller concatenates them across blocks.
pub fn validate_block(
    block: &DirectiveBlock,
    lines: &[&str],
    settings: &Settings,
) -> Vec<Diagnostic> {
    let opening = line_range(lines, block.opening_line);

    if !block.is_closed() {
        return vec![make_diagnostic(
            opening,
            DiagnosticSeverity::ERROR,
            codes::MISSING_CLOSING_DIRECTIVE,
            format!(
                "Directive `{}` opened with {} colons is never closed",
                block.name, block.opening_colon_count
            ),
        )];
    }

    let mut diagnostics = Vec::new();

    if let Some(closing) = block.closing_colon_count {
        if closing != block.opening_colon_count {
            diagnostics.push(make_diagnostic(
                opening,
                DiagnosticSeverity::ERROR,
                codes::MISMATCHED_FENCE_WIDTH,
                format!(
                    "Directive `{}` opens with {} colons but closes with {}",
                    block.name, block.opening_colon_count, closing
                ),
            ));
        }
    }

    let definition = directives::lookup(&block.name);

    match definition {
        None => {
            if settings.unknown_directive_warnings {
                diagnostics.push(make_diagnostic(
                    opening,
                    DiagnosticSeverity::WARNING,
                    codes::UNKNOWN_DIRECTIVE,
                    format!("Unknown directive `{}`", block.name),
                ));
            }
        }
        Some(definition) => {
            if definition.has_argument && block.argument.is_none() {
                diagnostics.push(make_diagnostic(
                    opening,
                    DiagnosticSeverity::ERROR,
                    codes::MISSING_DIRECTIVE_ARGUMENT,
                    format!("Directive `{}` requires an argument", block.name),
                ));
            }

            for parameter in &block.parameters {
                if !definition.allowed_params.contains(&parameter.name.as_str()) {
                    diagnostics.push(make_diagnostic(
                        parameter.range,
                        DiagnosticSeverity::WARNING,
                        codes::UNKNOWN_DIRECTIVE_PARAMETER,
                        format!(
                            "Directive `{}` does not take a `{}` parameter",
                            block.name, parameter.name
                        ),
                    ));
                }
            }
        }
    }

    if block.name == "button" {
        if let Some(diag) = check_button_content(block, lines) {
            diagnostics.push(diag);
        }
    }

    if block.is_malformed {
        let message = if block.missing_closing_brace {
            format!(
                "Malformed directive opening: `{{{}` is missing its closing `}}`",
                block.name
            )
        } else {
            format!(
                "Malformed directive opening: `{}` must be wrapped in braces, `{{{}}}`",
                block.name, block.name
            )
        };
        diagnostics.push(make_diagnostic(
            opening,
            DiagnosticSeverity::ERROR,
            codes::MALFORMED_DIRECTIVE,
            message,
        ));
    }

    diagnostics
}

/// A button renders its content as the link label and target, so the body
/// must be exactly one `[text](url)` line.
fn check_button_content(block: &DirectiveBlock, lines: &[&str]) -> Option<Diagnostic> {
    let mut body = block
        .content_lines
        .iter()
        .filter_map(|&idx| {
            let trimmed = lines.get(idx)?.trim();
            (!trimmed.is_empty()).then_some((idx, trimmed))
        })
        .collect::<Vec<_>>();

    let valid = match body.as_slice() {
        &[(_, only)] => MARKDOWN_LINK.is_match(only),
        _ => false,
    };
    if valid {
        return None;
    }

    let range = body
        .pop()
        .map(|(idx, _)| line_range(lines, idx))
        .unwrap_or_else(|| line_range(lines, block.opening_line));
    Some(make_diagnostic(
        range,
        DiagnosticSeverity::ERROR,
        codes::INVALID_BUTTON_CONTENT,
        "Button content must be a single Markdown link: [text](url)".to_string(),
    ))
}
