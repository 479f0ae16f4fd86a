//! Integration tests for the docslint public API.
//!
//! These tests drive the crate the way a host editor integration would:
//! whole documents in, diagnostic lists out, keyed off the stable codes.

use docslint::applies_to::analyze_value;
use docslint::block_parser::parse_blocks;
use docslint::config::Settings;
use docslint::diagnostics::{codes, document_diagnostics};
use docslint::directives;
use docslint::substitution::parse_substitution;
use docslint::version::{compare_versions, parse_version_entry, Lifecycle};
use tower_lsp::lsp_types::{DiagnosticSeverity, NumberOrString, Position, Range};

fn codes_of(diagnostics: &[tower_lsp::lsp_types::Diagnostic]) -> Vec<String> {
    diagnostics
        .iter()
        .map(|d| match &d.code {
            Some(NumberOrString::String(code)) => code.clone(),
            other => panic!("expected string code, got {:?}", other),
        })
        .collect()
}

fn span() -> Range {
    Range {
        start: Position {
            line: 0,
            character: 0,
        },
        end: Position {
            line: 0,
            character: 1,
        },
    }
}

// ============================================================================
// Whole-document scenarios
// ============================================================================

#[test]
fn test_clean_document_has_no_diagnostics() {
    let text = r#"---
applies_to:
  stack: ga 9.1+
---
# Getting started

:::{note}
Everything here is {applies_to}`ga 9.1+`.
:::

::::{tab-set}
:::{tab-item} Linux
Install with the package manager.
:::
:::{tab-item} macOS
Install with homebrew.
:::
::::
"#;
    let diags = document_diagnostics(text, &Settings::default());
    assert!(diags.is_empty(), "expected clean document, got {:?}", codes_of(&diags));
}

#[test]
fn test_unclosed_block_yields_exactly_one_error() {
    let text = "# Title\n\n:::{warning}\nThis never closes.";
    let diags = document_diagnostics(text, &Settings::default());
    assert_eq!(codes_of(&diags), vec![codes::MISSING_CLOSING_DIRECTIVE]);
    assert_eq!(diags[0].severity, Some(DiagnosticSeverity::ERROR));
    assert_eq!(diags[0].range.start.line, 2);
}

#[test]
fn test_nested_fences_close_by_width() {
    let text = "::::{tab-set}\n:::{tab-item} One\ncontent\n:::\n::::";
    let lines: Vec<&str> = text.lines().collect();
    let parsed = parse_blocks(&lines);
    assert_eq!(parsed.blocks.len(), 2);
    assert_eq!(parsed.blocks[0].closing_line, Some(4), "outer closes last");
    assert_eq!(parsed.blocks[1].closing_line, Some(3), "inner closes first");

    let diags = document_diagnostics(text, &Settings::default());
    assert!(diags.is_empty(), "got {:?}", codes_of(&diags));
}

#[test]
fn test_mixed_document_reports_every_defect() {
    let text = r#"---
applies_to:
  stack: beta 9.5-9.2
  cloud: ga 9.0+
---
:::{dropdown}
:bogus: value
content
:::
"#;
    let diags = document_diagnostics(text, &Settings::default());
    let found = codes_of(&diags);
    for expected in [
        codes::MISSING_DIRECTIVE_ARGUMENT,
        codes::UNKNOWN_DIRECTIVE_PARAMETER,
        codes::INVALID_VERSION_RANGE,
        codes::UNKNOWN_APPLIES_KEY,
    ] {
        assert!(
            found.contains(&expected.to_string()),
            "expected {} in {:?}",
            expected,
            found
        );
    }
}

#[test]
fn test_diagnostics_are_deterministic() {
    let text = "---\napplies_to:\n  stack: ga 9.0+, beta 8.0+\n---\n:::{button}\nno link\n:::";
    let settings = Settings::default();
    let first = document_diagnostics(text, &settings);
    let second = document_diagnostics(text, &settings);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

// ============================================================================
// Version expression engine, from the consumer side
// ============================================================================

#[test]
fn test_version_entry_round_trips() {
    let entry = parse_version_entry("ga 9.1+").unwrap();
    assert_eq!(entry.lifecycle, Lifecycle::Ga);
    assert!(entry.is_unbound);
    assert_eq!(entry.start_version, Some(vec![9, 1]));
    assert_eq!(entry.end_version, None);

    let entry = parse_version_entry("removed =9.2").unwrap();
    assert!(entry.is_exact);
    assert_eq!(entry.start_version, Some(vec![9, 2]));
    assert_eq!(entry.end_version, Some(vec![9, 2]));
}

#[test]
fn test_compare_versions_pads_with_zero() {
    use std::cmp::Ordering;
    assert_eq!(compare_versions(&[9, 1], &[9, 1, 0]), Ordering::Equal);
    assert_eq!(compare_versions(&[9, 2], &[9, 1, 5]), Ordering::Greater);
}

#[test]
fn test_overlap_scenario_end_to_end() {
    let diags = analyze_value("ga 9.0-9.5, preview 9.3-9.8", span());
    assert_eq!(codes_of(&diags), vec![codes::OVERLAPPING_VERSIONS]);
    assert!(
        diags[0].message.contains("9.3"),
        "overlap point should be the larger start: {}",
        diags[0].message
    );
}

#[test]
fn test_multiple_unbound_scenario() {
    let diags = analyze_value("ga 9.0+, beta 8.0+", span());
    let warning = diags
        .iter()
        .find(|d| d.code == Some(NumberOrString::String(codes::MULTIPLE_UNBOUND_VERSIONS.into())))
        .expect("multiple-unbound warning expected");
    assert!(warning.message.contains('2'));
}

#[test]
fn test_bare_lifecycles_are_quiet() {
    assert!(analyze_value("ga", span()).is_empty());
    assert!(analyze_value("ga all", span()).is_empty());
}

// ============================================================================
// Registry and substitution surfaces
// ============================================================================

#[test]
fn test_registry_is_accessible() {
    let note = directives::lookup("note").expect("note should be registered");
    assert!(!note.has_argument);
    assert!(directives::all().count() >= 15);
}

#[test]
fn test_substitution_expression_accessible() {
    let expr = parse_substitution("product.version | M.M | trim");
    assert_eq!(expr.name, "product.version");
    assert_eq!(expr.mutations, vec!["M.M", "trim"]);
}
