//! applies_to discovery.
//!
//! applies_to values appear in three places: the YAML-like frontmatter head
//! (`applies_to:` mapping), inline roles (`` {applies_to}`ga 9.1` ``) in
//! the body, and the content of `:::{applies_to}` directive blocks. This
//! module finds each occurrence, checks the key against the known set, and
//! hands the value to the analyzer. The frontmatter scan is deliberately
//! line-oriented rather than a full YAML parse — diagnostics need the exact
//! source line of every value.

use std::collections::HashMap;

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};

use crate::applies_to::analyze_value;
use crate::block_parser::ParsedBlocks;
use crate::diagnostics::{codes, make_diagnostic};

/// Keys an applies_to mapping may use, at any nesting level.
pub const KNOWN_APPLIES_KEYS: &[&str] = &[
    "stack",
    "deployment",
    "serverless",
    "product",
    "ece",
    "eck",
    "ess",
    "self",
    "elasticsearch",
    "observability",
    "security",
];

/// Structured frontmatter fields the rest of the system consumes.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Frontmatter {
    /// Substitution definitions local to this document.
    #[serde(default)]
    pub sub: HashMap<String, String>,
}

impl Frontmatter {
    /// Parses the `--- ... ---` head of a document, if present and valid.
    pub fn new(text: &str) -> Option<Frontmatter> {
        static HEAD: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^---\n(?<head>(\n|.)*?)\n---").unwrap());

        let head = HEAD.captures(text)?.name("head")?;
        serde_yaml::from_str(head.as_str()).ok()
    }
}

static KEY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?<indent>\s*)(?<key>[A-Za-z_][A-Za-z0-9_.-]*):(?:\s+(?<value>.*?))?\s*$")
        .unwrap()
});

static INLINE_ROLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{applies_to\}`(?<value>[^`]*)`").unwrap());

/// Runs every applies_to check over one document: frontmatter mapping,
/// inline roles, and applies_to directive blocks, in that order.
pub fn applies_diagnostics(lines: &[&str], parsed: &ParsedBlocks) -> Vec<Diagnostic> {
    let mut diagnostics = frontmatter_applies(lines);
    diagnostics.extend(inline_role_applies(lines));
    diagnostics.extend(block_applies(lines, parsed));
    diagnostics
}

/// Scans the frontmatter `applies_to:` section line by line.
fn frontmatter_applies(lines: &[&str]) -> Vec<Diagnostic> {
    let Some(end) = frontmatter_end(lines) else {
        return Vec::new();
    };

    // The section opens at a zero-indent `applies_to:` line and runs while
    // indentation stays positive.
    let Some(start) = (1..end).find(|&i| {
        KEY_VALUE
            .captures(lines[i])
            .is_some_and(|c| c["indent"].is_empty() && &c["key"] == "applies_to")
    }) else {
        return Vec::new();
    };

    let section = (start + 1..end)
        .take_while(|&i| {
            lines[i].trim().is_empty() || lines[i].starts_with(' ') || lines[i].starts_with('\t')
        })
        .collect_vec();

    let mut diagnostics = Vec::new();
    for i in section {
        diagnostics.extend(scan_applies_line(lines, i));
    }
    diagnostics
}

/// Index of the closing `---`, or None when the document has no frontmatter.
fn frontmatter_end(lines: &[&str]) -> Option<usize> {
    if lines.first().map(|l| l.trim_end()) != Some("---") {
        return None;
    }
    (1..lines.len()).find(|&i| lines[i].trim_end() == "---")
}

/// Checks one `key: value` line of an applies_to mapping: unknown keys warn,
/// scalar values go through the analyzer. Lines that are not `key: value`
/// (list items, prose) are left alone.
fn scan_applies_line(lines: &[&str], idx: usize) -> Vec<Diagnostic> {
    let line = lines[idx];
    let Some(caps) = KEY_VALUE.captures(line) else {
        return Vec::new();
    };

    let mut diagnostics = Vec::new();
    let key = caps.name("key").expect("key group always present");
    if !KNOWN_APPLIES_KEYS.contains(&key.as_str()) {
        let start = line[..key.start()].chars().count() as u32;
        let range = Range {
            start: Position {
                line: idx as u32,
                character: start,
            },
            end: Position {
                line: idx as u32,
                character: start + key.as_str().chars().count() as u32,
            },
        };
        diagnostics.push(make_diagnostic(
            range,
            DiagnosticSeverity::WARNING,
            codes::UNKNOWN_APPLIES_KEY,
            format!(
                "Unknown applies_to key `{}` (known keys: {})",
                key.as_str(),
                KNOWN_APPLIES_KEYS.join(", ")
            ),
        ));
    }

    if let Some(value) = caps.name("value") {
        let raw = value.as_str();
        let unquoted = strip_quotes(raw);
        if !unquoted.is_empty() {
            let start = line[..value.start()].chars().count() as u32;
            let range = Range {
                start: Position {
                    line: idx as u32,
                    character: start,
                },
                end: Position {
                    line: idx as u32,
                    character: start + raw.chars().count() as u32,
                },
            };
            diagnostics.extend(analyze_value(unquoted, range));
        }
    }

    diagnostics
}

fn strip_quotes(value: &str) -> &str {
    let trimmed = value.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

/// Analyzes every `` {applies_to}`...` `` role payload in the body.
fn inline_role_applies(lines: &[&str]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        for caps in INLINE_ROLE.captures_iter(line) {
            let value = caps.name("value").expect("value group always present");
            let start = line[..value.start()].chars().count() as u32;
            let range = Range {
                start: Position {
                    line: idx as u32,
                    character: start,
                },
                end: Position {
                    line: idx as u32,
                    character: start + value.as_str().chars().count() as u32,
                },
            };
            diagnostics.extend(analyze_value(value.as_str(), range));
        }
    }
    diagnostics
}

/// Analyzes `key: value` content lines of `:::{applies_to}` blocks.
fn block_applies(lines: &[&str], parsed: &ParsedBlocks) -> Vec<Diagnostic> {
    parsed
        .blocks
        .iter()
        .filter(|b| b.name == "applies_to")
        .flat_map(|b| b.content_lines.iter())
        .flat_map(|&idx| scan_applies_line(lines, idx))
        .collect()
}
