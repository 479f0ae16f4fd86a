//! Substitution expressions.
//!
//! A substitution reference `{{name | op | op}}` names a variable and an
//! ordered chain of mutation operators applied left to right, each taking
//! the previous stage's output. The chain is a simple linear pipeline, not
//! an expression language: unknown operators pass the value through
//! unchanged and nothing here ever fails.

use once_cell::sync::Lazy;
use regex::Regex;
use tower_lsp::lsp_types::{Position, Range};

use crate::version::{format_version, parse_version};

/// A parsed `{{name | op | op}}` payload (without the surrounding braces).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionExpression {
    pub name: String,
    /// Mutation operators in application order. Empty segments are dropped.
    pub mutations: Vec<String>,
}

/// Splits a substitution payload into its variable name and mutation chain.
pub fn parse_substitution(text: &str) -> SubstitutionExpression {
    let mut segments = text.split('|').map(str::trim);
    let name = segments.next().unwrap_or_default().to_string();
    let mutations = segments
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    SubstitutionExpression { name, mutations }
}

static SUBSTITUTION_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(?<body>[^{}]+)\}\}").unwrap());

/// Finds every `{{...}}` reference in a document, with the range of its
/// payload.
pub fn find_substitutions(lines: &[&str]) -> Vec<(SubstitutionExpression, Range)> {
    let mut found = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        for caps in SUBSTITUTION_REFERENCE.captures_iter(line) {
            let body = caps.name("body").expect("body group always present");
            let start = line[..body.start()].chars().count() as u32;
            let end = start + body.as_str().chars().count() as u32;
            let range = Range {
                start: Position {
                    line: idx as u32,
                    character: start,
                },
                end: Position {
                    line: idx as u32,
                    character: end,
                },
            };
            found.push((parse_substitution(body.as_str()), range));
        }
    }
    found
}

/// Applies a mutation chain to a resolved substitution value.
pub fn apply_mutations(value: &str, mutations: &[String]) -> String {
    mutations
        .iter()
        .fold(value.to_string(), |acc, op| apply_mutation(&acc, op))
}

fn apply_mutation(value: &str, op: &str) -> String {
    match op {
        "trim" => value.trim().to_string(),
        "lc" => value.to_lowercase(),
        "uc" => value.to_uppercase(),
        "tc" => title_case(value),
        "kc" => delimited_case(value, '-'),
        "sc" => delimited_case(value, '_'),
        "M" => version_op(value, |v| format_version(&v[..1])),
        "M.M" => version_op(value, |v| {
            format!("{}.{}", v[0], v.get(1).copied().unwrap_or(0))
        }),
        "M.x" => version_op(value, |v| format!("{}.x", v[0])),
        "M+1" => version_op(value, |v| (v[0] + 1).to_string()),
        "M.M+1" => version_op(value, |v| {
            format!("{}.{}", v[0], v.get(1).copied().unwrap_or(0) + 1)
        }),
        // Unknown operators pass the value through untouched.
        _ => value.to_string(),
    }
}

fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn delimited_case(value: &str, delimiter: char) -> String {
    value
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(&delimiter.to_string())
}

/// Version operators only apply when the value parses as a dotted version;
/// anything else passes through.
fn version_op(value: &str, render: impl Fn(&[u32]) -> String) -> String {
    match parse_version(value.trim()) {
        Some(version) if !version.is_empty() => render(&version),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only() {
        let expr = parse_substitution("product.name");
        assert_eq!(expr.name, "product.name");
        assert!(expr.mutations.is_empty());
    }

    #[test]
    fn test_chain_is_ordered_and_trimmed() {
        let expr = parse_substitution(" version | M.M | trim ");
        assert_eq!(expr.name, "version");
        assert_eq!(expr.mutations, vec!["M.M", "trim"]);
    }

    #[test]
    fn test_empty_segments_dropped() {
        let expr = parse_substitution("name || lc |  | uc");
        assert_eq!(expr.mutations, vec!["lc", "uc"]);
    }

    #[test]
    fn test_case_operators() {
        assert_eq!(apply_mutations("Elastic Stack", &["lc".into()]), "elastic stack");
        assert_eq!(apply_mutations("elastic", &["uc".into()]), "ELASTIC");
        assert_eq!(
            apply_mutations("the elastic stack", &["tc".into()]),
            "The Elastic Stack"
        );
        assert_eq!(
            apply_mutations("Elastic Stack", &["kc".into()]),
            "elastic-stack"
        );
        assert_eq!(
            apply_mutations("Elastic Stack", &["sc".into()]),
            "elastic_stack"
        );
    }

    #[test]
    fn test_version_operators() {
        assert_eq!(apply_mutations("9.1.2", &["M".into()]), "9");
        assert_eq!(apply_mutations("9.1.2", &["M.M".into()]), "9.1");
        assert_eq!(apply_mutations("9.1.2", &["M.x".into()]), "9.x");
        assert_eq!(apply_mutations("9.1", &["M+1".into()]), "10");
        assert_eq!(apply_mutations("9.1", &["M.M+1".into()]), "9.2");
    }

    #[test]
    fn test_version_operator_on_non_version_passes_through() {
        assert_eq!(apply_mutations("latest", &["M.M".into()]), "latest");
    }

    #[test]
    fn test_unknown_operator_passes_through() {
        assert_eq!(
            apply_mutations("value", &["rot13".into(), "uc".into()]),
            "VALUE"
        );
    }

    #[test]
    fn test_find_substitutions_with_ranges() {
        let lines = vec!["Use {{product.name}} with {{version | M.M}}."];
        let found = find_substitutions(&lines);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0.name, "product.name");
        assert_eq!(found[0].1.start.character, 6);
        assert_eq!(found[1].0.name, "version");
        assert_eq!(found[1].0.mutations, vec!["M.M"]);
    }

    #[test]
    fn test_chain_applies_left_to_right() {
        assert_eq!(
            apply_mutations("  Elastic  ", &["trim".into(), "lc".into()]),
            "elastic"
        );
    }
}
