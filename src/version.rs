//! Lifecycle and version expression parsing.
//!
//! An applies_to entry pairs a lifecycle word with an optional version
//! token: `ga`, `ga all`, `removed =9.2`, `preview 9.0-9.1`, `ga 9.1+`.
//! This module parses single entries and compares dotted versions. It is
//! pure: no I/O, no shared state, and malformed input comes back as `None`
//! rather than an error.

use std::cmp::Ordering;

/// The nine fixed lifecycle states an applies_to entry can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Ga,
    Preview,
    Beta,
    Deprecated,
    Removed,
    Unavailable,
    Planned,
    Development,
    Discontinued,
}

impl Lifecycle {
    /// Returns all lifecycle states, in documentation order.
    pub fn all() -> [Self; 9] {
        [
            Self::Ga,
            Self::Preview,
            Self::Beta,
            Self::Deprecated,
            Self::Removed,
            Self::Unavailable,
            Self::Planned,
            Self::Development,
            Self::Discontinued,
        ]
    }

    /// Parses a lifecycle word. Anything else is not this grammar.
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "ga" => Some(Self::Ga),
            "preview" => Some(Self::Preview),
            "beta" => Some(Self::Beta),
            "deprecated" => Some(Self::Deprecated),
            "removed" => Some(Self::Removed),
            "unavailable" => Some(Self::Unavailable),
            "planned" => Some(Self::Planned),
            "development" => Some(Self::Development),
            "discontinued" => Some(Self::Discontinued),
            _ => None,
        }
    }

    /// Returns the lifecycle word as written in documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ga => "ga",
            Self::Preview => "preview",
            Self::Beta => "beta",
            Self::Deprecated => "deprecated",
            Self::Removed => "removed",
            Self::Unavailable => "unavailable",
            Self::Planned => "planned",
            Self::Development => "development",
            Self::Discontinued => "discontinued",
        }
    }
}

/// A dotted version as ordered numeric components, e.g. `9.1.2` -> `[9, 1, 2]`.
pub type Version = Vec<u32>;

/// Parses a dotted version. Any non-numeric component invalidates the whole
/// version.
pub fn parse_version(text: &str) -> Option<Version> {
    if text.is_empty() {
        return None;
    }
    text.split('.')
        .map(|component| component.parse::<u32>().ok())
        .collect()
}

/// Compares two versions component-wise, reading a missing trailing
/// component as `0`, so `9.1` equals `9.1.0`.
pub fn compare_versions(a: &[u32], b: &[u32]) -> Ordering {
    for i in 0..a.len().max(b.len()) {
        let left = a.get(i).copied().unwrap_or(0);
        let right = b.get(i).copied().unwrap_or(0);
        match left.cmp(&right) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Renders a version back to its dotted form.
pub fn format_version(version: &[u32]) -> String {
    version
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// One parsed lifecycle+version clause.
///
/// Exactly one shape holds per entry:
/// - bare word or `all`: unbound, no bounds
/// - `=X`: exact, start == end
/// - `A-B`: range, both bounds set
/// - `X+` or bare `X`: unbound, start set, end absent ("to infinity")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersionEntry {
    pub lifecycle: Lifecycle,
    /// The raw token after the lifecycle word, if any.
    pub version_spec: Option<String>,
    pub is_range: bool,
    pub is_exact: bool,
    pub is_unbound: bool,
    pub start_version: Option<Version>,
    pub end_version: Option<Version>,
}

impl ParsedVersionEntry {
    fn bare(lifecycle: Lifecycle, version_spec: Option<String>) -> Self {
        ParsedVersionEntry {
            lifecycle,
            version_spec,
            is_range: false,
            is_exact: false,
            is_unbound: true,
            start_version: None,
            end_version: None,
        }
    }

    /// The version used for overlap and highest-version comparisons:
    /// the end version if present, else the start version.
    pub fn effective_version(&self) -> Option<&Version> {
        self.end_version.as_ref().or(self.start_version.as_ref())
    }

    /// True for a lifecycle + bare dotted version with no `+`, `=`, or
    /// range syntax, where the shape is left to inference.
    pub fn is_implicit(&self) -> bool {
        self.start_version.is_some()
            && self
                .version_spec
                .as_deref()
                .is_some_and(|spec| spec.chars().all(|c| c.is_ascii_digit() || c == '.'))
    }
}

/// Parses one lifecycle+version clause, e.g. `ga 9.1+`.
///
/// Returns `None` when the first word is not a lifecycle word — the text is
/// simply not this grammar. A recognized lifecycle with an unparseable
/// version keeps its shape flags but carries no bounds.
pub fn parse_version_entry(text: &str) -> Option<ParsedVersionEntry> {
    let mut tokens = text.split_whitespace();
    let lifecycle = Lifecycle::parse(tokens.next()?)?;

    let Some(spec) = tokens.next() else {
        return Some(ParsedVersionEntry::bare(lifecycle, None));
    };

    if spec == "all" {
        return Some(ParsedVersionEntry::bare(lifecycle, Some(spec.to_string())));
    }

    if let Some(rest) = spec.strip_prefix('=') {
        let bound = parse_version(rest);
        return Some(ParsedVersionEntry {
            lifecycle,
            version_spec: Some(spec.to_string()),
            is_range: false,
            is_exact: true,
            is_unbound: false,
            start_version: bound.clone(),
            end_version: bound,
        });
    }

    let sides: Vec<&str> = spec.split('-').collect();
    if sides.len() == 2 && !sides[0].is_empty() && !sides[1].is_empty() {
        return Some(ParsedVersionEntry {
            lifecycle,
            version_spec: Some(spec.to_string()),
            is_range: true,
            is_exact: false,
            is_unbound: false,
            start_version: parse_version(sides[0]),
            end_version: parse_version(sides[1]),
        });
    }

    let core = spec.strip_suffix('+').unwrap_or(spec);
    Some(ParsedVersionEntry {
        lifecycle,
        version_spec: Some(spec.to_string()),
        is_range: false,
        is_exact: false,
        is_unbound: true,
        start_version: parse_version(core),
        end_version: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_missing_components_read_as_zero() {
        assert_eq!(compare_versions(&[9, 1], &[9, 1, 0]), Ordering::Equal);
        assert_eq!(compare_versions(&[9, 2], &[9, 1, 5]), Ordering::Greater);
        assert_eq!(compare_versions(&[8], &[9]), Ordering::Less);
    }

    #[test]
    fn test_parse_version_rejects_non_numeric_components() {
        assert_eq!(parse_version("9.1"), Some(vec![9, 1]));
        assert_eq!(parse_version("9.x"), None);
        assert_eq!(parse_version("9..1"), None);
        assert_eq!(parse_version(""), None);
    }

    #[test]
    fn test_lifecycle_words_round_trip() {
        for state in Lifecycle::all() {
            assert_eq!(
                Lifecycle::parse(state.as_str()),
                Some(state),
                "lifecycle word {} should parse back to itself",
                state.as_str()
            );
        }
        assert_eq!(Lifecycle::parse("released"), None);
    }

    #[test]
    fn test_unbound_with_start() {
        let entry = parse_version_entry("ga 9.1+").unwrap();
        assert_eq!(entry.lifecycle, Lifecycle::Ga);
        assert!(entry.is_unbound);
        assert!(!entry.is_range);
        assert!(!entry.is_exact);
        assert_eq!(entry.start_version, Some(vec![9, 1]));
        assert_eq!(entry.end_version, None);
    }

    #[test]
    fn test_exact_sets_both_bounds() {
        let entry = parse_version_entry("removed =9.2").unwrap();
        assert!(entry.is_exact);
        assert_eq!(entry.start_version, Some(vec![9, 2]));
        assert_eq!(entry.end_version, Some(vec![9, 2]));
    }

    #[test]
    fn test_range_parses_both_sides() {
        let entry = parse_version_entry("preview 9.0-9.1").unwrap();
        assert!(entry.is_range);
        assert_eq!(entry.start_version, Some(vec![9, 0]));
        assert_eq!(entry.end_version, Some(vec![9, 1]));
    }

    #[test]
    fn test_bare_and_all_are_unbound_without_bounds() {
        for text in ["ga", "ga all"] {
            let entry = parse_version_entry(text).unwrap();
            assert!(entry.is_unbound, "{text} should be unbound");
            assert!(entry.start_version.is_none());
            assert!(entry.end_version.is_none());
        }
    }

    #[test]
    fn test_unknown_lifecycle_is_not_this_grammar() {
        assert_eq!(parse_version_entry("shipped 9.1"), None);
        assert_eq!(parse_version_entry(""), None);
    }

    #[test]
    fn test_bad_version_keeps_shape_but_drops_bounds() {
        let entry = parse_version_entry("ga 9.x+").unwrap();
        assert!(entry.is_unbound);
        assert_eq!(entry.start_version, None);

        let entry = parse_version_entry("beta =9.x").unwrap();
        assert!(entry.is_exact);
        assert_eq!(entry.start_version, None);
        assert_eq!(entry.end_version, None);
    }

    #[test]
    fn test_implicit_detection() {
        assert!(parse_version_entry("ga 9.1").unwrap().is_implicit());
        assert!(!parse_version_entry("ga 9.1+").unwrap().is_implicit());
        assert!(!parse_version_entry("ga =9.1").unwrap().is_implicit());
        assert!(!parse_version_entry("ga 9.0-9.1").unwrap().is_implicit());
        assert!(!parse_version_entry("ga all").unwrap().is_implicit());
        assert!(!parse_version_entry("ga").unwrap().is_implicit());
    }

    #[test]
    fn test_effective_version_prefers_end() {
        let range = parse_version_entry("preview 9.0-9.1").unwrap();
        assert_eq!(range.effective_version(), Some(&vec![9, 1]));

        let unbound = parse_version_entry("ga 9.1+").unwrap();
        assert_eq!(unbound.effective_version(), Some(&vec![9, 1]));

        let bare = parse_version_entry("ga").unwrap();
        assert_eq!(bare.effective_version(), None);
    }

    #[test]
    fn test_format_version() {
        assert_eq!(format_version(&[9, 1, 2]), "9.1.2");
        assert_eq!(format_version(&[9]), "9");
    }
}
