//! Static directive registry.
//!
//! Plain data, initialized once and never mutated: each directive has a
//! name, an argument requirement, the parameter names it accepts, an editor
//! snippet template, and a one-line description. There is no behavioral
//! polymorphism between directive kinds, so a lookup table is all the
//! machinery needed.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// One directive's registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveDefinition {
    pub name: &'static str,
    /// Whether the opening line requires trailing argument text.
    pub has_argument: bool,
    /// Parameter names accepted as `:key: value` lines inside the block.
    pub allowed_params: &'static [&'static str],
    /// Editor snippet inserted on completion; `$1`/`$2` are tab stops.
    pub template: &'static str,
    pub description: &'static str,
}

const DEFINITIONS: &[DirectiveDefinition] = &[
    DirectiveDefinition {
        name: "note",
        has_argument: false,
        allowed_params: &[],
        template: ":::{note}\n${1:Content}\n:::",
        description: "A note admonition",
    },
    DirectiveDefinition {
        name: "warning",
        has_argument: false,
        allowed_params: &[],
        template: ":::{warning}\n${1:Content}\n:::",
        description: "A warning admonition",
    },
    DirectiveDefinition {
        name: "tip",
        has_argument: false,
        allowed_params: &[],
        template: ":::{tip}\n${1:Content}\n:::",
        description: "A tip admonition",
    },
    DirectiveDefinition {
        name: "important",
        has_argument: false,
        allowed_params: &[],
        template: ":::{important}\n${1:Content}\n:::",
        description: "An important notice",
    },
    DirectiveDefinition {
        name: "admonition",
        has_argument: true,
        allowed_params: &[],
        template: ":::{admonition} ${1:Title}\n${2:Content}\n:::",
        description: "A custom admonition with title",
    },
    DirectiveDefinition {
        name: "dropdown",
        has_argument: true,
        allowed_params: &["open", "name"],
        template: ":::{dropdown} ${1:Title}\n${2:Content}\n:::",
        description: "A collapsible dropdown with title",
    },
    DirectiveDefinition {
        name: "image",
        has_argument: true,
        allowed_params: &["alt", "width", "height", "screenshot", "title"],
        template: ":::{image} ${1:path/to/image.png}\n:alt: ${2:description}\n:::",
        description: "An image with sizing parameters",
    },
    DirectiveDefinition {
        name: "carousel",
        has_argument: false,
        allowed_params: &["id", "max-height"],
        template: ":::{carousel}\n${1:Content}\n:::",
        description: "An image carousel",
    },
    DirectiveDefinition {
        name: "include",
        has_argument: true,
        allowed_params: &[],
        template: ":::{include} ${1:path/to/file.md}\n:::",
        description: "Include another file",
    },
    DirectiveDefinition {
        name: "tab-set",
        has_argument: false,
        allowed_params: &["group"],
        template: "::::{tab-set}\n:::{tab-item} ${1:Label}\n${2:Content}\n:::\n::::",
        description: "A set of switchable tabs",
    },
    DirectiveDefinition {
        name: "tab-item",
        has_argument: true,
        allowed_params: &["sync"],
        template: ":::{tab-item} ${1:Label}\n${2:Content}\n:::",
        description: "One tab inside a tab-set",
    },
    DirectiveDefinition {
        name: "stepper",
        has_argument: false,
        allowed_params: &[],
        template: "::::{stepper}\n:::{step} ${1:Title}\n${2:Content}\n:::\n::::",
        description: "A numbered sequence of steps",
    },
    DirectiveDefinition {
        name: "step",
        has_argument: true,
        allowed_params: &["anchor"],
        template: ":::{step} ${1:Title}\n${2:Content}\n:::",
        description: "One step inside a stepper",
    },
    DirectiveDefinition {
        name: "button",
        has_argument: false,
        allowed_params: &[],
        template: ":::{button}\n[${1:Label}](${2:url})\n:::",
        description: "A link styled as a button; content must be a single Markdown link",
    },
    DirectiveDefinition {
        name: "applies-switch",
        has_argument: false,
        allowed_params: &[],
        template: "::::{applies-switch}\n:::{applies-item} ${1:ga 9.1+}\n${2:Content}\n:::\n::::",
        description: "Content switched by applicability",
    },
    DirectiveDefinition {
        name: "applies-item",
        has_argument: true,
        allowed_params: &[],
        template: ":::{applies-item} ${1:ga 9.1+}\n${2:Content}\n:::",
        description: "One branch of an applies-switch",
    },
    DirectiveDefinition {
        name: "applies_to",
        has_argument: false,
        allowed_params: &[],
        template: ":::{applies_to}\n${1:stack}: ${2:ga 9.1+}\n:::",
        description: "Section-level applicability annotations",
    },
    DirectiveDefinition {
        name: "diagram",
        has_argument: true,
        allowed_params: &[],
        template: ":::{diagram} ${1:mermaid}\n${2:graph LR}\n:::",
        description: "A rendered diagram; the argument names the engine",
    },
    DirectiveDefinition {
        name: "glossary",
        has_argument: false,
        allowed_params: &[],
        template: ":::{glossary}\n${1:Term}\n  ${2:Definition}\n:::",
        description: "A glossary of terms",
    },
];

/// The registry keyed by directive name. Built once at first use.
pub static DIRECTIVES: Lazy<HashMap<&'static str, &'static DirectiveDefinition>> =
    Lazy::new(|| DEFINITIONS.iter().map(|d| (d.name, d)).collect());

/// Looks up a directive by name.
pub fn lookup(name: &str) -> Option<&'static DirectiveDefinition> {
    DIRECTIVES.get(name).copied()
}

/// All registered directives, in registry order.
pub fn all() -> impl Iterator<Item = &'static DirectiveDefinition> {
    DEFINITIONS.iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_directive() {
        let dropdown = lookup("dropdown").expect("dropdown should be registered");
        assert!(dropdown.has_argument);
        assert!(dropdown.allowed_params.contains(&"open"));
    }

    #[test]
    fn test_lookup_unknown_directive() {
        assert!(lookup("frobnicate").is_none());
    }

    #[test]
    fn test_every_directive_has_description_and_template() {
        for directive in all() {
            assert!(
                !directive.description.is_empty(),
                "{} should have a description",
                directive.name
            );
            assert!(
                directive.template.contains(directive.name),
                "{} template should mention the directive",
                directive.name
            );
        }
    }

    #[test]
    fn test_registry_names_are_unique() {
        assert_eq!(
            DIRECTIVES.len(),
            all().count(),
            "duplicate directive names would collapse in the map"
        );
    }
}
