//! docslint: validation core for a colon-fenced directive Markdown dialect
//!
//! This crate turns one document's text into an ordered list of editor
//! diagnostics for a documentation dialect embedded in Markdown: directive
//! blocks (`:::{note}` ... `:::`), inline roles, substitution expressions
//! (`{{name | lc}}`), and applies_to lifecycle/version expressions
//! (`ga 9.1+`, `preview 9.0-9.1`, `removed =9.2`).
//!
//! # Overview
//!
//! Two independent diagnostic streams merge into one list per document:
//!
//! - **Directive validation**: a line-oriented state machine discovers
//!   nested colon-fenced blocks, matching openings to closings by fence
//!   width, and each block is checked against a static directive registry.
//! - **applies_to analysis**: lifecycle+version clauses found in
//!   frontmatter, inline roles, and `applies_to` blocks are parsed and
//!   checked for overlapping coverage, inverted ranges, ambiguous syntax,
//!   and an exact-version `removed` standing as the final state.
//!
//! # Architecture
//!
//! - [`block_parser`]: directive block discovery (the parser never fails;
//!   malformed constructs become flagged records)
//! - [`directives`]: the static directive registry
//! - [`validate`]: per-block validation against the registry
//! - [`version`] / [`applies_to`]: the lifecycle/version expression engine
//! - [`frontmatter`]: applies_to discovery across a document
//! - [`substitution`]: `{{name | op}}` expressions and mutation operators
//! - [`diagnostics`]: the merge layer and stable diagnostic codes
//! - [`config`]: validation toggles
//!
//! # Usage
//!
//! The host editor integration owns I/O, caching, and scheduling; this core
//! is pure and synchronous — given text, it returns diagnostics,
//! deterministically and side-effect-free.
//!
//! ```
//! use docslint::config::Settings;
//! use docslint::diagnostics::document_diagnostics;
//!
//! let text = ":::{note}\nSupported {applies_to}`ga 9.1+` and later.\n:::\n";
//! let diagnostics = document_diagnostics(text, &Settings::default());
//! assert!(diagnostics.is_empty());
//! ```

// Core parsing and analysis
pub mod applies_to;
pub mod block_parser;
pub mod directives;
pub mod substitution;
pub mod validate;
pub mod version;

// Document-level glue
pub mod diagnostics;
pub mod frontmatter;

// Configuration
pub mod config;
