//! Directive block parsing.
//!
//! Discovers colon-fenced directive blocks (`:::{note}` ... `:::`) in one
//! forward pass over a document's lines, keeping an explicit stack of open
//! blocks. The parser never fails: malformed openings become flagged
//! records, mismatched fences leave blocks unclosed, and the validator
//! decides severity. Documents are edited incrementally, so every construct
//! must survive the scan and be reportable.
//!
//! Closing fences match by width, not nesting depth: a fence closes the
//! nearest open block (scanning from the top of the stack) whose opening
//! colon count equals the fence's. Entries popped over on the way stay
//! permanently unclosed; this tolerates crossed fences of different widths
//! without aborting the scan.

use once_cell::sync::Lazy;
use regex::Regex;
use tower_lsp::lsp_types::{Position, Range};

/// A `:key: value` line inside a directive block.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveParameter {
    pub name: String,
    pub value: String,
    /// Line index of the parameter in the document.
    pub line: usize,
    pub range: Range,
}

/// One recognized `:::{name}` ... `:::` construct.
///
/// Created while scanning and mutated only by the scan that closes it;
/// immutable afterward. A block is closed iff `closing_colon_count` is set;
/// a closed block whose widths differ is a reported error, not a parse
/// failure.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveBlock {
    pub name: String,
    /// Line index of the opening fence.
    pub opening_line: usize,
    pub opening_colon_count: usize,
    pub closing_line: Option<usize>,
    pub closing_colon_count: Option<usize>,
    /// Trailing text on the opening line, if any.
    pub argument: Option<String>,
    pub parameters: Vec<DirectiveParameter>,
    /// Lines that are neither parameters nor nested markers.
    pub content_lines: Vec<usize>,
    pub is_malformed: bool,
    pub missing_closing_brace: bool,
}

impl DirectiveBlock {
    pub fn is_closed(&self) -> bool {
        self.closing_colon_count.is_some()
    }
}

/// Everything one scan produced: the ordered list of discovered blocks and,
/// as a side channel, the indices of blocks still open at end-of-document.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedBlocks {
    pub blocks: Vec<DirectiveBlock>,
    /// Indices into `blocks` of entries left on the stack at end-of-document.
    pub left_open: Vec<usize>,
}

/// Well-formed opening: 3+ colons, `{name}`, optional trailing argument.
static OPENING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?<fence>:{3,})\{(?<name>[a-zA-Z][a-zA-Z0-9_-]*)\}[ \t]*(?<arg>.*?)\s*$")
        .unwrap()
});

/// Malformed opening with the closing brace missing: `:::{name`.
static OPENING_UNCLOSED_BRACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?<fence>:{3,})\{(?<name>[a-zA-Z][a-zA-Z0-9_-]*)[^}]*$").unwrap()
});

/// Malformed opening with no braces at all: `:::name`.
static OPENING_NO_BRACES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?<fence>:{3,})(?<name>[a-zA-Z][a-zA-Z0-9_-]*)\s*(?<arg>.*?)\s*$").unwrap()
});

/// Closing fence: a line of only colons.
static CLOSING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?<fence>:+)\s*$").unwrap());

/// Parameter line inside a block: `:key: value` (value optional).
static PARAMETER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*:(?<name>[a-zA-Z][a-zA-Z0-9_-]*):(?:[ \t]+(?<value>.*?))?\s*$").unwrap()
});

/// Parses all directive blocks out of a document's lines.
///
/// Single forward pass; every opening (well-formed or malformed) appears in
/// the output immediately, so an unclosed block is still reported.
pub fn parse_blocks(lines: &[&str]) -> ParsedBlocks {
    let mut blocks: Vec<DirectiveBlock> = Vec::new();
    // Stack of indices into `blocks`; the parser exclusively owns it.
    let mut stack: Vec<usize> = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        if let Some(caps) = OPENING.captures(line) {
            let argument = caps["arg"].trim();
            blocks.push(DirectiveBlock {
                name: caps["name"].to_string(),
                opening_line: idx,
                opening_colon_count: caps["fence"].len(),
                closing_line: None,
                closing_colon_count: None,
                argument: (!argument.is_empty()).then(|| argument.to_string()),
                parameters: Vec::new(),
                content_lines: Vec::new(),
                is_malformed: false,
                missing_closing_brace: false,
            });
            stack.push(blocks.len() - 1);
            continue;
        }

        if let Some(caps) = OPENING_UNCLOSED_BRACE.captures(line) {
            blocks.push(DirectiveBlock {
                name: caps["name"].to_string(),
                opening_line: idx,
                opening_colon_count: caps["fence"].len(),
                closing_line: None,
                closing_colon_count: None,
                argument: None,
                parameters: Vec::new(),
                content_lines: Vec::new(),
                is_malformed: true,
                missing_closing_brace: true,
            });
            stack.push(blocks.len() - 1);
            continue;
        }

        if let Some(caps) = OPENING_NO_BRACES.captures(line) {
            let argument = caps["arg"].trim();
            blocks.push(DirectiveBlock {
                name: caps["name"].to_string(),
                opening_line: idx,
                opening_colon_count: caps["fence"].len(),
                closing_line: None,
                closing_colon_count: None,
                argument: (!argument.is_empty()).then(|| argument.to_string()),
                parameters: Vec::new(),
                content_lines: Vec::new(),
                is_malformed: true,
                missing_closing_brace: false,
            });
            stack.push(blocks.len() - 1);
            continue;
        }

        if stack.is_empty() {
            // Outside any block; nothing to attach to.
            continue;
        }

        if let Some(caps) = CLOSING.captures(line) {
            let width = caps["fence"].len();
            // Nearest open block of the same width, scanning from the top.
            // Not pure LIFO: entries above the match pop without closing.
            if let Some(pos) = stack
                .iter()
                .rposition(|&bi| blocks[bi].opening_colon_count == width && !blocks[bi].is_closed())
            {
                let bi = stack[pos];
                blocks[bi].closing_line = Some(idx);
                blocks[bi].closing_colon_count = Some(width);
                stack.truncate(pos);
            }
            // A fence matching nothing is consumed with no effect.
            continue;
        }

        let top = *stack.last().expect("stack checked non-empty above");
        if let Some(caps) = PARAMETER.captures(line) {
            blocks[top].parameters.push(DirectiveParameter {
                name: caps["name"].to_string(),
                value: caps
                    .name("value")
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
                line: idx,
                range: line_range(lines, idx),
            });
        } else {
            blocks[top].content_lines.push(idx);
        }
    }

    ParsedBlocks {
        left_open: stack,
        blocks,
    }
}

/// The full span of one line as an editor range.
pub fn line_range(lines: &[&str], line: usize) -> Range {
    let width = lines
        .get(line)
        .map(|l| l.chars().count() as u32)
        .unwrap_or(0);
    Range {
        start: Position {
            line: line as u32,
            character: 0,
        },
        end: Position {
            line: line as u32,
            character: width,
        },
    }
}
