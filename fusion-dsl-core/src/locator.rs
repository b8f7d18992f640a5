//! # Expression Locator
//!
//! Finds Fusion-DSL call-sites in raw Fusion source text. A call-site is an
//! identifier made of letters, digits and dots, directly followed by a code
//! body enclosed in backticks:
//!
//! ```text
//! renderer = afx`<div>{props.title}</div>`
//!            ^^^ ^^^^^^^^^^^^^^^^^^^^^^^^^
//!     identifier         code body
//! ```
//!
//! The body ends at the nearest following backtick, so a body can never
//! contain a backtick itself. Bodies containing one are cut at that backtick
//! and the rest of the text is scanned as ordinary source.
//!
//! The locator works on the text only. It does not know which identifiers are
//! registered and it never modifies the buffer.

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

lazy_static! {
    static ref DSL_EXPRESSION: Regex =
        Regex::new(r"(?P<identifier>[a-zA-Z0-9.]+)`(?P<code>[^`]*)`")
            .expect("DSL expression pattern is valid");
    static ref DSL_IDENTIFIER: Regex =
        Regex::new(r"^[a-zA-Z0-9.]+$").expect("DSL identifier pattern is valid");
}

/// Checks that `identifier` could be produced by the locator.
pub fn is_valid_identifier(identifier: &str) -> bool {
    DSL_IDENTIFIER.is_match(identifier)
}

/// One located DSL expression, borrowing from the scanned buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DslCallSite<'a> {
    pub identifier: &'a str,
    pub code: &'a str,
    /// Byte offset of the first identifier character.
    pub start: usize,
    /// Byte offset just past the closing backtick.
    pub end: usize,
}

impl<'a> DslCallSite<'a> {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionLocator;

impl ExpressionLocator {
    pub fn new() -> Self {
        Self
    }

    /// Returns every call-site in `buffer`, left to right and non-overlapping.
    pub fn scan<'a>(&self, buffer: &'a str) -> Vec<DslCallSite<'a>> {
        self.iter(buffer).collect()
    }

    pub fn iter<'a>(self, buffer: &'a str) -> impl Iterator<Item = DslCallSite<'a>> + 'a {
        DSL_EXPRESSION.captures_iter(buffer).filter_map(|captures| {
            let whole = captures.get(0)?;
            Some(DslCallSite {
                identifier: captures.name("identifier")?.as_str(),
                code: captures.name("code")?.as_str(),
                start: whole.start(),
                end: whole.end(),
            })
        })
    }
}
