//! # Link Recognizers
//!
//! Each recognizer owns the pattern for one link syntax and knows how to turn
//! a match of that pattern into a [`Link`]. The replacer joins every
//! registered pattern into a single alternation, so recognizers never deal
//! with code blocks themselves.
//!
//! ## Recognizers
//!
//! - **`MarkdownLink`**: `[text](target#anchor "title")`, `![alt](src)`
//! - **`WikiLink`**: `[[target#anchor|label]]`, `![[image.png]]`
//! - **`ReferenceLink`**: `[text][id]`, `[id][]`
//! - **`ReferenceDefinition`**: `[id]: target#anchor "title"` (definition pass)
//!
//! ## Pattern Rules
//!
//! Patterns are compiled in `(?xm)` mode: whitespace is insignificant, `#`
//! starts a comment unless escaped, and `^`/`$` match at line boundaries.
//! Every capture group name carries a prefix unique to its recognizer because
//! the combined pattern cannot contain duplicate names.

use regex::Captures;

use crate::link::Link;

pub mod markdown_link;
pub mod reference;
pub mod wikilink;

pub use markdown_link::MarkdownLink;
pub use reference::{ReferenceDefinition, ReferenceLink};
pub use wikilink::WikiLink;

/// Matches and decomposes one concrete link syntax.
pub trait Recognizer: Send + Sync {
    /// Regex fragment embeddable in a larger `(?xm)` alternation.
    fn pattern(&self) -> &str;

    /// Whether this recognizer claims the match.
    fn matches(&self, caps: &Captures<'_>) -> bool;

    /// Decompose a claimed match. `None` means the match is malformed.
    fn extract(&self, caps: &Captures<'_>) -> Option<Link>;
}

/// Text of a named group, or `""` when the group did not participate.
pub(crate) fn group<'h>(caps: &Captures<'h>, name: &str) -> &'h str {
    caps.name(name).map_or("", |m| m.as_str())
}
