use regex::Captures;

use super::{Recognizer, group};
use crate::link::Link;

/// Wiki-style links: `[[target]]`, `[[target#Heading]]`, `[[target|label]]`,
/// `[[#Heading]]` and the embedded form `![[image.png]]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WikiLink;

impl WikiLink {
    const PATTERN: &'static str = r#"
        (?P<wiki_image>!?)
        \[\[
            (?P<wiki_target>[^\]\#|\n]*?)
            (?:\#(?P<wiki_anchor>[^\]|\n]*?))?
            (?:\|(?P<wiki_text>[^\]\n]*?))?
        \]\]
    "#;
}

impl Recognizer for WikiLink {
    fn pattern(&self) -> &str {
        Self::PATTERN
    }

    fn matches(&self, caps: &Captures<'_>) -> bool {
        caps.name("wiki_target").is_some()
    }

    fn extract(&self, caps: &Captures<'_>) -> Option<Link> {
        let target = group(caps, "wiki_target").trim();
        let anchor = group(caps, "wiki_anchor").trim();
        let text = match group(caps, "wiki_text").trim() {
            "" if target.is_empty() => anchor,
            "" => target,
            label => label,
        };

        Some(Link {
            image: group(caps, "wiki_image") == "!",
            text: text.to_string(),
            target: target.to_string(),
            anchor: slugify(anchor),
            title: String::new(),
        })
    }
}

/// Heading id as generated for the rendered page: lower-case, punctuation
/// dropped, runs of whitespace and `-` collapsed into a single `-`.
pub fn slugify(heading: &str) -> String {
    let mut slug = String::with_capacity(heading.len());
    let mut pending_dash = false;

    for c in heading.trim().chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    slug
}
