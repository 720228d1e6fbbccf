use regex::Captures;

use super::{Recognizer, group};
use crate::link::Link;

/// Standard inline markdown links and images.
///
/// Links that already leave the site (`https:`, `mailto:`, `//host`) or are
/// site-absolute (`/path`) are declined and pass through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownLink;

impl MarkdownLink {
    const PATTERN: &'static str = r#"
        (?P<md_image>!?)
        \[(?P<md_text>[^\]\n]*?)\]
        \(
            [\t\x20]*
            (?P<md_target>[^\s\#)]*?)
            (?:\#(?P<md_anchor>[^\s)]*?))?
            (?:[\t\x20]+["'](?P<md_title>[^"'\n]*?)["'])?
            [\t\x20]*
        \)
    "#;
}

impl Recognizer for MarkdownLink {
    fn pattern(&self) -> &str {
        Self::PATTERN
    }

    fn matches(&self, caps: &Captures<'_>) -> bool {
        let Some(target) = caps.name("md_target") else {
            return false;
        };
        let target = target.as_str();
        !(target.starts_with('/') || has_scheme(target))
    }

    fn extract(&self, caps: &Captures<'_>) -> Option<Link> {
        Some(Link {
            image: group(caps, "md_image") == "!",
            text: group(caps, "md_text").to_string(),
            target: group(caps, "md_target").to_string(),
            anchor: group(caps, "md_anchor").to_string(),
            title: group(caps, "md_title").to_string(),
        })
    }
}

/// `scheme:` prefix per RFC 3986: a letter, then letters, digits, `+`, `-`, `.`.
fn has_scheme(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
