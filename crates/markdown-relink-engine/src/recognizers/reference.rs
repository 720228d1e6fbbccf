use regex::Captures;

use super::{Recognizer, group};
use crate::link::Link;

/// In-text reference occurrences: `[text][id]` and the collapsed `[id][]`.
///
/// The logical target is the definition id, which the replacer looks up in the
/// document's target map before falling back to the location index.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceLink;

impl ReferenceLink {
    const PATTERN: &'static str = r#"
        (?P<ref_image>!?)
        \[(?P<ref_text>[^\]\n]+?)\]
        \[(?P<ref_id>[^\]\n]*?)\]
    "#;
}

impl Recognizer for ReferenceLink {
    fn pattern(&self) -> &str {
        Self::PATTERN
    }

    fn matches(&self, caps: &Captures<'_>) -> bool {
        caps.name("ref_id").is_some()
    }

    fn extract(&self, caps: &Captures<'_>) -> Option<Link> {
        let text = group(caps, "ref_text").trim();
        let target = match group(caps, "ref_id").trim() {
            "" => text,
            id => id,
        };

        Some(Link {
            image: group(caps, "ref_image") == "!",
            text: text.to_string(),
            target: target.to_string(),
            ..Link::default()
        })
    }
}

/// Reference definitions: a line of the form `[id]: target#anchor "title"`.
///
/// The target is a logical name and may contain spaces (`[id]: Target Page`);
/// it may also be wrapped in `<...>`. The title may be quoted with `"`, `'` or
/// parentheses. Footnote definitions (`[^1]: ...`) are not definitions.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceDefinition;

impl ReferenceDefinition {
    const PATTERN: &'static str = r#"
        ^[\t\x20]{0,3}
        \[(?P<refdef_text>[^\]\^\n][^\]\n]*)\]:
        [\t\x20]*
        <?
        (?P<refdef_target>[^\#<>"'(\n]*?)
        (?:\#(?P<refdef_anchor>[^<>"'(\n]*?))?
        >?
        (?:[\t\x20]+["'(](?P<refdef_title>[^"'()\n]*)["')])?
        [\t\x20]*$
    "#;
}

impl Recognizer for ReferenceDefinition {
    fn pattern(&self) -> &str {
        Self::PATTERN
    }

    fn matches(&self, caps: &Captures<'_>) -> bool {
        caps.name("refdef_text").is_some()
    }

    fn extract(&self, caps: &Captures<'_>) -> Option<Link> {
        let text = group(caps, "refdef_text").trim();
        if text.is_empty() {
            return None;
        }

        Some(Link {
            image: false,
            text: text.to_string(),
            target: group(caps, "refdef_target").trim().to_string(),
            anchor: group(caps, "refdef_anchor").trim().to_string(),
            title: group(caps, "refdef_title").to_string(),
        })
    }
}
