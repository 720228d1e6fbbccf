use serde::{Deserialize, Serialize};

/// Which link syntaxes take part in a run. These only decide which
/// recognizers get registered; the replacer itself is syntax-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Rewrite `[[wikilinks]]`.
    pub wikilinks: bool,
    /// Rewrite `[text][id]` occurrences against `[id]: target` definitions.
    pub reference_links: bool,
    /// Log a warning when a target name matches more than one file.
    pub warn_ambiguities: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            wikilinks: true,
            reference_links: true,
            warn_ambiguities: false,
        }
    }
}
