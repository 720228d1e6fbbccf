//! # Link Replacement
//!
//! Rewrites every recognized link in a document into an inline markdown link
//! with a path relative to the document.
//!
//! ## Passes
//!
//! 1. **Definitions**: the definition pattern is run over the document and
//!    every reference definition is resolved into the [`TargetMap`].
//! 2. **Replacement**: the combined pattern is run once more. Code matches are
//!    copied verbatim, links are resolved through the target map or the
//!    [`LocationIndex`] and rendered back in place.
//!
//! A link that cannot be resolved is logged at debug level and left exactly as
//! written. Nothing about a document's content can make [`Replacer::replace`]
//! fail.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::{Captures, Regex};
use relative_path::{RelativePath, RelativePathBuf};

use crate::index::LocationIndex;
use crate::link::{LabelMode, Link};
use crate::options::Options;
use crate::recognizers::{
    MarkdownLink, Recognizer, ReferenceDefinition, ReferenceLink, WikiLink,
};

pub mod error;
mod pattern;
pub mod target_map;

pub use error::{BrokenLink, PatternError};
pub use target_map::TargetMap;

use pattern::{FENCED_CODE, INLINE_CODE};

/// Characters left as-is in a rewritten path; everything else is escaped.
const LINK_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Collects recognizers before the patterns are compiled.
pub struct ReplacerBuilder<I> {
    index: I,
    use_directory_urls: bool,
    recognizers: Vec<Box<dyn Recognizer>>,
    definition_recognizers: Vec<Box<dyn Recognizer>>,
}

impl<I: LocationIndex> ReplacerBuilder<I> {
    /// `use_directory_urls` off means every link must name a file, so a
    /// resolved path without an extension gets `.md` appended.
    pub fn new(index: I, use_directory_urls: bool) -> Self {
        Self {
            index,
            use_directory_urls,
            recognizers: Vec::new(),
            definition_recognizers: Vec::new(),
        }
    }

    /// Register a recognizer for in-text links. Registration order is match
    /// precedence.
    pub fn add_recognizer(mut self, recognizer: impl Recognizer + 'static) -> Self {
        self.recognizers.push(Box::new(recognizer));
        self
    }

    /// Register a recognizer for the definition pass only.
    pub fn add_definition_recognizer(mut self, recognizer: impl Recognizer + 'static) -> Self {
        self.definition_recognizers.push(Box::new(recognizer));
        self
    }

    pub fn compile(self) -> Result<Replacer<I>, PatternError> {
        let pattern = pattern::combine(self.recognizers.iter().map(|r| r.pattern()))?;
        let definition_pattern = if self.definition_recognizers.is_empty() {
            None
        } else {
            Some(pattern::combine(
                self.definition_recognizers.iter().map(|r| r.pattern()),
            )?)
        };

        Ok(Replacer {
            index: self.index,
            use_directory_urls: self.use_directory_urls,
            recognizers: self.recognizers,
            definition_recognizers: self.definition_recognizers,
            pattern,
            definition_pattern,
        })
    }
}

/// Compiled link rewriter. Holds no per-document state, so one instance can
/// serve any number of documents, including from several threads.
pub struct Replacer<I> {
    index: I,
    use_directory_urls: bool,
    recognizers: Vec<Box<dyn Recognizer>>,
    definition_recognizers: Vec<Box<dyn Recognizer>>,
    pattern: Regex,
    definition_pattern: Option<Regex>,
}

impl<I: LocationIndex> Replacer<I> {
    pub fn builder(index: I, use_directory_urls: bool) -> ReplacerBuilder<I> {
        ReplacerBuilder::new(index, use_directory_urls)
    }

    /// Standard markdown links always; wikilinks and reference links as
    /// enabled in `options`.
    pub fn from_options(
        index: I,
        use_directory_urls: bool,
        options: &Options,
    ) -> Result<Self, PatternError> {
        let mut builder = Self::builder(index, use_directory_urls).add_recognizer(MarkdownLink);
        if options.wikilinks {
            builder = builder.add_recognizer(WikiLink);
        }
        if options.reference_links {
            builder = builder
                .add_recognizer(ReferenceLink)
                .add_definition_recognizer(ReferenceDefinition);
        }
        builder.compile()
    }

    /// Rewrite every link in `markdown`, the content of the document at
    /// `path` (relative to the docs root).
    pub fn replace(&self, path: &RelativePath, markdown: &str) -> String {
        let targets = self.target_map(path, markdown);

        self.pattern
            .replace_all(markdown, |caps: &Captures<'_>| {
                self.replace_match(path, caps, &targets)
            })
            .into_owned()
    }

    /// Resolve every reference definition in the document.
    pub fn target_map(&self, path: &RelativePath, markdown: &str) -> TargetMap {
        let mut targets = TargetMap::new();
        let Some(pattern) = &self.definition_pattern else {
            return targets;
        };

        for caps in pattern.captures_iter(markdown) {
            if is_code(&caps) {
                continue;
            }
            match self.define(path, &caps) {
                Ok(Some(link)) => targets.insert(link),
                Ok(None) => {}
                Err(err) => log::debug!("[relink] {err}"),
            }
        }

        targets
    }

    fn replace_match(&self, path: &RelativePath, caps: &Captures<'_>, targets: &TargetMap) -> String {
        if is_code(caps) {
            return caps[0].to_string();
        }

        match self.rewrite(path, caps, targets) {
            Ok(Some(rendered)) => rendered,
            Ok(None) => caps[0].to_string(),
            Err(err) => {
                log::debug!("[relink] {err}");
                caps[0].to_string()
            }
        }
    }

    /// The first recognizer to claim the match handles it; a failure there is
    /// final and no later recognizer is tried.
    fn rewrite(
        &self,
        path: &RelativePath,
        caps: &Captures<'_>,
        targets: &TargetMap,
    ) -> Result<Option<String>, BrokenLink> {
        let raw = &caps[0];
        let Some(recognizer) = self.recognizers.iter().find(|r| r.matches(caps)) else {
            return Ok(None);
        };
        let mut link = recognizer
            .extract(caps)
            .ok_or_else(|| BrokenLink::Unextractable { raw: raw.to_string() })?;

        if !link.target.is_empty()
            && let Some(definition) = targets.get(&link.target)
        {
            return Ok(Some(through_definition(&link, definition)));
        }

        self.resolve(path, &mut link, raw)?;
        Ok(Some(link.render(LabelMode::Text)))
    }

    fn define(&self, path: &RelativePath, caps: &Captures<'_>) -> Result<Option<Link>, BrokenLink> {
        let raw = &caps[0];
        let Some(recognizer) = self.definition_recognizers.iter().find(|r| r.matches(caps)) else {
            return Ok(None);
        };
        let mut link = recognizer
            .extract(caps)
            .ok_or_else(|| BrokenLink::Unextractable { raw: raw.to_string() })?;

        self.resolve(path, &mut link, raw)?;
        Ok(Some(link))
    }

    /// Replace the link's logical target with an encoded path relative to the
    /// document. An empty target with an anchor points at the document
    /// itself, which is the empty relative path.
    ///
    /// Definitions go through here as well, so target map paths are already
    /// encoded and a link rendered from a definition never carries a raw space.
    fn resolve(&self, path: &RelativePath, link: &mut Link, raw: &str) -> Result<(), BrokenLink> {
        if link.target.is_empty() {
            if link.anchor.is_empty() {
                return Err(BrokenLink::NoTarget { raw: raw.to_string() });
            }
            return Ok(());
        }

        let found = self.locate(path, &link.target, raw)?;
        link.target = relative_link(path, &found);
        Ok(())
    }

    fn locate(&self, path: &RelativePath, target: &str, raw: &str) -> Result<RelativePathBuf, BrokenLink> {
        let found = self
            .index
            .search(path, target)
            .filter(|found| !found.as_str().is_empty())
            .ok_or_else(|| BrokenLink::NotFound {
                target: target.to_string(),
                raw: raw.to_string(),
            })?;

        if self.use_directory_urls || found.extension().is_some() {
            Ok(found)
        } else {
            Ok(RelativePathBuf::from(format!("{found}.md")))
        }
    }
}

fn is_code(caps: &Captures<'_>) -> bool {
    caps.name(FENCED_CODE).is_some() || caps.name(INLINE_CODE).is_some()
}

/// Render the definition an occurrence names. The definition supplies the
/// path, anchor and image flag, and its title becomes the label; the
/// occurrence only contributes its text when the definition has no title.
fn through_definition(occurrence: &Link, definition: &Link) -> String {
    Link {
        text: occurrence.text.clone(),
        ..definition.clone()
    }
    .render(LabelMode::Title)
}

/// Path from the document's directory to `found`, percent-encoded.
fn relative_link(path: &RelativePath, found: &RelativePath) -> String {
    let dir = path.parent().unwrap_or_else(|| RelativePath::new(""));
    let relative = dir.relative(found);
    utf8_percent_encode(relative.as_str(), LINK_PATH).to_string()
}
