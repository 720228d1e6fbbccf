pub mod index;
pub mod io;
pub mod link;
pub mod options;
pub mod recognizers;
pub mod replacer;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use index::{FileIndex, LocationIndex};
pub use io::*;
pub use link::{LabelMode, Link};
pub use options::Options;
pub use recognizers::{
    MarkdownLink, Recognizer, ReferenceDefinition, ReferenceLink, WikiLink, wikilink::slugify,
};
pub use replacer::{BrokenLink, PatternError, Replacer, ReplacerBuilder, TargetMap};
