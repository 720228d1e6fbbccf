//! # Location Index
//!
//! Maps a logical target name, as written in a link, to the docs-relative path
//! of the file it refers to. The replacer only consumes the result; how names
//! are matched and how ties are broken is up to the implementation.

use relative_path::{RelativePath, RelativePathBuf};

pub mod file_index;

pub use file_index::FileIndex;

/// Resolves link targets to docs-relative file paths.
pub trait LocationIndex: Send + Sync {
    /// Find the file `target` refers to when written in the document at
    /// `origin`. Both paths are relative to the docs root.
    fn search(&self, origin: &RelativePath, target: &str) -> Option<RelativePathBuf>;
}

impl<F> LocationIndex for F
where
    F: Fn(&RelativePath, &str) -> Option<RelativePathBuf> + Send + Sync,
{
    fn search(&self, origin: &RelativePath, target: &str) -> Option<RelativePathBuf> {
        self(origin, target)
    }
}
