use std::cmp::Reverse;
use std::collections::HashMap;
use std::path::Path;

use relative_path::{RelativePath, RelativePathBuf};

use super::LocationIndex;
use crate::io::{self, IoError};

/// In-memory index over every file of a docs tree.
///
/// Names compare case-insensitively with whitespace treated as `-`, so
/// `[[Target Page]]` finds `target-page.md`. A target without an extension
/// matches on the file stem. When several files match, the one sharing the
/// longest directory prefix with the linking document wins, then the
/// shallowest, then the first in path order.
#[derive(Debug, Default, Clone)]
pub struct FileIndex {
    files: Vec<RelativePathBuf>,
    by_name: HashMap<String, Vec<usize>>,
    warn_ambiguities: bool,
}

impl FileIndex {
    pub fn new(files: impl IntoIterator<Item = RelativePathBuf>) -> Self {
        let mut files: Vec<RelativePathBuf> = files.into_iter().map(|f| f.normalize()).collect();
        files.sort();
        files.dedup();

        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, file) in files.iter().enumerate() {
            let Some(file_name) = file.file_name() else {
                continue;
            };
            let full = name_key(file_name);
            if let Some(stem) = file.file_stem() {
                let stem = name_key(stem);
                if stem != full {
                    by_name.entry(stem).or_default().push(i);
                }
            }
            by_name.entry(full).or_default().push(i);
        }

        Self {
            files,
            by_name,
            warn_ambiguities: false,
        }
    }

    /// Scan `root` and index every file not rejected by `skip`.
    pub fn from_dir(root: &Path, skip: impl Fn(&RelativePath) -> bool) -> Result<Self, IoError> {
        Ok(Self::new(io::scan_files(root, skip)?))
    }

    pub fn with_warn_ambiguities(mut self, warn: bool) -> Self {
        self.warn_ambiguities = warn;
        self
    }

    /// All indexed files, in path order.
    pub fn files(&self) -> &[RelativePathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files whose name matches the last component of `wanted` and whose
    /// directory either equals (`exact_dir`) or ends with the rest of it.
    fn candidates(&self, wanted: &RelativePath, exact_dir: bool) -> Vec<&RelativePathBuf> {
        let mut parts: Vec<String> = key_components(wanted.as_str());
        let Some(name) = parts.pop() else {
            return Vec::new();
        };
        let Some(indices) = self.by_name.get(&name) else {
            return Vec::new();
        };

        indices
            .iter()
            .map(|&i| &self.files[i])
            .filter(|file| {
                let dirs = key_components(parent_str(file));
                if exact_dir {
                    dirs == parts
                } else {
                    dirs.ends_with(&parts)
                }
            })
            .collect()
    }

    fn choose(
        &self,
        origin: &RelativePath,
        target: &str,
        candidates: Vec<&RelativePathBuf>,
    ) -> Option<RelativePathBuf> {
        let origin_dirs = key_components(parent_str(origin));

        let chosen = candidates.iter().copied().min_by_key(|file| {
            let dirs = key_components(parent_str(file));
            let shared = origin_dirs
                .iter()
                .zip(&dirs)
                .take_while(|(a, b)| a == b)
                .count();
            (Reverse(shared), dirs.len())
        })?;

        if candidates.len() > 1 && self.warn_ambiguities {
            log::warn!(
                "[relink] '{target}' in '{origin}' matches {} files, using '{chosen}'",
                candidates.len()
            );
        }

        Some(chosen.clone())
    }
}

impl LocationIndex for FileIndex {
    fn search(&self, origin: &RelativePath, target: &str) -> Option<RelativePathBuf> {
        let target = target.trim();
        if target.is_empty() {
            return None;
        }

        if target.contains('/') {
            let origin_dir = origin.parent().unwrap_or_else(|| RelativePath::new(""));
            let joined = origin_dir.join(target).normalize();
            if let Some(found) = self.candidates(&joined, true).first() {
                return Some((*found).clone());
            }
        }

        let wanted = RelativePath::new(target).normalize();
        let candidates = self.candidates(&wanted, false);
        self.choose(origin, target, candidates)
    }
}

/// Comparison key for one path component.
fn name_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

fn key_components(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .map(name_key)
        .collect()
}

fn parent_str(path: &RelativePath) -> &str {
    path.parent().map_or("", RelativePath::as_str)
}
