use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid docs directory: {0}")]
    InvalidDocsDir(String),
}

/// Read a document and return its content
pub fn read_file(relative_path: &RelativePath, docs_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(docs_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write content to a document
pub fn write_file(
    relative_path: &RelativePath,
    docs_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(docs_root);

    // Create parent directories if they don't exist
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(IoError::Io)
}

/// Copy a file between two docs trees, creating parent directories
pub fn copy_file(
    relative_path: &RelativePath,
    from_root: &Path,
    to_root: &Path,
) -> Result<(), IoError> {
    let source = relative_path.to_path(from_root);
    let dest = relative_path.to_path(to_root);

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::copy(&source, &dest).map_err(IoError::Io)?;
    Ok(())
}

/// Scan every file under the docs directory, as docs-relative paths.
///
/// `skip` is asked about each file and each directory; skipped directories
/// are not descended into.
pub fn scan_files(
    docs_root: &Path,
    skip: impl Fn(&RelativePath) -> bool,
) -> Result<Vec<RelativePathBuf>, IoError> {
    validate_docs_dir(docs_root)?;

    let mut files = Vec::new();
    scan_directory_recursive(docs_root, RelativePath::new(""), &skip, &mut files)?;
    files.sort();
    Ok(files)
}

/// Scan for markdown documents only
pub fn scan_markdown_files(
    docs_root: &Path,
    skip: impl Fn(&RelativePath) -> bool,
) -> Result<Vec<RelativePathBuf>, IoError> {
    let files = scan_files(docs_root, skip)?;
    Ok(files.into_iter().filter(|f| is_markdown(f)).collect())
}

pub fn is_markdown(path: &RelativePath) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}

fn scan_directory_recursive(
    dir: &Path,
    relative_dir: &RelativePath,
    skip: &impl Fn(&RelativePath) -> bool,
    files: &mut Vec<RelativePathBuf>,
) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();
        let name = entry.file_name();
        let relative = relative_dir.join(name.to_string_lossy().as_ref());

        if skip(&relative) {
            continue;
        }

        if path.is_dir() {
            scan_directory_recursive(&path, &relative, skip, files)?;
        } else {
            files.push(relative);
        }
    }

    Ok(())
}

pub fn validate_docs_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidDocsDir(format!(
            "docs directory not found: {}",
            path.display()
        )));
    }

    Ok(())
}
