use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary docs directory
pub fn create_test_docs_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test file (and any parent directories) with content
pub fn create_test_file(docs_dir: &TempDir, relative: &str, content: &str) -> PathBuf {
    let file_path = docs_dir.path().join(relative);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}
