use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid notes directory: {0}")]
    InvalidNotesDir(String),
    #[error("Path {0} is outside the notes directory")]
    OutsideNotesDir(PathBuf),
}

/// Read a note and return its content
pub fn read_file(relative_path: &RelativePath, notes_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(notes_root);
    if !absolute_path.is_file() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Whether a path names a markdown note
pub fn is_markdown(path: impl AsRef<Path>) -> bool {
    path.as_ref().extension().is_some_and(|ext| ext == "md")
}

/// Converts an absolute path under `notes_root` into a note handle
pub fn relative_to(notes_root: &Path, path: &Path) -> Result<RelativePathBuf, IoError> {
    let stripped = path
        .strip_prefix(notes_root)
        .map_err(|_| IoError::OutsideNotesDir(path.to_path_buf()))?;
    RelativePathBuf::from_path(stripped).map_err(|_| IoError::OutsideNotesDir(path.to_path_buf()))
}

/// Scan for markdown notes under the notes directory, sorted by path
pub fn scan_markdown_files(notes_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    validate_notes_dir(notes_root)?;

    let mut files = Vec::new();
    let mut dirs = vec![notes_root.to_path_buf()];
    while let Some(dir) = dirs.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                dirs.push(path);
            } else if is_markdown(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

pub fn validate_notes_dir(path: &Path) -> Result<(), IoError> {
    if !path.is_dir() {
        return Err(IoError::InvalidNotesDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}
