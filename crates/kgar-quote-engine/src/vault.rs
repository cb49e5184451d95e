//! Tracks which notes in a vault opt into kgar handling via frontmatter.
//!
//! The index is driven by file events the host delivers (`create`,
//! `rename`, `delete`, `modify`) plus a "metadata resolved" signal.
//! Modifications are only flagged; flagged entries are re-read in one pass
//! when metadata resolves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use relative_path::{RelativePath, RelativePathBuf};
use serde_yaml::Value;

use crate::io::{self, IoError};

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error(transparent)]
    Io(#[from] IoError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileInfo {
    pub is_kgar: bool,
    pub needs_update: bool,
}

#[derive(Debug, Clone)]
pub struct FileIndex {
    notes_root: PathBuf,
    files: BTreeMap<RelativePathBuf, FileInfo>,
}

impl FileIndex {
    /// Empty index over `notes_root`
    pub fn new(notes_root: impl Into<PathBuf>) -> Self {
        Self {
            notes_root: notes_root.into(),
            files: BTreeMap::new(),
        }
    }

    /// Populates an index from every markdown note under `notes_root`
    pub fn scan(notes_root: impl Into<PathBuf>) -> Result<Self, VaultError> {
        let mut index = Self::new(notes_root);
        for path in io::scan_markdown_files(&index.notes_root)? {
            let relative = io::relative_to(&index.notes_root, &path)?;
            let is_kgar = index.evaluate(&relative)?;
            index.files.insert(
                relative,
                FileInfo {
                    is_kgar,
                    needs_update: false,
                },
            );
        }
        debug!(
            "indexed {} notes ({} kgar) under {}",
            index.files.len(),
            index.kgar_files().count(),
            index.notes_root.display()
        );
        Ok(index)
    }

    pub fn notes_root(&self) -> &Path {
        &self.notes_root
    }

    pub fn get(&self, path: &RelativePath) -> Option<&FileInfo> {
        self.files.get(path)
    }

    pub fn is_kgar(&self, path: &RelativePath) -> bool {
        self.get(path).is_some_and(|info| info.is_kgar)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RelativePath, &FileInfo)> {
        self.files.iter().map(|(path, info)| (path.as_relative_path(), info))
    }

    pub fn kgar_files(&self) -> impl Iterator<Item = &RelativePath> {
        self.iter()
            .filter(|(_, info)| info.is_kgar)
            .map(|(path, _)| path)
    }

    pub fn on_create(&mut self, path: &RelativePath) -> Result<(), VaultError> {
        if !io::is_markdown(path.as_str()) {
            return Ok(());
        }
        let is_kgar = self.evaluate(path)?;
        self.files.insert(
            path.to_relative_path_buf(),
            FileInfo {
                is_kgar,
                needs_update: false,
            },
        );
        Ok(())
    }

    pub fn on_rename(&mut self, path: &RelativePath, old_path: &RelativePath) -> Result<(), VaultError> {
        self.files.remove(old_path);
        self.on_create(path)
    }

    pub fn on_delete(&mut self, path: &RelativePath) {
        self.files.remove(path);
    }

    /// Flags a known note for re-evaluation. Unknown paths are ignored.
    pub fn on_modify(&mut self, path: &RelativePath) {
        if let Some(info) = self.files.get_mut(path) {
            info.needs_update = true;
        }
    }

    /// Re-reads every flagged note and clears its flag. Returns how many
    /// notes were refreshed.
    pub fn on_metadata_resolved(&mut self) -> usize {
        let flagged: Vec<RelativePathBuf> = self
            .files
            .iter()
            .filter(|(_, info)| info.needs_update)
            .map(|(path, _)| path.clone())
            .collect();

        for path in &flagged {
            let is_kgar = match self.evaluate(path) {
                Ok(is_kgar) => is_kgar,
                Err(err) => {
                    warn!("could not re-read {path}: {err}");
                    false
                }
            };
            if let Some(info) = self.files.get_mut(path) {
                *info = FileInfo {
                    is_kgar,
                    needs_update: false,
                };
            }
        }

        flagged.len()
    }

    fn evaluate(&self, path: &RelativePath) -> Result<bool, VaultError> {
        let source = io::read_file(path, &self.notes_root)?;
        Ok(is_kgar_frontmatter(&source))
    }
}

/// The YAML between a leading `---` line and the next `---` or `...` line.
fn frontmatter(source: &str) -> Option<&str> {
    let rest = source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some(&rest[..offset]);
        }
        offset += line.len();
    }
    None
}

/// True when the note's frontmatter has a `kgar` key (any case) set to
/// `true` or `1`.
pub fn is_kgar_frontmatter(source: &str) -> bool {
    let Some(yaml) = frontmatter(source) else {
        return false;
    };
    let Ok(Value::Mapping(map)) = serde_yaml::from_str::<Value>(yaml) else {
        return false;
    };

    map.iter()
        .find(|(key, _)| key.as_str().is_some_and(|k| k.eq_ignore_ascii_case("kgar")))
        .is_some_and(|(_, value)| is_truthy(value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => s.trim().parse::<f64>().is_ok_and(|n| n == 1.0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_file, create_test_notes_dir};
    use rstest::rstest;

    #[rstest]
    #[case::lowercase_true("---\nkgar: true\n---\nbody", true)]
    #[case::uppercase_key("---\nKGAR: true\n---\n", true)]
    #[case::numeric_one("---\nKgar: 1\n---\n", true)]
    #[case::quoted_one("---\nkgar: \"1\"\n---\n", true)]
    #[case::dot_terminator("---\nkgar: true\n...\n", true)]
    #[case::crlf("---\r\nkgar: true\r\n---\r\n", true)]
    #[case::false_value("---\nkgar: false\n---\n", false)]
    #[case::string_true("---\nkgar: \"true\"\n---\n", false)]
    #[case::other_key("---\ntags: [kgar]\n---\n", false)]
    #[case::unterminated("---\nkgar: true\n", false)]
    #[case::not_at_start("\n---\nkgar: true\n---\n", false)]
    #[case::broken_yaml("---\nkgar: [true\n---\n", false)]
    #[case::scalar_yaml("---\nkgar\n---\n", false)]
    #[case::no_frontmatter("> $kgar\n", false)]
    fn frontmatter_flag(#[case] source: &str, #[case] expected: bool) {
        assert_eq!(is_kgar_frontmatter(source), expected);
    }

    #[test]
    fn scan_classifies_notes() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "on.md", "---\nkgar: true\n---\n");
        create_test_file(&notes_dir, "sub/off.md", "plain");
        create_test_file(&notes_dir, "image.png", "");

        let index = FileIndex::scan(notes_dir.path()).unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.is_kgar(RelativePath::new("on.md")));
        assert!(!index.is_kgar(RelativePath::new("sub/off.md")));
        assert_eq!(
            index.kgar_files().collect::<Vec<_>>(),
            vec![RelativePath::new("on.md")]
        );
    }

    #[test]
    fn create_rename_delete() {
        let notes_dir = create_test_notes_dir();
        let mut index = FileIndex::new(notes_dir.path());

        create_test_file(&notes_dir, "a.md", "---\nkgar: 1\n---\n");
        index.on_create(RelativePath::new("a.md")).unwrap();
        assert!(index.is_kgar(RelativePath::new("a.md")));

        std::fs::rename(notes_dir.path().join("a.md"), notes_dir.path().join("b.md")).unwrap();
        index
            .on_rename(RelativePath::new("b.md"), RelativePath::new("a.md"))
            .unwrap();
        assert!(index.get(RelativePath::new("a.md")).is_none());
        assert!(index.is_kgar(RelativePath::new("b.md")));

        index.on_delete(RelativePath::new("b.md"));
        assert!(index.is_empty());
    }

    #[test]
    fn create_of_missing_note_is_an_error() {
        let notes_dir = create_test_notes_dir();
        let mut index = FileIndex::new(notes_dir.path());
        let result = index.on_create(RelativePath::new("ghost.md"));
        assert!(matches!(result, Err(VaultError::Io(IoError::NotFound(_)))));
        assert!(index.is_empty());
    }

    #[test]
    fn modify_defers_until_metadata_resolves() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "note.md", "plain");
        create_test_file(&notes_dir, "other.md", "plain");
        let mut index = FileIndex::scan(notes_dir.path()).unwrap();

        create_test_file(&notes_dir, "note.md", "---\nkgar: true\n---\n");
        index.on_modify(RelativePath::new("note.md"));
        index.on_modify(RelativePath::new("unknown.md"));

        let info = index.get(RelativePath::new("note.md")).unwrap();
        assert!(!info.is_kgar);
        assert!(info.needs_update);

        assert_eq!(index.on_metadata_resolved(), 1);
        assert_eq!(
            index.get(RelativePath::new("note.md")),
            Some(&FileInfo {
                is_kgar: true,
                needs_update: false
            })
        );
        assert_eq!(index.on_metadata_resolved(), 0);
    }

    #[test]
    fn flagged_note_deleted_on_disk_becomes_plain() {
        let notes_dir = create_test_notes_dir();
        let path = create_test_file(&notes_dir, "note.md", "---\nkgar: true\n---\n");
        let mut index = FileIndex::scan(notes_dir.path()).unwrap();

        std::fs::remove_file(path).unwrap();
        index.on_modify(RelativePath::new("note.md"));
        assert_eq!(index.on_metadata_resolved(), 1);
        assert!(!index.is_kgar(RelativePath::new("note.md")));
    }
}
