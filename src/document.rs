use crate::error::{Error, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Zero-based document identifier, assigned in the order documents are first seen
pub type DocId = usize;

/// A document known to the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub path: PathBuf,
}

impl Document {
    pub fn new(id: DocId, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }
}

/// Source of document contents.
///
/// Implementations return the full text with every line separator replaced
/// by a single space.
pub trait ContentReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<String>;
}

fn join_lines(contents: &str) -> String {
    contents.replace('\n', " ")
}

/// Reads documents from the filesystem as UTF-8
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl ContentReader for FsReader {
    fn read(&self, path: &Path) -> Result<String> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(join_lines(&contents))
    }
}

/// Serves documents from memory.
///
/// Clones share the same contents, so a handle kept by the caller can
/// change a document after the reader was handed to an engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    contents: Arc<RwLock<HashMap<PathBuf, String>>>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Insert or replace a document
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.contents.write().insert(path.into(), contents.into());
    }

    pub fn remove(&self, path: &Path) -> Option<String> {
        self.contents.write().remove(path)
    }
}

impl ContentReader for MemoryReader {
    fn read(&self, path: &Path) -> Result<String> {
        self.contents
            .read()
            .get(path)
            .map(|contents| join_lines(contents))
            .ok_or_else(|| {
                Error::io(
                    path,
                    io::Error::new(io::ErrorKind::NotFound, "no such document"),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fs_reader_joins_lines() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "first line\nsecond line\n")?;

        let contents = FsReader.read(file.path())?;
        assert_eq!(contents, "first line second line ");
        Ok(())
    }

    #[test]
    fn test_fs_reader_missing_file() {
        let err = FsReader.read(Path::new("/definitely/not/here.txt")).unwrap_err();
        match err {
            Error::Io { path, source } => {
                assert_eq!(path, PathBuf::from("/definitely/not/here.txt"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fs_reader_rejects_invalid_utf8() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(&[0x66, 0x6f, 0xff, 0xfe])?;

        let err = FsReader.read(file.path()).unwrap_err();
        assert!(matches!(err, Error::Io { ref source, .. } if source.kind() == io::ErrorKind::InvalidData));
        Ok(())
    }

    #[test]
    fn test_memory_reader_shared_between_clones() -> anyhow::Result<()> {
        let reader = MemoryReader::new().with_document("a.txt", "one\ntwo");
        let handle = reader.clone();

        assert_eq!(reader.read(Path::new("a.txt"))?, "one two");

        handle.insert("a.txt", "three");
        assert_eq!(reader.read(Path::new("a.txt"))?, "three");

        handle.remove(Path::new("a.txt"));
        assert!(reader.read(Path::new("a.txt")).is_err());
        Ok(())
    }
}
