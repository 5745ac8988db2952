//! Enumerating the documents of a collection.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Where the documents live and which of them to skip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionOptions {
    pub root: PathBuf,
    /// Directory names, file names, directory paths or file paths to skip
    pub excluded: Vec<String>,
    /// Descend into subdirectories instead of listing only the top level
    pub recursive: bool,
}

impl CollectionOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded: Vec::new(),
            recursive: false,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn exclude(mut self, entry: impl Into<String>) -> Self {
        self.excluded.push(entry.into());
        self
    }

    pub fn exclude_all<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(entries.into_iter().map(Into::into));
        self
    }

    /// A file is skipped when an entry names one of its parent directories,
    /// its parent directory path, its file name or its full path.
    fn is_excluded(&self, file: &Path) -> bool {
        let dir = file.parent().unwrap_or_else(|| Path::new(""));
        let name = file.file_name();

        self.excluded.iter().any(|entry| {
            let entry_path = Path::new(entry);
            dir.components().any(|c| c.as_os_str() == entry.as_str())
                || name.is_some_and(|n| n == entry.as_str())
                || dir == entry_path
                || file == entry_path
        })
    }

    /// A directory named by an entry hides its whole subtree
    fn prunes(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .excluded
                .iter()
                .any(|excluded| entry.file_name() == excluded.as_str())
    }
}

/// List the documents of a collection in a deterministic order: within each
/// directory its files come first, sorted by name, then its subdirectories
/// in name order, each walked depth first.
///
/// Fails if the root cannot be read. Unreadable entries below the root are
/// logged and skipped.
pub fn enumerate(options: &CollectionOptions) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(&options.root).sort_by(|a, b| {
        a.file_type()
            .is_dir()
            .cmp(&b.file_type().is_dir())
            .then_with(|| a.file_name().cmp(b.file_name()))
    });
    if !options.recursive {
        walker = walker.max_depth(1);
    }

    let mut documents = Vec::new();
    for entry in walker.into_iter().filter_entry(|e| !options.prunes(e)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(Error::Walk {
                    root: options.root.clone(),
                    source,
                });
            }
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        if path.is_file() && !options.is_excluded(path) {
            documents.push(path.to_path_buf());
        }
    }

    tracing::debug!(root = %options.root.display(), documents = documents.len(), "enumerated collection");
    Ok(documents)
}
