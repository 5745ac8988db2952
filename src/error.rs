use crate::document::DocId;
use std::path::PathBuf;

/// Errors raised while building or updating the index.
///
/// Unknown query terms and empty query clauses are not errors: they simply
/// match nothing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read document {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk collection {}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("document id {doc_id} is out of range ({count} documents indexed)")]
    UnknownDocId { doc_id: DocId, count: usize },

    #[error("{} already belongs to document {doc_id}", .path.display())]
    PathConflict { path: PathBuf, doc_id: DocId },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
