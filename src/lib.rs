// Re-export main components
pub mod collection;
pub mod display;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod query;
pub mod tokenizer;

// Re-export commonly used types
pub use collection::CollectionOptions;
pub use document::{ContentReader, DocId, Document, FsReader, MemoryReader};
pub use engine::SearchEngine;
pub use index::{IndexStats, InvertedIndex, Posting, PostingList};
pub use query::{CnfQuery, QueryEvaluator, QueryResult};
pub use tokenizer::Tokenizer;

// Re-export error types
pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
