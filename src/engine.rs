use crate::collection::{self, CollectionOptions};
use crate::document::{ContentReader, DocId, Document, FsReader, MemoryReader};
use crate::error::Result;
use crate::index::{IndexStats, InvertedIndex, PostingList};
use crate::query::{QueryEvaluator, QueryResult};
use crate::tokenizer::Tokenizer;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Main search engine.
///
/// Owns one [`InvertedIndex`] behind a single-writer lock: builds and
/// additions take the write side, queries share the read side.
pub struct SearchEngine {
    index: RwLock<InvertedIndex>,
    tokenizer: Tokenizer,
    reader: Box<dyn ContentReader>,
}

impl SearchEngine {
    /// Create an engine that reads documents from the filesystem
    pub fn new() -> Self {
        Self::with_reader(FsReader)
    }

    /// Create an engine over in-memory documents (for testing)
    pub fn in_memory(reader: MemoryReader) -> Self {
        Self::with_reader(reader)
    }

    pub fn with_reader(reader: impl ContentReader + 'static) -> Self {
        Self {
            index: RwLock::new(InvertedIndex::new()),
            tokenizer: Tokenizer::new(),
            reader: Box::new(reader),
        }
    }

    /// Enumerate a collection and build the index from it
    pub fn index_collection(&self, options: &CollectionOptions) -> Result<usize> {
        let sources = collection::enumerate(options)?;
        self.build_from(sources)
    }

    /// Rebuild the index from scratch, assigning doc ids in source order.
    ///
    /// Stops at the first document that cannot be read. The partial index
    /// is dropped and the previous one stays in place.
    pub fn build_from<I, P>(&self, sources: I) -> Result<usize>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let start = Instant::now();
        let mut index = InvertedIndex::new();

        for source in sources {
            let path = source.as_ref();
            let frequencies = self.analyze(path)?;
            let doc_id = index.resolve_doc_id(path, None)?;
            index.index_document(doc_id, path, &frequencies)?;
        }

        let stats = index.stats();
        *self.index.write() = index;

        tracing::info!(
            documents = stats.total_documents,
            terms = stats.total_terms,
            elapsed = ?start.elapsed(),
            "built index"
        );
        Ok(stats.total_documents)
    }

    /// Index a single document, adding it to the collection if its path is new.
    ///
    /// With `explicit_doc_id` the document is indexed under that existing id.
    /// Re-indexing a known document replaces its previous postings.
    pub fn add_document(&self, path: impl AsRef<Path>, explicit_doc_id: Option<DocId>) -> Result<DocId> {
        let path = path.as_ref();
        // Read before locking so queries are not blocked on I/O
        let frequencies = self.analyze(path)?;

        let mut index = self.index.write();
        let doc_id = index.resolve_doc_id(path, explicit_doc_id)?;
        index.index_document(doc_id, path, &frequencies)?;
        Ok(doc_id)
    }

    fn analyze(&self, path: &Path) -> Result<HashMap<String, u32>> {
        let contents = self.reader.read(path)?;
        let frequencies = self.tokenizer.term_frequencies(&contents);

        tracing::debug!(path = %path.display(), terms = frequencies.len(), "analyzed document");
        Ok(frequencies)
    }

    /// Answer a CNF query
    pub fn search(&self, query: &str) -> QueryResult {
        let index = self.index.read();
        QueryEvaluator::new(&index).evaluate(query)
    }

    /// Posting list of a single term, empty if it was never indexed
    pub fn lookup(&self, term: &str) -> PostingList {
        let index = self.index.read();
        QueryEvaluator::new(&index)
            .lookup(term)
            .cloned()
            .unwrap_or_default()
    }

    pub fn document(&self, doc_id: DocId) -> Option<Document> {
        self.index.read().document(doc_id).cloned()
    }

    pub fn document_path(&self, doc_id: DocId) -> Option<PathBuf> {
        self.index.read().document(doc_id).map(|d| d.path.clone())
    }

    pub fn documents(&self) -> Vec<Document> {
        self.index.read().documents().to_vec()
    }

    /// Run `f` against the current index while holding the read lock
    pub fn with_index<T>(&self, f: impl FnOnce(&InvertedIndex) -> T) -> T {
        f(&self.index.read())
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        self.index.read().stats()
    }

    /// Get total document count
    pub fn document_count(&self) -> usize {
        self.index.read().total_documents()
    }

    /// Clear all data
    pub fn clear(&self) {
        *self.index.write() = InvertedIndex::new();
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}
