use crate::document::{DocId, Document};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One document's entry in a term's posting list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    /// Occurrences of the term in the document, always at least 1
    pub frequency: u32,
}

impl Posting {
    pub fn new(doc_id: DocId, frequency: u32) -> Self {
        Self { doc_id, frequency }
    }
}

/// Postings for a single term, sorted ascending by `doc_id` with one entry
/// per document.
///
/// A document is a member of the list iff it has an entry, so the plain
/// membership view is just [`PostingList::doc_ids`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingList {
    postings: Vec<Posting>,
}

impl PostingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Posting> {
        self.postings.iter()
    }

    pub fn as_slice(&self) -> &[Posting] {
        &self.postings
    }

    /// Document ids in ascending order
    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.postings.iter().map(|p| p.doc_id)
    }

    pub fn contains(&self, doc_id: DocId) -> bool {
        self.position(doc_id).is_ok()
    }

    pub fn frequency(&self, doc_id: DocId) -> Option<u32> {
        self.position(doc_id)
            .ok()
            .map(|i| self.postings[i].frequency)
    }

    fn position(&self, doc_id: DocId) -> std::result::Result<usize, usize> {
        self.postings.binary_search_by_key(&doc_id, |p| p.doc_id)
    }

    /// Set the frequency for `doc_id`, inserting an entry if it has none.
    /// Never creates a second entry for the same document.
    pub fn upsert(&mut self, doc_id: DocId, frequency: u32) {
        match self.position(doc_id) {
            Ok(i) => self.postings[i].frequency = frequency,
            Err(i) => self.postings.insert(i, Posting::new(doc_id, frequency)),
        }
    }

    /// Remove the entry for `doc_id`, returning whether one existed
    pub fn remove(&mut self, doc_id: DocId) -> bool {
        match self.position(doc_id) {
            Ok(i) => {
                self.postings.remove(i);
                true
            }
            Err(_) => false,
        }
    }
}

impl<'a> IntoIterator for &'a PostingList {
    type Item = &'a Posting;
    type IntoIter = std::slice::Iter<'a, Posting>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Inverted index: term -> posting list, plus the documents it covers
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    documents: Vec<Document>,
    doc_ids: HashMap<PathBuf, DocId>,
    postings: HashMap<String, PostingList>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents in `doc_id` order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.documents.get(doc_id)
    }

    pub fn doc_id_of(&self, path: &Path) -> Option<DocId> {
        self.doc_ids.get(path).copied()
    }

    pub fn total_documents(&self) -> usize {
        self.documents.len()
    }

    /// Work out which id a document at `path` is indexed under.
    ///
    /// An explicit id must name an existing document and `path` must not
    /// belong to a different one. Without an explicit id a known path keeps
    /// its id and an unknown path gets the next free one.
    pub fn resolve_doc_id(&self, path: &Path, explicit: Option<DocId>) -> Result<DocId> {
        let Some(doc_id) = explicit else {
            return Ok(self.doc_id_of(path).unwrap_or(self.documents.len()));
        };

        if doc_id >= self.documents.len() {
            return Err(Error::UnknownDocId {
                doc_id,
                count: self.documents.len(),
            });
        }
        match self.doc_id_of(path) {
            Some(owner) if owner != doc_id => Err(Error::PathConflict {
                path: path.to_path_buf(),
                doc_id: owner,
            }),
            _ => Ok(doc_id),
        }
    }

    /// Index a document's terms under `doc_id`.
    ///
    /// `doc_id` is either an existing document, whose previous postings are
    /// replaced, or exactly the next free id, which appends a new document.
    pub fn index_document(
        &mut self,
        doc_id: DocId,
        path: &Path,
        frequencies: &HashMap<String, u32>,
    ) -> Result<()> {
        let count = self.documents.len();
        if doc_id > count {
            return Err(Error::UnknownDocId { doc_id, count });
        }
        if let Some(owner) = self.doc_id_of(path).filter(|&owner| owner != doc_id) {
            return Err(Error::PathConflict {
                path: path.to_path_buf(),
                doc_id: owner,
            });
        }

        if doc_id == count {
            self.documents.push(Document::new(doc_id, path));
            self.doc_ids.insert(path.to_path_buf(), doc_id);
        } else {
            let document = &mut self.documents[doc_id];
            if document.path != path {
                self.doc_ids.remove(&document.path);
                document.path = path.to_path_buf();
                self.doc_ids.insert(path.to_path_buf(), doc_id);
            }
            self.remove_postings(doc_id);
        }

        for (term, &frequency) in frequencies {
            if frequency == 0 {
                continue;
            }
            self.postings
                .entry(term.clone())
                .or_default()
                .upsert(doc_id, frequency);
        }

        Ok(())
    }

    /// Drop every posting of `doc_id`, keeping the document itself
    fn remove_postings(&mut self, doc_id: DocId) {
        for list in self.postings.values_mut() {
            list.remove(doc_id);
        }

        // Clean up empty entries
        self.postings.retain(|_, list| !list.is_empty());
    }

    /// Get the posting list of an already normalized term
    pub fn postings(&self, term: &str) -> Option<&PostingList> {
        self.postings.get(term)
    }

    /// Get number of documents containing a term
    pub fn doc_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map(PostingList::len).unwrap_or(0)
    }

    /// Vocabulary in lexicographic order
    pub fn terms(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.postings.keys().map(String::as_str).collect();
        terms.sort_unstable();
        terms
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total_documents: self.documents.len(),
            total_terms: self.postings.len(),
            avg_docs_per_term: if self.postings.is_empty() {
                0.0
            } else {
                self.postings.values().map(PostingList::len).sum::<usize>() as f64
                    / self.postings.len() as f64
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_documents: usize,
    pub total_terms: usize,
    pub avg_docs_per_term: f64,
}
