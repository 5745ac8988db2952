//! Boolean queries in conjunctive normal form.
//!
//! A query is an AND (`&`) of clauses, each clause an OR (`|`) of terms, and
//! each term may be negated with a leading `!`:
//!
//! ```text
//! cat | kitten & !dog
//! ```
//!
//! There is no escaping, so `&`, `|` and `!` can never be part of a term.
//! A query made of one bare term skips the boolean machinery and answers
//! with that term's posting list.

use crate::document::DocId;
use crate::index::{InvertedIndex, PostingList};
use crate::tokenizer::Tokenizer;
use std::collections::BTreeSet;
use std::fmt;

const AND: char = '&';
const OR: char = '|';
const NOT: char = '!';

/// A possibly negated query term, as written by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub term: String,
    pub negated: bool,
}

impl Literal {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text.strip_prefix(NOT) {
            Some(rest) => Self {
                term: rest.to_string(),
                negated: true,
            },
            None => Self {
                term: text.to_string(),
                negated: false,
            },
        }
    }
}

/// OR of literals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<Literal>,
}

impl Clause {
    pub fn parse(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self { literals: Vec::new() };
        }
        Self {
            literals: text.split(OR).map(Literal::parse).collect(),
        }
    }

    /// An empty clause matches nothing, which empties the whole query
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

/// AND of clauses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnfQuery {
    pub clauses: Vec<Clause>,
}

impl CnfQuery {
    /// Parse a query. Parsing never fails; malformed pieces just match nothing.
    pub fn parse(query: &str) -> Self {
        Self {
            clauses: query.split(AND).map(Clause::parse).collect(),
        }
    }
}

impl fmt::Display for CnfQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " {AND} ")?;
            }
            for (j, literal) in clause.literals.iter().enumerate() {
                if j > 0 {
                    write!(f, " {OR} ")?;
                }
                if literal.negated {
                    write!(f, "{NOT}")?;
                }
                write!(f, "{}", literal.term)?;
            }
        }
        Ok(())
    }
}

/// True when `query` has no operators and is answered by a plain lookup
pub fn is_bare_term(query: &str) -> bool {
    !query.contains(&[AND, OR, NOT][..])
}

/// Answer to a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    /// A bare term's posting list, ordered by doc id
    Postings(PostingList),
    /// Documents matching a boolean query
    Documents(BTreeSet<DocId>),
}

impl QueryResult {
    /// Matching doc ids in ascending order
    pub fn doc_ids(&self) -> Vec<DocId> {
        match self {
            Self::Postings(list) => list.doc_ids().collect(),
            Self::Documents(ids) => ids.iter().copied().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Postings(list) => list.len(),
            Self::Documents(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, doc_id: DocId) -> bool {
        match self {
            Self::Postings(list) => list.contains(doc_id),
            Self::Documents(ids) => ids.contains(&doc_id),
        }
    }
}

/// Evaluates queries against a built index without modifying it
pub struct QueryEvaluator<'a> {
    index: &'a InvertedIndex,
    tokenizer: Tokenizer,
}

impl<'a> QueryEvaluator<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self {
            index,
            tokenizer: Tokenizer::new(),
        }
    }

    /// Answer a query string, taking the bare-term shortcut when possible
    pub fn evaluate(&self, query: &str) -> QueryResult {
        if is_bare_term(query) && !query.trim().is_empty() {
            return QueryResult::Postings(self.lookup(query).cloned().unwrap_or_default());
        }
        QueryResult::Documents(self.evaluate_cnf(&CnfQuery::parse(query)))
    }

    /// Posting list of a raw query term.
    ///
    /// The term goes through the same tokenizer as documents; anything that
    /// does not tokenize to exactly one term cannot be in the index.
    pub fn lookup(&self, raw_term: &str) -> Option<&'a PostingList> {
        let mut terms = self.tokenizer.tokenize(raw_term).into_iter();
        match (terms.next(), terms.next()) {
            (Some(term), None) => self.index.postings(&term),
            _ => None,
        }
    }

    pub fn evaluate_cnf(&self, query: &CnfQuery) -> BTreeSet<DocId> {
        let mut clauses = query.clauses.iter();
        let Some(first) = clauses.next() else {
            return BTreeSet::new();
        };

        let mut result = self.evaluate_clause(first);
        for clause in clauses {
            if result.is_empty() {
                break;
            }
            let matches = self.evaluate_clause(clause);
            result.retain(|doc_id| matches.contains(doc_id));
        }

        tracing::debug!(query = %query, matches = result.len(), "evaluated query");
        result
    }

    fn evaluate_clause(&self, clause: &Clause) -> BTreeSet<DocId> {
        if clause.is_empty() {
            tracing::warn!("empty query clause matches no documents");
            return BTreeSet::new();
        }

        let mut result = BTreeSet::new();
        for literal in &clause.literals {
            result.extend(self.resolve(literal));
        }
        result
    }

    fn resolve(&self, literal: &Literal) -> BTreeSet<DocId> {
        let matches: BTreeSet<DocId> = self
            .lookup(&literal.term)
            .map(|list| list.doc_ids().collect())
            .unwrap_or_default();

        if literal.negated {
            (0..self.index.total_documents())
                .filter(|doc_id| !matches.contains(doc_id))
                .collect()
        } else {
            matches
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    fn build(docs: &[&str]) -> InvertedIndex {
        let tokenizer = Tokenizer::new();
        let mut index = InvertedIndex::new();
        for (doc_id, text) in docs.iter().enumerate() {
            let frequencies: HashMap<String, u32> = tokenizer.term_frequencies(text);
            let path = format!("doc{doc_id}.txt");
            index
                .index_document(doc_id, Path::new(&path), &frequencies)
                .unwrap();
        }
        index
    }

    fn animals() -> InvertedIndex {
        build(&["The cat sat.", "A cat and a dog.", "No animals here."])
    }

    fn ids(result: QueryResult) -> Vec<DocId> {
        result.doc_ids()
    }

    #[test]
    fn test_parse() {
        let query = CnfQuery::parse(" cat | !Dog & bird ");
        assert_eq!(query.clauses.len(), 2);
        assert_eq!(
            query.clauses[0].literals,
            vec![
                Literal { term: "cat".into(), negated: false },
                Literal { term: "Dog".into(), negated: true },
            ]
        );
        assert_eq!(query.to_string(), "cat | !Dog & bird");
    }

    #[test]
    fn test_parse_empty_clause() {
        let query = CnfQuery::parse("cat & ");
        assert_eq!(query.clauses.len(), 2);
        assert!(query.clauses[1].is_empty());
    }

    #[test]
    fn test_bare_term() {
        assert!(is_bare_term("cat"));
        assert!(!is_bare_term("cat & dog"));
        assert!(!is_bare_term("!cat"));
    }

    #[test]
    fn test_bare_term_returns_postings() {
        let index = animals();
        let result = QueryEvaluator::new(&index).evaluate("Cat");
        match result {
            QueryResult::Postings(list) => {
                assert_eq!(list.doc_ids().collect::<Vec<_>>(), vec![0, 1]);
                assert_eq!(list.frequency(1), Some(1));
            }
            other => panic!("expected postings, got {other:?}"),
        }
    }

    #[test]
    fn test_and_or_not() {
        let index = animals();
        let evaluator = QueryEvaluator::new(&index);

        assert_eq!(ids(evaluator.evaluate("cat & dog")), vec![1]);
        assert_eq!(ids(evaluator.evaluate("cat | dog")), vec![0, 1]);
        assert_eq!(ids(evaluator.evaluate("!cat")), vec![2]);
        assert_eq!(ids(evaluator.evaluate("cat & !dog")), vec![0]);
    }

    #[test]
    fn test_unknown_term() {
        let index = animals();
        let evaluator = QueryEvaluator::new(&index);

        assert!(evaluator.evaluate("zebra").is_empty());
        assert_eq!(ids(evaluator.evaluate("!zebra")), vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_clause_empties_result() {
        let index = animals();
        let evaluator = QueryEvaluator::new(&index);

        assert!(evaluator.evaluate("cat & ").is_empty());
        assert!(evaluator.evaluate(" & !zebra").is_empty());
        assert!(evaluator.evaluate("").is_empty());
        assert!(evaluator.evaluate("   ").is_empty());
    }

    #[test]
    fn test_negation_is_complement() {
        let index = animals();
        let evaluator = QueryEvaluator::new(&index);

        for term in ["cat", "dog", "a", "here", "zebra"] {
            let positive = evaluator.evaluate(term);
            let negative = evaluator.evaluate(&format!("!{term}"));
            for doc_id in 0..index.total_documents() {
                assert_ne!(positive.contains(doc_id), negative.contains(doc_id), "{term} / {doc_id}");
            }
        }
    }

    #[test]
    fn test_query_terms_are_normalized() {
        let index = animals();
        let evaluator = QueryEvaluator::new(&index);

        assert_eq!(ids(evaluator.evaluate("CAT. & Dog,")), vec![1]);
        // Several words in one term never match a single indexed term
        assert!(evaluator.evaluate("cat sat | no animals").is_empty());
    }

    #[test]
    fn test_duplicate_terms_in_clause() {
        let index = animals();
        let evaluator = QueryEvaluator::new(&index);

        assert_eq!(ids(evaluator.evaluate("cat | cat & cat")), vec![0, 1]);
        assert_eq!(ids(evaluator.evaluate("cat | !cat")), vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_index() {
        let index = InvertedIndex::new();
        let evaluator = QueryEvaluator::new(&index);

        assert!(evaluator.evaluate("cat").is_empty());
        assert!(evaluator.evaluate("!cat").is_empty());
    }
}
