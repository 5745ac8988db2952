//! Plain-text rendering for the command line.

use crate::document::Document;
use crate::index::{InvertedIndex, PostingList};
use crate::query::QueryResult;
use std::fmt::Write;

/// Interactive commands and their descriptions
pub const COMMANDS: [(&str, &str); 4] = [
    ("Exit", ";;"),
    ("Index", ";;index"),
    ("Docid", ";;docid"),
    ("Help", ";;help"),
];

pub fn format_results(result: &QueryResult, documents: &[Document]) -> String {
    let mut out = String::from("< Results >\n");
    if result.is_empty() {
        out.push_str("No documents found!\n");
        return out;
    }

    for doc_id in result.doc_ids() {
        let written = match documents.get(doc_id) {
            Some(doc) => writeln!(out, "{} {}", doc_id, doc.path.display()),
            None => writeln!(out, "{doc_id}"),
        };
        written.ok();
    }
    out
}

fn format_postings(list: &PostingList) -> String {
    let entries: Vec<String> = list
        .iter()
        .map(|p| format!("({}, {})", p.doc_id, p.frequency))
        .collect();
    format!("[{}]", entries.join(", "))
}

pub fn format_index(index: &InvertedIndex) -> String {
    let terms = index.terms();
    let width = terms.iter().map(|t| t.chars().count()).max().unwrap_or(0);

    let mut out = String::from("< Inverted Index >\n");
    for term in terms {
        if let Some(list) = index.postings(term) {
            writeln!(out, "{term:<width$} {}", format_postings(list)).ok();
        }
    }
    out
}

pub fn format_doc_ids(documents: &[Document]) -> String {
    let width = documents.len().to_string().len();

    let mut out = String::from("< Document IDs >\n");
    for doc in documents {
        writeln!(out, "{:>width$} - {}", doc.id, doc.path.display()).ok();
    }
    out
}

pub fn format_help() -> String {
    let width = COMMANDS.iter().map(|(name, _)| name.len()).max().unwrap_or(0) + 2;

    let mut out = String::from("< Help >\n");
    for (name, command) in COMMANDS {
        writeln!(out, "{name:<width$}- {command}").ok();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashMap};
    use std::path::Path;

    fn documents(count: usize) -> Vec<Document> {
        (0..count).map(|i| Document::new(i, format!("docs/{i}.txt"))).collect()
    }

    #[test]
    fn test_format_results() {
        let result = QueryResult::Documents(BTreeSet::from([2, 0]));
        assert_eq!(
            format_results(&result, &documents(3)),
            "< Results >\n0 docs/0.txt\n2 docs/2.txt\n"
        );
    }

    #[test]
    fn test_format_no_results() {
        let result = QueryResult::Postings(PostingList::new());
        assert_eq!(format_results(&result, &[]), "< Results >\nNo documents found!\n");
    }

    #[test]
    fn test_format_index() -> crate::Result<()> {
        let mut index = InvertedIndex::new();
        let frequencies: HashMap<String, u32> =
            [("cat".to_string(), 2), ("a".to_string(), 1)].into_iter().collect();
        index.index_document(0, Path::new("x.txt"), &frequencies)?;

        assert_eq!(
            format_index(&index),
            "< Inverted Index >\na   [(0, 1)]\ncat [(0, 2)]\n"
        );
        Ok(())
    }

    #[test]
    fn test_format_doc_ids_aligns_ids() {
        let out = format_doc_ids(&documents(11));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "< Document IDs >");
        assert_eq!(lines[1], " 0 - docs/0.txt");
        assert_eq!(lines[11], "10 - docs/10.txt");
    }

    #[test]
    fn test_format_help() {
        let out = format_help();
        assert!(out.starts_with("< Help >\n"));
        assert!(out.contains("Exit   - ;;\n"));
        assert!(out.contains("Index  - ;;index\n"));
    }
}
