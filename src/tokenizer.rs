use std::collections::HashMap;

/// Turns document and query text into normalized terms.
///
/// Normalization lowercases the text and deletes ASCII punctuation; terms
/// are the whitespace-separated pieces of the result. There is no stemming
/// and no stopword removal, so `"Cat."` and `"cat"` are the same term but
/// `"cats"` is not.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Lowercase and strip punctuation, keeping whitespace as it is
    pub fn normalize(&self, text: &str) -> String {
        self.punctuation_filter(&self.lowercase_filter(text))
    }

    fn lowercase_filter(&self, text: &str) -> String {
        text.to_lowercase()
    }

    fn punctuation_filter(&self, text: &str) -> String {
        text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
    }

    /// Full analysis pipeline: normalize, then split on whitespace runs
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// Analyze and count term frequencies
    pub fn term_frequencies(&self, text: &str) -> HashMap<String, u32> {
        let mut frequencies = HashMap::new();
        for term in self.tokenize(text) {
            *frequencies.entry(term).or_insert(0) += 1;
        }
        frequencies
    }
}
