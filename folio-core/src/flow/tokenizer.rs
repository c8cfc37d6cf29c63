//! Splitting a page into word and gap tokens

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Maximal runs of non-whitespace or whitespace
static WORD_OR_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+|\s+").expect("token pattern is valid"));

/// Token stream of one page
///
/// Concatenating `tokens` reproduces the page text exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlowPageData {
    pub tokens: Vec<String>,
    /// Number of word tokens, never below one
    pub word_count: usize,
}

impl FlowPageData {
    /// Whether a token is a word rather than a gap
    pub fn is_word(token: &str) -> bool {
        token.chars().any(|c| !c.is_whitespace())
    }
}

/// Tokenize a page into alternating words and gaps
pub fn tokenize(page: &str) -> FlowPageData {
    let mut tokens: Vec<String> = WORD_OR_GAP
        .find_iter(page)
        .map(|m| m.as_str().to_string())
        .collect();
    if tokens.is_empty() {
        tokens.push(String::new());
    }

    let words = tokens.iter().filter(|t| FlowPageData::is_word(t)).count();
    FlowPageData {
        tokens,
        word_count: words.max(1),
    }
}

/// Flow data for every page of a chapter
pub fn build_flow_data(pages: &[String]) -> Vec<FlowPageData> {
    pages.iter().map(|page| tokenize(page)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_alternate() {
        let data = tokenize("Hello,  world\nagain");
        assert_eq!(data.tokens, vec!["Hello,", "  ", "world", "\n", "again"]);
        assert_eq!(data.word_count, 3);
    }

    #[test]
    fn test_leading_gap_kept() {
        let data = tokenize("\n\nStart here");
        assert_eq!(data.tokens, vec!["\n\n", "Start", " ", "here"]);
        assert_eq!(data.word_count, 2);
    }

    #[test]
    fn test_empty_page_has_one_slot() {
        let data = tokenize("");
        assert_eq!(data.tokens, vec![""]);
        assert_eq!(data.word_count, 1);
    }

    #[test]
    fn test_blank_page_has_one_slot() {
        let data = tokenize(" \n\t ");
        assert_eq!(data.tokens, vec![" \n\t "]);
        assert_eq!(data.word_count, 1);
    }

    #[test]
    fn test_reconstruction() {
        let page = "  a  b\n\nc\td  ";
        assert_eq!(tokenize(page).tokens.concat(), page);
    }
}
