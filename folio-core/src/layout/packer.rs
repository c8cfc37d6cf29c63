//! Greedy word-wrap of a single paragraph

use crate::hyphenation::{syllables, Hyphenator};
use regex::Regex;
use std::sync::LazyLock;

/// Words shorter than this are moved to the next line rather than hyphenated
const MIN_HYPHENATE_CHARS: usize = 5;

/// Shortest letter core worth asking the oracle about
const MIN_CORE_CHARS: usize = 4;

/// Shortest head left on a line before a hyphen
const MIN_HEAD_CHARS: usize = 2;

/// Alternating runs of spaces and non-spaces
static SPACE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^ ]+| +").expect("space split pattern is valid"));

/// Leading letters and combining marks
static LETTER_CORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{M}]+").expect("letter core pattern is valid"));

/// A word split at a syllable boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyphenSplit {
    /// Part kept on the current line, without the hyphen
    pub head: String,
    /// Remaining syllables plus any trailing punctuation
    pub tail: String,
}

/// Split `word` so that `head` plus a hyphen fits in `available` characters.
///
/// Only the leading run of letters is hyphenated; trailing punctuation travels
/// with the tail. Returns `None` when no oracle is given, the letter core is
/// too short, the oracle finds no boundary, or the best head would be a
/// one-letter stub.
pub fn try_hyphenate(
    hyphenator: Option<&dyn Hyphenator>,
    word: &str,
    available: usize,
) -> Option<HyphenSplit> {
    let hyphenator = hyphenator?;
    if available < MIN_HEAD_CHARS + 1 {
        return None;
    }

    let core_end = LETTER_CORE.find(word)?.end();
    let (core, suffix) = word.split_at(core_end);
    if core.chars().count() < MIN_CORE_CHARS {
        return None;
    }

    let parts = syllables(hyphenator, core);
    if parts.len() < 2 {
        return None;
    }

    let mut head = String::new();
    let mut head_len = 0;
    let mut best = None;
    for (i, part) in parts[..parts.len() - 1].iter().enumerate() {
        let part_len = part.chars().count();
        if head_len + part_len + 1 > available {
            break;
        }
        head.push_str(part);
        head_len += part_len;
        best = Some(i);
    }

    let best = best?;
    if head_len < MIN_HEAD_CHARS {
        return None;
    }

    let mut tail = parts[best + 1..].concat();
    tail.push_str(suffix);
    Some(HyphenSplit { head, tail })
}

/// Line under construction, with its width in characters
#[derive(Default)]
struct OpenLine {
    text: String,
    width: usize,
}

impl OpenLine {
    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn push(&mut self, s: &str) {
        self.text.push_str(s);
        self.width += s.chars().count();
    }

    /// Emit the line without trailing whitespace; blank lines are dropped
    fn flush(&mut self, lines: &mut Vec<String>) {
        let trimmed = self.text.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
        self.text.clear();
        self.width = 0;
    }
}

/// Byte offset of the `n`th character
fn char_boundary(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

/// Greedy line packer for a fixed character budget
pub struct LinePacker<'h> {
    max_chars: usize,
    hyphenator: Option<&'h dyn Hyphenator>,
}

impl<'h> LinePacker<'h> {
    /// Packer without hyphenation; budgets below one character are raised to one
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
            hyphenator: None,
        }
    }

    /// Use an oracle to split words that overflow a line
    pub fn with_hyphenator(mut self, hyphenator: Option<&'h dyn Hyphenator>) -> Self {
        self.hyphenator = hyphenator;
        self
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Wrap one paragraph into lines
    pub fn pack(&self, paragraph: &str) -> Vec<String> {
        let mut lines = Vec::new();
        self.pack_into(paragraph, &mut lines);
        lines
    }

    /// Wrap one paragraph, appending to `lines`.
    ///
    /// An empty paragraph contributes one empty line so blank-line breaks
    /// survive. Every emitted line is at most `max_chars` characters and never
    /// ends in whitespace.
    pub fn pack_into(&self, paragraph: &str, lines: &mut Vec<String>) {
        let paragraph = paragraph.trim_end();
        if paragraph.is_empty() {
            lines.push(String::new());
            return;
        }

        let mut line = OpenLine::default();
        for token in SPACE_SPLIT.find_iter(paragraph).map(|m| m.as_str()) {
            if token.starts_with(' ') {
                if !line.is_empty() {
                    line.push(token);
                }
                continue;
            }
            self.place_word(token, &mut line, lines);
        }
        line.flush(lines);
    }

    fn place_word(&self, word: &str, line: &mut OpenLine, lines: &mut Vec<String>) {
        let mut pending = word.to_string();
        loop {
            let word_len = pending.chars().count();
            if line.width + word_len <= self.max_chars {
                line.push(&pending);
                return;
            }

            if word_len >= MIN_HYPHENATE_CHARS {
                let available = self.max_chars.saturating_sub(line.width);
                if let Some(split) = try_hyphenate(self.hyphenator, &pending, available) {
                    line.push(&split.head);
                    line.push("-");
                    line.flush(lines);
                    pending = split.tail;
                    continue;
                }
            }

            line.flush(lines);
            if word_len > self.max_chars {
                pending = self.break_long_word(pending, lines);
            }
            line.push(&pending);
            return;
        }
    }

    /// Emit full-width pieces of an overlong word, returning the remainder that fits
    fn break_long_word(&self, word: String, lines: &mut Vec<String>) -> String {
        let mut rest = word;
        while rest.chars().count() > self.max_chars {
            if let Some(split) = try_hyphenate(self.hyphenator, &rest, self.max_chars) {
                lines.push(format!("{}-", split.head));
                rest = split.tail;
                continue;
            }

            // A lone hyphen would never make progress on a one-character line
            let (keep, hyphen) = if self.max_chars >= 2 {
                (self.max_chars - 1, "-")
            } else {
                (1, "")
            };
            let cut = char_boundary(&rest, keep);
            lines.push(format!("{}{}", &rest[..cut], hyphen));
            rest = rest[cut..].to_string();
        }
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyphenation::{hyphenator_for, Language};

    /// Oracle proposing the same breaks for every word
    struct FixedBreaks(&'static [usize]);

    impl Hyphenator for FixedBreaks {
        fn hyphenate(&self, word: &str) -> Vec<usize> {
            let len = word.chars().count();
            self.0.iter().copied().filter(|&b| b > 0 && b < len).collect()
        }
    }

    fn english() -> Box<dyn Hyphenator> {
        hyphenator_for(Language::EnglishUs).unwrap()
    }

    #[test]
    fn test_simple_wrap() {
        let lines = LinePacker::new(10).pack("the quick brown fox jumps");
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_empty_paragraph_keeps_blank_line() {
        assert_eq!(LinePacker::new(10).pack(""), vec![String::new()]);
        assert_eq!(LinePacker::new(10).pack("   "), vec![String::new()]);
    }

    #[test]
    fn test_space_runs_are_preserved_inside_lines() {
        let lines = LinePacker::new(20).pack("one   two");
        assert_eq!(lines, vec!["one   two"]);
    }

    #[test]
    fn test_leading_spaces_dropped() {
        let lines = LinePacker::new(20).pack("   indented text");
        assert_eq!(lines, vec!["indented text"]);
    }

    #[test]
    fn test_no_trailing_whitespace_at_wrap() {
        let lines = LinePacker::new(9).pack("alpha    beta");
        assert_eq!(lines, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_hard_cut_without_oracle() {
        let lines = LinePacker::new(5).pack("abcdefghijkl");
        assert_eq!(lines, vec!["abcd-", "efgh-", "ijkl"]);
    }

    #[test]
    fn test_hard_cut_single_char_budget() {
        let lines = LinePacker::new(1).pack("abc d");
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_hyphenates_at_line_end() {
        let oracle = FixedBreaks(&[2, 6, 7]);
        let packer = LinePacker::new(12).with_hyphenator(Some(&oracle));
        // "read " leaves 7 columns: "hyphen-" fits, "hyphena-" would not
        let lines = packer.pack("read hyphenation rules");
        assert_eq!(lines, vec!["read hyphen-", "ation rules"]);
    }

    #[test]
    fn test_dictionary_split_at_line_end() {
        let oracle = english();
        let packer = LinePacker::new(12).with_hyphenator(Some(oracle.as_ref()));
        let lines = packer.pack("read hyphenation rules");
        assert_eq!(lines, vec!["read hyphen-", "ation rules"]);
    }

    #[test]
    fn test_short_word_moves_instead_of_hyphenating() {
        let oracle = FixedBreaks(&[2]);
        let packer = LinePacker::new(8).with_hyphenator(Some(&oracle));
        let lines = packer.pack("abcdef gone");
        assert_eq!(lines, vec!["abcdef", "gone"]);
    }

    #[test]
    fn test_try_hyphenate_keeps_suffix() {
        let oracle = FixedBreaks(&[4]);
        let split = try_hyphenate(Some(&oracle), "reading,", 5).unwrap();
        assert_eq!(split.head, "read");
        assert_eq!(split.tail, "ing,");
    }

    #[test]
    fn test_try_hyphenate_refusals() {
        let oracle = FixedBreaks(&[2, 4]);
        let oracle: Option<&dyn Hyphenator> = Some(&oracle);
        assert!(try_hyphenate(None, "hyphenation", 20).is_none());
        assert!(try_hyphenate(oracle, "hyphenation", 2).is_none());
        assert!(try_hyphenate(oracle, "\"quoted", 20).is_none());
        assert!(try_hyphenate(oracle, "cat's", 20).is_none());
        assert!(try_hyphenate(Some(&FixedBreaks(&[])), "strength", 20).is_none());
        assert!(try_hyphenate(Some(&FixedBreaks(&[1])), "abcdef", 20).is_none());
    }

    #[test]
    fn test_try_hyphenate_takes_longest_fitting_head() {
        let oracle = FixedBreaks(&[2, 6, 7]);
        let split = try_hyphenate(Some(&oracle), "hyphenation", 8).unwrap();
        assert_eq!(split.head, "hyphena");
        assert_eq!(split.tail, "tion");
    }

    #[test]
    fn test_lines_never_exceed_budget() {
        let oracle = english();
        let text = "Extraordinarily long words like incomprehensibilities test the packer.";
        for width in 1..30 {
            let packer = LinePacker::new(width).with_hyphenator(Some(oracle.as_ref()));
            for line in packer.pack(text) {
                assert!(line.chars().count() <= width, "{:?} exceeds {}", line, width);
                assert_eq!(line.trim_end(), line);
            }
        }
    }
}
