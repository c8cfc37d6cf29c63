//! Grouping wrapped lines into fixed-size pages

use super::packer::LinePacker;
use crate::hyphenation::Hyphenator;

/// Placeholder page for a chapter without visible text
pub const EMPTY_PAGE: &str = "(empty)";

/// Wrap every paragraph of a chapter into one flat list of lines
pub fn wrap_text(text: &str, packer: &LinePacker<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        packer.pack_into(paragraph, &mut lines);
    }
    lines
}

/// Split chapter text into pages of at most `max_lines` lines of at most
/// `max_chars` characters.
///
/// Never returns an empty list: a blank chapter yields a single
/// [`EMPTY_PAGE`]. Pages are trimmed at the end, and a group of lines that
/// trims to nothing is dropped.
pub fn paginate(
    text: &str,
    max_chars: usize,
    max_lines: usize,
    hyphenator: Option<&dyn Hyphenator>,
) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![EMPTY_PAGE.to_string()];
    }

    let packer = LinePacker::new(max_chars).with_hyphenator(hyphenator);
    let lines = wrap_text(text, &packer);

    let pages: Vec<String> = lines
        .chunks(max_lines.max(1))
        .map(|group| group.join("\n").trim_end().to_string())
        .filter(|page| !page.is_empty())
        .collect();

    if pages.is_empty() {
        vec![EMPTY_PAGE.to_string()]
    } else {
        pages
    }
}
