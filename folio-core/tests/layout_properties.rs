//! Property tests for line packing, pagination and flow reveal

use folio_core::flow::{render, tokenize};
use folio_core::hyphenation::{hyphenator_for, Hyphenator, Language};
use folio_core::layout::{paginate, try_hyphenate, wrap_text, LinePacker};
use proptest::prelude::*;

/// Paragraphs of words with punctuation, joined by newlines
fn chapter_text() -> impl Strategy<Value = String> {
    let word = "[a-zA-ZäöüßА-Яа-я]{1,18}[,.;!?]?";
    let paragraph = prop::collection::vec(word, 0..12).prop_map(|words| words.join(" "));
    prop::collection::vec(paragraph, 1..8).prop_map(|paragraphs| paragraphs.join("\n"))
}

fn oracle(choice: u8) -> Option<Box<dyn Hyphenator>> {
    match choice % 5 {
        0 => None,
        1 => hyphenator_for(Language::EnglishUs),
        2 => hyphenator_for(Language::German),
        3 => hyphenator_for(Language::Russian),
        _ => hyphenator_for(Language::Ukrainian),
    }
}

/// Expected pages: each chunk of wrapped lines minus its trailing blank lines
fn expected_pages(wrapped: &[String], max_lines: usize) -> Vec<Vec<&str>> {
    wrapped
        .chunks(max_lines)
        .map(|chunk| {
            let mut lines: Vec<&str> = chunk.iter().map(String::as_str).collect();
            while lines.last().is_some_and(|line| line.trim_end().is_empty()) {
                lines.pop();
            }
            lines
        })
        .filter(|lines| !lines.is_empty())
        .collect()
}

proptest! {
    #[test]
    fn lines_never_exceed_budget(text in chapter_text(), max_chars in 1usize..70, choice in 0u8..5) {
        let oracle = oracle(choice);
        let packer = LinePacker::new(max_chars).with_hyphenator(oracle.as_deref());
        for line in wrap_text(&text, &packer) {
            prop_assert!(line.chars().count() <= max_chars, "{:?} exceeds {}", line, max_chars);
            prop_assert_eq!(line.trim_end(), line.as_str());
        }
    }

    #[test]
    fn tokens_reconstruct_page(page in "\\PC{0,120}") {
        let data = tokenize(&page);
        prop_assert_eq!(data.tokens.concat(), page);
        prop_assert!(data.word_count >= 1);
    }

    #[test]
    fn reveal_is_monotonic(text in chapter_text(), max_chars in 8usize..40) {
        for page in paginate(&text, max_chars, 6, None) {
            let data = tokenize(&page);
            for i in 0..data.word_count.saturating_sub(1) {
                let current = render(&data, i);
                let next = render(&data, i + 1);
                prop_assert!(next.starts_with(&current), "{:?} then {:?}", current, next);
                prop_assert!(next.len() > current.len());
            }
            prop_assert_eq!(render(&data, data.word_count - 1), page);
        }
    }

    #[test]
    fn pagination_keeps_every_line(
        text in chapter_text(),
        max_chars in 1usize..50,
        max_lines in 1usize..12,
        choice in 0u8..5,
    ) {
        prop_assume!(!text.trim().is_empty());
        let oracle = oracle(choice);
        let packer = LinePacker::new(max_chars).with_hyphenator(oracle.as_deref());
        let wrapped = wrap_text(&text, &packer);
        let pages = paginate(&text, max_chars, max_lines, oracle.as_deref());

        for page in &pages {
            prop_assert!(page.split('\n').count() <= max_lines);
        }
        let actual: Vec<Vec<&str>> = pages.iter().map(|page| page.split('\n').collect()).collect();
        prop_assert_eq!(actual, expected_pages(&wrapped, max_lines));
    }

    #[test]
    fn hyphenation_never_widens(word in "[a-zA-Zäöü]{1,30}[,.!]?", available in 0usize..40, choice in 1u8..5) {
        let oracle = oracle(choice);
        if let Some(split) = try_hyphenate(oracle.as_deref(), &word, available) {
            prop_assert!(split.head.chars().count() + 1 <= available);
            prop_assert!(split.head.chars().count() >= 2);
            prop_assert_eq!(format!("{}{}", split.head, split.tail), word);
        }
    }

    #[test]
    fn empty_and_blank_pages_have_one_word(page in "[ \\t\\n]{0,20}") {
        prop_assert_eq!(tokenize(&page).word_count, 1);
    }
}
