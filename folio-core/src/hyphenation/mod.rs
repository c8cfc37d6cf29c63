//! Hyphenation oracles
//!
//! An oracle proposes syllable boundaries inside a word. One is selected per
//! book from the detected language and handed explicitly to the line packer;
//! a book in an unsupported language simply has none.

mod detect;
mod dictionary;

pub use detect::detect_language;
pub use dictionary::PatternHyphenator;

use serde::{Deserialize, Serialize};

/// Trait for language-specific syllable splitting
pub trait Hyphenator: Send + Sync {
    /// Candidate break offsets inside `word`, in characters, strictly ascending
    /// and strictly between 0 and the word's character count.
    fn hyphenate(&self, word: &str) -> Vec<usize>;
}

/// Languages with embedded hyphenation patterns
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Language {
    EnglishUs,
    German,
    Russian,
    Ukrainian,
}

impl Language {
    /// Primary language subtag
    pub fn tag(&self) -> &'static str {
        match self {
            Language::EnglishUs => "en",
            Language::German => "de",
            Language::Russian => "ru",
            Language::Ukrainian => "uk",
        }
    }

    /// Parse a language tag such as `en`, `en-US` or `de_DE`
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();

        match primary.as_str() {
            "en" => Some(Language::EnglishUs),
            "de" => Some(Language::German),
            "ru" => Some(Language::Russian),
            "uk" => Some(Language::Ukrainian),
            _ => None,
        }
    }
}

/// Get the oracle for a supported language, `None` if its patterns fail to load
pub fn hyphenator_for(language: Language) -> Option<Box<dyn Hyphenator>> {
    PatternHyphenator::new(language).map(|oracle| Box::new(oracle) as Box<dyn Hyphenator>)
}

/// Get the oracle for a language tag, if one exists
pub fn hyphenator_for_tag(tag: &str) -> Option<Box<dyn Hyphenator>> {
    Language::from_tag(tag).and_then(hyphenator_for)
}

/// Split a word into syllables at the oracle's break offsets
pub fn syllables<'a>(hyphenator: &dyn Hyphenator, word: &'a str) -> Vec<&'a str> {
    let breaks = hyphenator.hyphenate(word);
    let mut parts = Vec::with_capacity(breaks.len() + 1);
    let mut start_byte = 0;
    let mut consumed = 0;

    for (offset, (byte, _)) in word.char_indices().enumerate() {
        if consumed < breaks.len() && breaks[consumed] == offset {
            parts.push(&word[start_byte..byte]);
            start_byte = byte;
            consumed += 1;
        }
    }
    parts.push(&word[start_byte..]);
    parts
}
