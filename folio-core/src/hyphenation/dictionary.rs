//! Oracle over embedded TeX hyphenation patterns

use super::{Hyphenator, Language};
use ::hyphenation::{Hyphenator as _, Load, Standard};
use std::sync::OnceLock;

static ENGLISH_US: OnceLock<Option<Standard>> = OnceLock::new();
static GERMAN: OnceLock<Option<Standard>> = OnceLock::new();
static RUSSIAN: OnceLock<Option<Standard>> = OnceLock::new();
static UKRAINIAN: OnceLock<Option<Standard>> = OnceLock::new();

/// Pattern dictionary for `language`, loaded once per process
fn dictionary(language: Language) -> Option<&'static Standard> {
    let (cell, patterns) = match language {
        Language::EnglishUs => (&ENGLISH_US, ::hyphenation::Language::EnglishUS),
        Language::German => (&GERMAN, ::hyphenation::Language::German1996),
        Language::Russian => (&RUSSIAN, ::hyphenation::Language::Russian),
        Language::Ukrainian => (&UKRAINIAN, ::hyphenation::Language::Ukrainian),
    };

    cell.get_or_init(|| match Standard::from_embedded(patterns) {
        Ok(dictionary) => {
            tracing::debug!("Loaded {} hyphenation patterns", language.tag());
            Some(dictionary)
        }
        Err(e) => {
            tracing::warn!("Could not load {} hyphenation patterns: {}", language.tag(), e);
            None
        }
    })
    .as_ref()
}

/// Oracle backed by the pattern dictionary of one language
pub struct PatternHyphenator {
    dictionary: &'static Standard,
}

impl PatternHyphenator {
    /// Oracle for `language`, `None` when its patterns cannot be loaded
    pub fn new(language: Language) -> Option<Self> {
        dictionary(language).map(|dictionary| Self { dictionary })
    }
}

impl Hyphenator for PatternHyphenator {
    fn hyphenate(&self, word: &str) -> Vec<usize> {
        // Patterns are lowercase; offsets only carry over if no char expands
        let lower = word.to_lowercase();
        if lower.chars().count() != word.chars().count() {
            return Vec::new();
        }

        let breaks = self.dictionary.hyphenate(&lower).breaks;
        lower
            .char_indices()
            .enumerate()
            .filter(|(offset, (byte, _))| *offset > 0 && breaks.contains(byte))
            .map(|(offset, _)| offset)
            .collect()
    }
}
