//! Language guessing from a text sample

use super::Language;

/// Characters inspected from the start of the sample
const SAMPLE_CHARS: usize = 2000;

/// Letters only used in Ukrainian among Cyrillic alphabets
const UKRAINIAN_LETTERS: &[char] = &['Є', 'І', 'Ї', 'Ґ', 'є', 'і', 'ї', 'ґ'];

/// Umlauts and sharp s
const GERMAN_LETTERS: &[char] = &['ä', 'ö', 'ü', 'ß', 'Ä', 'Ö', 'Ü'];

/// Guess the language of a text sample
///
/// Cyrillic text (more than a fifth of the sample) is Ukrainian when it
/// contains more than three Ukrainian-only letters and Russian otherwise.
/// Latin text with more than three German-specific letters is German.
/// Everything else is English.
pub fn detect_language(sample: &str) -> Language {
    let sample: Vec<char> = sample.chars().take(SAMPLE_CHARS).collect();

    let cyrillic = sample
        .iter()
        .filter(|c| ('\u{0400}'..='\u{04FF}').contains(*c))
        .count();
    if cyrillic * 5 > sample.len() {
        let ukrainian = sample
            .iter()
            .filter(|c| UKRAINIAN_LETTERS.contains(c))
            .count();
        return if ukrainian > 3 {
            Language::Ukrainian
        } else {
            Language::Russian
        };
    }

    let german = sample.iter().filter(|c| GERMAN_LETTERS.contains(c)).count();
    if german > 3 {
        return Language::German;
    }

    Language::EnglishUs
}
