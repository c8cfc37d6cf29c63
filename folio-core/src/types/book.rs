//! The Book type - an ordered list of plain-text chapters

use super::Chapter;
use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Separator between chapters in plain text input
const CHAPTER_BREAK: char = '\u{000C}';

/// Number of leading chapters sampled for language detection
const LANGUAGE_SAMPLE_CHAPTERS: usize = 3;

/// A complete book, immutable for the lifetime of a reading session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    /// Book title, also the key for saved reading positions
    pub title: String,

    /// Ordered list of chapters
    pub chapters: Vec<Chapter>,
}

impl Book {
    /// Create an empty book with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            chapters: Vec::new(),
        }
    }

    /// Add a chapter to the book
    pub fn add_chapter(&mut self, chapter: Chapter) {
        self.chapters.push(chapter);
    }

    /// Builder-style chapter append
    pub fn with_chapter(mut self, title: impl Into<String>, text: impl Into<String>) -> Self {
        self.chapters.push(Chapter::new(title, text));
        self
    }

    /// Get the book title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Text used to guess the book language
    pub fn language_sample(&self) -> String {
        self.chapters
            .iter()
            .take(LANGUAGE_SAMPLE_CHAPTERS)
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Decode a book from JSON of the form `{ "title": .., "chapters": [{ "title": .., "text": .. }] }`
    pub fn from_json(reader: &mut dyn Read) -> Result<Self, ParseError> {
        let book: Book = serde_json::from_reader(reader)?;
        if book.chapters.is_empty() {
            return Err(ParseError::NoChapters);
        }
        Ok(book)
    }

    /// Build a book from plain text, one chapter per form-feed separated section.
    ///
    /// A chapter is titled by its first non-blank line.
    pub fn from_plain_text(title: impl Into<String>, text: &str) -> Result<Self, ParseError> {
        let mut book = Book::new(title);

        for section in text.split(CHAPTER_BREAK) {
            if section.trim().is_empty() {
                continue;
            }
            let heading = section
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or_default();
            let chapter_title = if heading.chars().count() > 60 {
                format!("Chapter {}", book.chapters.len() + 1)
            } else {
                heading.to_string()
            };
            book.add_chapter(Chapter::new(chapter_title, section.trim_matches('\n')));
        }

        if book.chapters.is_empty() {
            return Err(ParseError::NoChapters);
        }
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_creation() {
        let book = Book::new("Test Book").with_chapter("One", "Hello, world!");
        assert_eq!(book.title(), "Test Book");
        assert_eq!(book.chapters.len(), 1);
        assert_eq!(book.chapters[0].title, "One");
    }

    #[test]
    fn test_language_sample_uses_first_three_chapters() {
        let book = Book::new("Sample")
            .with_chapter("1", "a")
            .with_chapter("2", "b")
            .with_chapter("3", "c")
            .with_chapter("4", "d");
        assert_eq!(book.language_sample(), "a b c");
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"title":"T","chapters":[{"title":"C1","text":"Some text"}]}"#;
        let book = Book::from_json(&mut json.as_bytes()).unwrap();
        assert_eq!(book.title, "T");
        assert_eq!(book.chapters[0].text, "Some text");
    }

    #[test]
    fn test_from_json_without_chapters() {
        let json = r#"{"title":"T","chapters":[]}"#;
        assert!(matches!(
            Book::from_json(&mut json.as_bytes()),
            Err(ParseError::NoChapters)
        ));
    }

    #[test]
    fn test_from_plain_text_splits_on_form_feed() {
        let text = "CHAPTER I\nIt was a dark night.\n\u{000C}\n\nCHAPTER II\nMorning came.";
        let book = Book::from_plain_text("Novel", text).unwrap();
        assert_eq!(book.chapters.len(), 2);
        assert_eq!(book.chapters[0].title, "CHAPTER I");
        assert_eq!(book.chapters[1].title, "CHAPTER II");
        assert!(book.chapters[1].text.starts_with("CHAPTER II"));
    }

    #[test]
    fn test_from_plain_text_blank() {
        assert!(Book::from_plain_text("Blank", "  \u{000C} ").is_err());
    }

    #[test]
    fn test_book_serialization() {
        let book = Book::new("Serialization Test").with_chapter("A", "b");
        let json = serde_json::to_string(&book).unwrap();
        let deserialized: Book = serde_json::from_str(&json).unwrap();
        assert_eq!(book, deserialized);
    }
}
