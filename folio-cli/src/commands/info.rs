//! Info command implementation

use super::{layout_book, load_book};
use anyhow::Result;
use folio_core::config::ReaderConfig;
use serde::Serialize;
use std::path::Path;

/// Per-chapter summary
#[derive(Serialize)]
struct ChapterInfo {
    title: String,
    pages: usize,
}

/// Book info output
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookInfo {
    title: String,
    language: String,
    chars_per_line: usize,
    lines_per_page: usize,
    total_pages: usize,
    total_words: usize,
    chapters: Vec<ChapterInfo>,
}

/// Display information about a book laid out with the current settings
pub fn info(input: &Path, config: &ReaderConfig, json: bool) -> Result<()> {
    let book = load_book(input)?;
    let (language, layout) = layout_book(&book, config)?;

    let info = BookInfo {
        title: book.title.clone(),
        language: language.tag().to_string(),
        chars_per_line: config.chars_per_line,
        lines_per_page: config.lines_per_page,
        total_pages: layout.total_pages(),
        total_words: layout.total_words(),
        chapters: book
            .chapters
            .iter()
            .enumerate()
            .map(|(i, chapter)| ChapterInfo {
                title: chapter.title.clone(),
                pages: layout.page_count(i),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Title:       {}", info.title);
        println!("Language:    {}", info.language);
        println!("Layout:      {}x{}", info.chars_per_line, info.lines_per_page);
        println!("Pages:       {}", info.total_pages);
        println!("Words:       {}", info.total_words);
        println!("Chapters:    {}", info.chapters.len());
        for (i, chapter) in info.chapters.iter().enumerate() {
            println!("  {:>3}. {} ({} pages)", i + 1, chapter.title, chapter.pages);
        }
    }

    Ok(())
}
