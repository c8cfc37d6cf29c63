//! Paginate command implementation

use super::{layout_book, load_book};
use anyhow::{bail, Result};
use folio_core::config::ReaderConfig;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct PageOutput<'a> {
    chapter: usize,
    page: usize,
    text: &'a str,
}

/// Print every page of a book, or of one chapter
pub fn paginate(
    input: &Path,
    config: &ReaderConfig,
    chapter: Option<usize>,
    json: bool,
) -> Result<()> {
    let book = load_book(input)?;
    let (language, layout) = layout_book(&book, config)?;
    tracing::debug!(
        "Paginating '{}' at {}x{} ({})",
        book.title,
        config.chars_per_line,
        config.lines_per_page,
        language.tag()
    );

    let chapters = match chapter {
        Some(n) if n > layout.chapter_count() => {
            bail!(
                "Chapter {} out of range (book has {} chapters)",
                n,
                layout.chapter_count()
            )
        }
        Some(n) => (n - 1)..n,
        None => 0..layout.chapter_count(),
    };

    let pages: Vec<PageOutput> = chapters
        .flat_map(|c| {
            let layout = &layout;
            (0..layout.page_count(c)).filter_map(move |p| {
                layout.page(c, p).map(|text| PageOutput {
                    chapter: c + 1,
                    page: p + 1,
                    text,
                })
            })
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&pages)?);
    } else {
        for page in &pages {
            println!("--- Chapter {}, page {} ---", page.chapter, page.page);
            println!("{}", page.text);
        }
    }

    Ok(())
}
