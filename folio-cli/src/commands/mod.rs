//! CLI command implementations

mod flow;
mod info;
mod paginate;
mod read;

pub use flow::flow;
pub use info::info;
pub use paginate::paginate;
pub use read::read;

use anyhow::{bail, Context, Result};
use folio_core::config::ReaderConfig;
use folio_core::hyphenation::{detect_language, hyphenator_for_tag, Language};
use folio_core::layout::BookLayout;
use folio_core::types::Book;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Load reader settings, falling back to the defaults without a file
pub fn load_config(path: Option<&Path>) -> Result<ReaderConfig> {
    match path {
        Some(path) => ReaderConfig::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(ReaderConfig::default()),
    }
}

/// Read a book from a `.json` or `.txt` file
pub fn load_book(input: &Path) -> Result<Book> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .context("Could not determine input file extension")?;

    match ext.to_ascii_lowercase().as_str() {
        "json" => {
            let file = File::open(input)
                .with_context(|| format!("Failed to open input file: {}", input.display()))?;
            let mut reader = BufReader::new(file);
            Book::from_json(&mut reader)
                .with_context(|| format!("Failed to parse {}", input.display()))
        }
        "txt" => {
            let text = fs::read_to_string(input)
                .with_context(|| format!("Failed to open input file: {}", input.display()))?;
            let title = input
                .file_stem()
                .and_then(|s| s.to_str())
                .context("Could not determine book title from file name")?;
            Book::from_plain_text(title, &text)
                .with_context(|| format!("Failed to parse {}", input.display()))
        }
        other => bail!("Unsupported input format: .{}", other),
    }
}

/// Lay out `book` with the hyphenation profile of its detected language
pub fn layout_book(book: &Book, config: &ReaderConfig) -> Result<(Language, BookLayout)> {
    config.validate()?;
    let language = detect_language(&book.language_sample());
    let hyphenator = hyphenator_for_tag(language.tag());
    let layout = BookLayout::build(book, config.layout_params(), hyphenator.as_deref());
    Ok((language, layout))
}
