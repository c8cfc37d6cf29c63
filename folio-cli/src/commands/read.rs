//! Read command implementation

use super::load_book;
use anyhow::{bail, Result};
use folio_core::config::ReaderConfig;
use folio_core::flow::ManualScheduler;
use folio_core::session::{Navigation, ReaderSession, View};
use folio_core::storage::{LocalStore, PositionStore};
use folio_core::types::ReadingMode;
use folio_core::view::RecordingSink;
use std::path::Path;
use std::sync::Arc;

/// Open a book at its saved page, turn `next` pages and print the result.
///
/// The page reached is saved under `state_dir` for the next invocation.
/// With `restart` the saved positions of the book are forgotten first.
pub async fn read(
    input: &Path,
    mut config: ReaderConfig,
    state_dir: &Path,
    chapter: Option<usize>,
    next: usize,
    restart: bool,
) -> Result<()> {
    let book = load_book(input)?;
    config.reading_mode = ReadingMode::Paged;
    config.validate()?;

    let positions = PositionStore::new(Arc::new(LocalStore::new(state_dir)));
    if restart {
        tracing::info!("Forgetting saved positions of '{}'", book.title);
        positions.clear(&book.title).await;
    }

    let sink = RecordingSink::new();
    let mut session = ReaderSession::new(config, positions, ManualScheduler::new(), sink.clone());

    let chapter_count = book.chapters.len();
    let source = session.load_book(book, chapter.is_none()).await;
    tracing::debug!("Position source: {:?}", source);

    match chapter {
        Some(n) => {
            if session.jump_to_chapter(n - 1).await == Navigation::Ignored {
                bail!(
                    "Chapter {} out of range (book has {} chapters)",
                    n,
                    chapter_count
                );
            }
        }
        None if session.view() != View::Paged => {
            session.jump_to_chapter(0).await;
        }
        None => {}
    }

    for _ in 0..next {
        if session.next_page().await == Navigation::Boundary {
            break;
        }
    }

    let Some(frame) = sink.last() else {
        bail!("Nothing to show");
    };
    println!("{}", frame.text().unwrap_or_default());
    if let Some(status) = frame.status() {
        println!();
        println!("{}", status);
    }

    Ok(())
}
