//! Folio Core Library
//!
//! Text layout and progressive reveal for a fixed-size reading surface.
//! Chapters are wrapped into pages of a fixed character and line budget, with
//! language-aware hyphenation, and each page can be revealed word by word at a
//! timed pace ("flow" reading). Reading positions are kept per book and mode
//! and survive re-pagination when the settings change.

pub mod config;
pub mod error;
pub mod flow;
pub mod hyphenation;
pub mod layout;
pub mod position;
pub mod session;
pub mod storage;
pub mod types;
pub mod view;

pub use config::{LayoutParams, ReaderConfig, StatusBarPosition};
pub use error::{ConfigError, FolioError, ParseError, Result, StorageError};
pub use flow::{FlowPageData, ManualScheduler, Scheduler, TimerHandle, TokioScheduler};
pub use hyphenation::{Hyphenator, Language};
pub use layout::{paginate, BookLayout, LinePacker};
pub use position::Cursor;
pub use session::{Navigation, ReaderSession, ReadingState, TickOutcome, View};
pub use storage::{KeyValueStore, LocalStore, MemoryStore, PositionStore};
pub use types::{Book, Chapter, ReadingMode, ReadingPosition};
pub use view::{Frame, FrameKind, FrameSink, NullSink, RecordingSink};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_creation() {
        let book = Book::new("Test Book").with_chapter("One", "Some text");
        assert_eq!(book.title(), "Test Book");
        assert_eq!(book.chapters.len(), 1);
    }

    #[test]
    fn test_paginate_blank_chapter() {
        assert_eq!(paginate("", 60, 9, None), vec![layout::EMPTY_PAGE]);
    }
}
