//! Core types for books and reading positions

mod book;
mod chapter;
mod position;

pub use book::Book;
pub use chapter::Chapter;
pub use position::{ReadingMode, ReadingPosition};
