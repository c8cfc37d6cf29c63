//! Chapter type representing a single chapter of plain text

use serde::{Deserialize, Serialize};

/// A single chapter of a book
///
/// `text` is plain prose with `\n` marking paragraph boundaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    /// Chapter title
    pub title: String,

    /// Plain text content
    pub text: String,
}

impl Chapter {
    /// Create a new chapter
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}
