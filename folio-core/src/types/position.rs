//! Reading positions and reading modes

use serde::{Deserialize, Serialize};

/// How the reader consumes a page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReadingMode {
    /// The whole page is shown at once
    #[default]
    Paged,

    /// Words are revealed one at a time at a timed pace
    Flow,
}

impl ReadingMode {
    /// Short stable name, used in storage keys
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingMode::Paged => "paged",
            ReadingMode::Flow => "flow",
        }
    }
}

/// A saved coordinate inside a paginated book
///
/// Serialized as `{ "chapterIndex": .., "pageIndex": .., "wordIndex": .. }`;
/// `wordIndex` is only present for flow positions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPosition {
    pub chapter_index: usize,
    pub page_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_index: Option<usize>,
}

impl ReadingPosition {
    /// Position of a whole page
    pub fn page(chapter_index: usize, page_index: usize) -> Self {
        Self {
            chapter_index,
            page_index,
            word_index: None,
        }
    }

    /// Position of a word within a page
    pub fn word(chapter_index: usize, page_index: usize, word_index: usize) -> Self {
        Self {
            chapter_index,
            page_index,
            word_index: Some(word_index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_position_shape() {
        let json = serde_json::to_string(&ReadingPosition::page(2, 7)).unwrap();
        assert_eq!(json, r#"{"chapterIndex":2,"pageIndex":7}"#);
    }

    #[test]
    fn test_flow_position_shape() {
        let json = serde_json::to_string(&ReadingPosition::word(0, 1, 12)).unwrap();
        assert_eq!(json, r#"{"chapterIndex":0,"pageIndex":1,"wordIndex":12}"#);
    }

    #[test]
    fn test_rejects_non_integer_shapes() {
        assert!(serde_json::from_str::<ReadingPosition>(r#"{"chapterIndex":-1,"pageIndex":0}"#).is_err());
        assert!(serde_json::from_str::<ReadingPosition>(r#"{"chapterIndex":1.5,"pageIndex":0}"#).is_err());
        assert!(serde_json::from_str::<ReadingPosition>(r#"{"pageIndex":0}"#).is_err());
        assert!(serde_json::from_str::<ReadingPosition>("not json").is_err());
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(ReadingMode::Paged.as_str(), "paged");
        assert_eq!(
            serde_json::to_string(&ReadingMode::Flow).unwrap(),
            r#""flow""#
        );
    }
}
