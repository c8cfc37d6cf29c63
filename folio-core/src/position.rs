//! Reading coordinates: validation, restore on load and remap after re-layout

use crate::layout::BookLayout;
use crate::types::{ReadingMode, ReadingPosition};
use serde::{Deserialize, Serialize};

/// Live (chapter, page, word) coordinate of a reading session.
///
/// The word index only means something in flow mode; paged mode keeps it at
/// whatever the last flow render left, clamped on use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub chapter_index: usize,
    pub page_index: usize,
    pub word_index: usize,
}

impl Cursor {
    pub fn new(chapter_index: usize, page_index: usize, word_index: usize) -> Self {
        Self {
            chapter_index,
            page_index,
            word_index,
        }
    }

    /// Saved shape for paged mode
    pub fn paged_position(&self) -> ReadingPosition {
        ReadingPosition::page(self.chapter_index, self.page_index)
    }

    /// Saved shape for flow mode
    pub fn flow_position(&self) -> ReadingPosition {
        ReadingPosition::word(self.chapter_index, self.page_index, self.word_index)
    }

    /// Pull every index back inside `layout`
    pub fn clamp_to(&mut self, layout: &BookLayout) {
        let chapters = layout.chapter_count();
        if chapters == 0 {
            *self = Self::default();
            return;
        }
        self.chapter_index = self.chapter_index.min(chapters - 1);
        let pages = layout.page_count(self.chapter_index).max(1);
        self.page_index = self.page_index.min(pages - 1);
        clamp_word(self, layout);
    }
}

impl From<&ReadingPosition> for Cursor {
    fn from(position: &ReadingPosition) -> Self {
        Self::new(
            position.chapter_index,
            position.page_index,
            position.word_index.unwrap_or(0),
        )
    }
}

/// Which saved position seeded a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreSource {
    Flow,
    Paged,
    Start,
}

/// Whether `position` addresses an existing chapter, page and word
pub fn is_valid(position: &ReadingPosition, layout: &BookLayout) -> bool {
    let Some(word_count) = layout.word_count(position.chapter_index, position.page_index) else {
        return false;
    };
    position.word_index.map_or(true, |word| word < word_count)
}

/// Pick the starting cursor from the saved positions of a book.
///
/// In flow mode a valid flow position wins; otherwise a valid paged position
/// is used; otherwise reading starts at the top. Invalid positions are
/// dropped whole rather than clamped.
pub fn restore(
    mode: ReadingMode,
    flow: Option<&ReadingPosition>,
    paged: Option<&ReadingPosition>,
    layout: &BookLayout,
) -> (Cursor, RestoreSource) {
    let flow = flow.filter(|p| accept(p, layout, "flow"));
    let paged = paged.filter(|p| accept(p, layout, "paged"));

    if mode == ReadingMode::Flow {
        if let Some(position) = flow {
            return (Cursor::from(position), RestoreSource::Flow);
        }
    }
    if let Some(position) = paged {
        return (
            Cursor::new(position.chapter_index, position.page_index, 0),
            RestoreSource::Paged,
        );
    }
    (Cursor::default(), RestoreSource::Start)
}

fn accept(position: &ReadingPosition, layout: &BookLayout, kind: &str) -> bool {
    if is_valid(position, layout) {
        return true;
    }
    tracing::warn!(
        "Discarding stale {} position: Ch {}, Pg {}",
        kind,
        position.chapter_index + 1,
        position.page_index + 1
    );
    false
}

/// Page index preserving progress through the chapter after re-pagination.
///
/// Integer form of `floor(page / old_count * new_count)`, clamped to the new
/// page range. A missing chapter is treated as one page.
pub fn remap_page(page_index: usize, old_page_count: usize, new_page_count: usize) -> usize {
    let old_page_count = old_page_count.max(1);
    let new_page_count = new_page_count.max(1);
    (page_index * new_page_count / old_page_count).min(new_page_count - 1)
}

/// Move `cursor` onto `new_layout` after the pages it pointed into were rebuilt
pub fn remap_after_relayout(cursor: Cursor, old_page_count: usize, new_layout: &BookLayout) -> Cursor {
    let mut remapped = cursor;
    remapped.page_index = remap_page(
        cursor.page_index,
        old_page_count,
        new_layout.page_count(cursor.chapter_index),
    );
    clamp_word(&mut remapped, new_layout);
    remapped
}

/// Clamp the word index into the current page; never rescaled
pub fn clamp_word(cursor: &mut Cursor, layout: &BookLayout) {
    let words = layout
        .word_count(cursor.chapter_index, cursor.page_index)
        .unwrap_or(1)
        .max(1);
    cursor.word_index = cursor.word_index.min(words - 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutParams;
    use crate::types::Book;

    fn layout() -> BookLayout {
        // 3 chapters: 2 pages, 1 placeholder page, 1 page
        let book = Book::new("Positions")
            .with_chapter("One", "alpha beta gamma delta epsilon zeta eta theta")
            .with_chapter("Two", "")
            .with_chapter("Three", "iota kappa");
        let params = LayoutParams {
            chars_per_line: 11,
            lines_per_page: 3,
            hyphenation: false,
        };
        BookLayout::build(&book, params, None)
    }

    #[test]
    fn test_validity() {
        let layout = layout();
        assert!(is_valid(&ReadingPosition::page(0, 1), &layout));
        assert!(is_valid(&ReadingPosition::word(2, 0, 1), &layout));
        assert!(!is_valid(&ReadingPosition::word(2, 0, 2), &layout));
        assert!(!is_valid(&ReadingPosition::page(0, 2), &layout));
        assert!(!is_valid(&ReadingPosition::page(3, 0), &layout));
    }

    #[test]
    fn test_placeholder_page_has_word_zero() {
        let layout = layout();
        assert!(is_valid(&ReadingPosition::word(1, 0, 0), &layout));
    }

    #[test]
    fn test_restore_prefers_flow_in_flow_mode() {
        let layout = layout();
        let flow = ReadingPosition::word(2, 0, 1);
        let paged = ReadingPosition::page(0, 1);

        let (cursor, source) = restore(ReadingMode::Flow, Some(&flow), Some(&paged), &layout);
        assert_eq!(source, RestoreSource::Flow);
        assert_eq!(cursor, Cursor::new(2, 0, 1));

        let (cursor, source) = restore(ReadingMode::Paged, Some(&flow), Some(&paged), &layout);
        assert_eq!(source, RestoreSource::Paged);
        assert_eq!(cursor, Cursor::new(0, 1, 0));
    }

    #[test]
    fn test_restore_falls_back_past_invalid_flow() {
        let layout = layout();
        let flow = ReadingPosition::word(2, 0, 40);
        let paged = ReadingPosition::page(0, 1);
        let (cursor, source) = restore(ReadingMode::Flow, Some(&flow), Some(&paged), &layout);
        assert_eq!(source, RestoreSource::Paged);
        assert_eq!(cursor, Cursor::new(0, 1, 0));
    }

    #[test]
    fn test_restore_never_clamps() {
        let layout = layout();
        let paged = ReadingPosition::page(0, 99);
        let (cursor, source) = restore(ReadingMode::Paged, None, Some(&paged), &layout);
        assert_eq!(source, RestoreSource::Start);
        assert_eq!(cursor, Cursor::default());
    }

    #[test]
    fn test_remap_page_progress() {
        assert_eq!(remap_page(5, 10, 12), 6);
        assert_eq!(remap_page(4, 10, 12), 4);
        assert_eq!(remap_page(0, 10, 3), 0);
        assert_eq!(remap_page(9, 10, 3), 2);
        assert_eq!(remap_page(3, 4, 1), 0);
        assert_eq!(remap_page(0, 0, 0), 0);
    }

    #[test]
    fn test_clamp_word_not_rescaled() {
        let layout = layout();
        let mut cursor = Cursor::new(2, 0, 7);
        clamp_word(&mut cursor, &layout);
        assert_eq!(cursor.word_index, 1);

        let mut cursor = Cursor::new(2, 0, 1);
        clamp_word(&mut cursor, &layout);
        assert_eq!(cursor.word_index, 1);
    }

    #[test]
    fn test_clamp_to_layout() {
        let layout = layout();
        let mut cursor = Cursor::new(9, 9, 9);
        cursor.clamp_to(&layout);
        assert_eq!(cursor, Cursor::new(2, 0, 1));
    }
}
