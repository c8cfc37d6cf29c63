//! Page layout: line packing, pagination and the per-book page cache

mod packer;
mod pager;

pub use packer::{try_hyphenate, HyphenSplit, LinePacker};
pub use pager::{paginate, wrap_text, EMPTY_PAGE};

use crate::config::LayoutParams;
use crate::flow::{build_flow_data, FlowPageData};
use crate::hyphenation::Hyphenator;
use crate::types::Book;
use rayon::prelude::*;

/// Pages and flow data of one chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterLayout {
    pub pages: Vec<String>,
    pub flow: Vec<FlowPageData>,
}

/// Derived pages for a whole book under one set of layout parameters.
///
/// Rebuilt wholesale whenever the parameters change; never patched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookLayout {
    params: LayoutParams,
    chapters: Vec<ChapterLayout>,
}

impl BookLayout {
    /// Paginate every chapter of `book`.
    ///
    /// The oracle is only consulted when `params.hyphenation` is set.
    pub fn build(book: &Book, params: LayoutParams, hyphenator: Option<&dyn Hyphenator>) -> Self {
        let hyphenator = if params.hyphenation { hyphenator } else { None };

        let chapters: Vec<ChapterLayout> = book
            .chapters
            .par_iter()
            .map(|chapter| {
                let pages = paginate(
                    &chapter.text,
                    params.chars_per_line,
                    params.lines_per_page,
                    hyphenator,
                );
                let flow = build_flow_data(&pages);
                ChapterLayout { pages, flow }
            })
            .collect();

        tracing::debug!(
            "Paginated '{}' at {}x{}: {} pages",
            book.title,
            params.chars_per_line,
            params.lines_per_page,
            chapters.iter().map(|c| c.pages.len()).sum::<usize>()
        );

        Self { params, chapters }
    }

    /// Parameters this layout was built with
    pub fn params(&self) -> LayoutParams {
        self.params
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn chapter(&self, chapter_index: usize) -> Option<&ChapterLayout> {
        self.chapters.get(chapter_index)
    }

    /// Page count of a chapter, zero when the chapter does not exist
    pub fn page_count(&self, chapter_index: usize) -> usize {
        self.chapter(chapter_index).map_or(0, |c| c.pages.len())
    }

    pub fn page(&self, chapter_index: usize, page_index: usize) -> Option<&str> {
        self.chapter(chapter_index)?
            .pages
            .get(page_index)
            .map(String::as_str)
    }

    pub fn flow_page(&self, chapter_index: usize, page_index: usize) -> Option<&FlowPageData> {
        self.chapter(chapter_index)?.flow.get(page_index)
    }

    /// Word count of a page, `None` when the page does not exist
    pub fn word_count(&self, chapter_index: usize, page_index: usize) -> Option<usize> {
        self.flow_page(chapter_index, page_index)
            .map(|p| p.word_count)
    }

    /// Pages across all chapters
    pub fn total_pages(&self) -> usize {
        self.chapters.iter().map(|c| c.pages.len()).sum()
    }

    /// 1-based page number across the whole book
    pub fn absolute_page(&self, chapter_index: usize, page_index: usize) -> usize {
        let before: usize = self
            .chapters
            .iter()
            .take(chapter_index)
            .map(|c| c.pages.len())
            .sum();
        before + page_index + 1
    }

    /// Words across all pages
    pub fn total_words(&self) -> usize {
        self.chapters
            .iter()
            .flat_map(|c| c.flow.iter())
            .map(|p| p.word_count)
            .sum()
    }

    /// 1-based word number across the whole book
    pub fn absolute_word(&self, chapter_index: usize, page_index: usize, word_index: usize) -> usize {
        let mut before = 0;
        for (ch, chapter) in self.chapters.iter().enumerate().take(chapter_index + 1) {
            for (pg, page) in chapter.flow.iter().enumerate() {
                if ch == chapter_index && pg >= page_index {
                    break;
                }
                before += page.word_count;
            }
        }
        before + word_index + 1
    }
}
