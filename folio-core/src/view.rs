//! Display frames: named text panels placed on a fixed surface
//!
//! The reader never draws anything itself. Each view is turned into a
//! [`Frame`] and handed to a [`FrameSink`], which owns the actual display.

use crate::config::StatusBarPosition;
use crate::flow::render;
use crate::layout::BookLayout;
use crate::position::Cursor;
use crate::types::Book;
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Surface width in pixels
pub const DISPLAY_WIDTH: u32 = 576;

/// Surface height in pixels
pub const DISPLAY_HEIGHT: u32 = 288;

/// Height of the bottom status strip
pub const BOTTOM_BAR_HEIGHT: u32 = 30;

/// Width of the right progress strip
pub const RIGHT_BAR_WIDTH: u32 = 26;

/// Chapter titles visible at once in the chapter list
pub const LIST_ROWS: usize = 4;

/// Height of one chapter list row
pub const LIST_ROW_HEIGHT: u32 = DISPLAY_HEIGHT / LIST_ROWS as u32;

/// Longest chapter list label
const LIST_LABEL_CHARS: usize = 42;

/// Cells in the vertical progress bar
const VERTICAL_BAR_CELLS: usize = 8;

/// Inner padding of text panels
const TEXT_PADDING: u32 = 6;

/// Line-drawing glyphs render about this much wider than text glyphs
const BAR_GLYPH_WIDTH: f64 = 1.6;

const APP_TITLE: &str = "Folio";
const WELCOME_HINT: &str = "Open a book to start reading";

/// Rectangle on the display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A text block placed on the surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub name: String,
    pub region: Region,
    pub padding: u32,
    pub content: String,
    /// Drawn with a border, used for the selected list row
    pub highlighted: bool,
}

impl Panel {
    fn new(name: impl Into<String>, region: Region, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region,
            padding: 0,
            content: content.into(),
            highlighted: false,
        }
    }

    fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }
}

/// Which view produced a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameKind {
    Welcome,
    ChapterList,
    Page,
    Flow,
}

/// Everything shown on the surface at one moment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub kind: FrameKind,
    pub panels: Vec<Panel>,
    /// Reading progress through the book, for page and flow frames
    pub progress: Option<f64>,
}

impl Frame {
    pub fn panel(&self, name: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.name == name)
    }

    /// Content of the main text panel
    pub fn text(&self) -> Option<&str> {
        self.panel("text").map(|p| p.content.as_str())
    }

    /// Content of the status strip, if one is shown
    pub fn status(&self) -> Option<&str> {
        self.panel("status").map(|p| p.content.as_str())
    }
}

/// Fraction of the book read, 1.0 for books of at most one unit
pub fn book_progress(absolute: usize, total: usize) -> f64 {
    if total > 1 {
        absolute as f64 / total as f64
    } else {
        1.0
    }
}

/// Cells available to the horizontal bar after `info`
pub fn bar_length(info: &str, status_bar: StatusBarPosition) -> usize {
    let max_chars: usize = match status_bar {
        StatusBarPosition::Right => 58,
        _ => 59,
    };
    let remaining = max_chars.saturating_sub(info.chars().count());
    let len = (remaining as f64 / BAR_GLYPH_WIDTH).floor() as i64 - 2;
    len.clamp(5, 20) as usize
}

/// Horizontal bar of `len` cells filled in proportion to `progress`
pub fn progress_bar(progress: f64, len: usize) -> String {
    let filled = ((len as f64 * progress).round().max(0.0) as usize).min(len);
    format!("{}{}", "━".repeat(filled), "─".repeat(len - filled))
}

/// Vertical bar, one cell per line
pub fn vertical_bar(progress: f64) -> String {
    let filled = ((VERTICAL_BAR_CELLS as f64 * progress).round().max(0.0) as usize)
        .min(VERTICAL_BAR_CELLS);
    let cells: Vec<&str> = std::iter::repeat("█")
        .take(filled)
        .chain(std::iter::repeat("│").take(VERTICAL_BAR_CELLS - filled))
        .collect();
    cells.join("\n")
}

/// `info` followed by a bracketed progress bar sized to fit the strip
pub fn status_label(info: &str, progress: f64, status_bar: StatusBarPosition) -> String {
    let bar = progress_bar(progress, bar_length(info, status_bar));
    format!("{}[{}]", info, bar)
}

/// Status text of the paged view
pub fn paged_info(cursor: &Cursor, layout: &BookLayout) -> String {
    format!(
        "Ch {}/{} Pg {}/{} ",
        cursor.chapter_index + 1,
        layout.chapter_count(),
        cursor.page_index + 1,
        layout.page_count(cursor.chapter_index)
    )
}

/// Status text of the flow view
pub fn flow_info(cursor: &Cursor, layout: &BookLayout, running: bool, wpm: u32) -> String {
    let words = layout
        .word_count(cursor.chapter_index, cursor.page_index)
        .unwrap_or(1);
    format!(
        "Flow {} {}wpm Ch {}/{} Pg {}/{} W {}/{} ",
        if running { "RUN" } else { "PAUSE" },
        wpm,
        cursor.chapter_index + 1,
        layout.chapter_count(),
        cursor.page_index + 1,
        layout.page_count(cursor.chapter_index),
        cursor.word_index + 1,
        words
    )
}

/// Chapter list label: whitespace collapsed, cut with an ellipsis
pub fn truncate_for_list(label: &str, max_chars: usize) -> String {
    let clean = label.split_whitespace().collect::<Vec<_>>().join(" ");
    if clean.chars().count() <= max_chars {
        return clean;
    }
    let kept: String = clean.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}

fn centered(text: &str, status_bar: StatusBarPosition) -> String {
    let max_chars: usize = match status_bar {
        StatusBarPosition::Right => 58,
        _ => 59,
    };
    let pad = max_chars.saturating_sub(text.chars().count()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Text panel plus the status strip for `status_bar`
fn reading_frame(
    kind: FrameKind,
    content: String,
    info: &str,
    progress: f64,
    status_bar: StatusBarPosition,
) -> Frame {
    let (bar_height, side_width) = match status_bar {
        StatusBarPosition::Bottom => (BOTTOM_BAR_HEIGHT, 0),
        StatusBarPosition::Right => (0, RIGHT_BAR_WIDTH),
        StatusBarPosition::Hidden => (0, 0),
    };
    let text_height = DISPLAY_HEIGHT - bar_height;
    let text_width = DISPLAY_WIDTH - side_width;

    let mut panels = vec![
        Panel::new("text", Region::new(0, 0, text_width, text_height), content)
            .with_padding(TEXT_PADDING),
    ];
    match status_bar {
        StatusBarPosition::Bottom => panels.push(Panel::new(
            "status",
            Region::new(0, text_height, DISPLAY_WIDTH, bar_height),
            status_label(info, progress, status_bar),
        )),
        StatusBarPosition::Right => panels.push(Panel::new(
            "sidebar",
            Region::new(text_width, 0, side_width, DISPLAY_HEIGHT),
            vertical_bar(progress),
        )),
        StatusBarPosition::Hidden => {}
    }

    Frame {
        kind,
        panels,
        progress: Some(progress),
    }
}

/// Full page with page-based progress
pub fn page_frame(layout: &BookLayout, cursor: &Cursor, status_bar: StatusBarPosition) -> Frame {
    let content = layout
        .page(cursor.chapter_index, cursor.page_index)
        .unwrap_or_default()
        .to_string();
    let progress = book_progress(
        layout.absolute_page(cursor.chapter_index, cursor.page_index),
        layout.total_pages(),
    );
    let info = paged_info(cursor, layout);
    reading_frame(FrameKind::Page, content, &info, progress, status_bar)
}

/// Partially revealed page with word-based progress
pub fn flow_frame(
    layout: &BookLayout,
    cursor: &Cursor,
    running: bool,
    wpm: u32,
    status_bar: StatusBarPosition,
) -> Frame {
    let content = layout
        .flow_page(cursor.chapter_index, cursor.page_index)
        .map(|page| render(page, cursor.word_index))
        .unwrap_or_default();
    let progress = book_progress(
        layout.absolute_word(cursor.chapter_index, cursor.page_index, cursor.word_index),
        layout.total_words(),
    );
    let info = flow_info(cursor, layout, running, wpm);
    reading_frame(FrameKind::Flow, content, &info, progress, status_bar)
}

/// Window of chapter titles containing `selected`
pub fn chapter_list_frame(book: &Book, selected: usize) -> Frame {
    let window_start = selected / LIST_ROWS * LIST_ROWS;
    let panels = (0..LIST_ROWS)
        .map(|row| {
            let index = window_start + row;
            let label = book
                .chapters
                .get(index)
                .map(|chapter| truncate_for_list(&format!("{}. {}", index + 1, chapter.title), LIST_LABEL_CHARS))
                .unwrap_or_default();
            let region = Region::new(0, row as u32 * LIST_ROW_HEIGHT, DISPLAY_WIDTH, LIST_ROW_HEIGHT);
            let mut panel = Panel::new(format!("row-{}", row), region, label).with_padding(2);
            panel.highlighted = index == selected;
            panel
        })
        .collect();

    Frame {
        kind: FrameKind::ChapterList,
        panels,
        progress: None,
    }
}

/// Screen shown while no book is open
pub fn welcome_frame(status_bar: StatusBarPosition) -> Frame {
    Frame {
        kind: FrameKind::Welcome,
        panels: vec![
            Panel::new(
                "title",
                Region::new(0, 80, DISPLAY_WIDTH, 40),
                centered(APP_TITLE, status_bar),
            ),
            Panel::new(
                "hint",
                Region::new(0, 170, DISPLAY_WIDTH, 40),
                centered(WELCOME_HINT, status_bar),
            ),
        ],
        progress: None,
    }
}

/// Receives every frame the reader produces
pub trait FrameSink: Send {
    fn present(&mut self, frame: &Frame);
}

/// Discards frames
#[derive(Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &Frame) {}
}

/// Keeps every presented frame; clones share the same history
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    frames: Arc<Mutex<Vec<Frame>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<Frame> {
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .last()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FrameSink for RecordingSink {
    fn present(&mut self, frame: &Frame) {
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(frame.clone());
    }
}
