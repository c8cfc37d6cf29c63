//! Timed word-by-word reveal of a page

use super::scheduler::{Scheduler, TimerHandle};
use super::tokenizer::FlowPageData;
use crate::config::{FLOW_MAX_WPM, FLOW_MIN_WPM};
use crate::layout::BookLayout;
use crate::position::Cursor;
use std::time::Duration;

/// Shortest delay between two reveals
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(80);

/// Shown while nothing visible has been revealed yet
pub const RENDER_PLACEHOLDER: &str = "…";

/// Delay between reveals at `wpm`, after clamping the rate into the
/// supported band
pub fn tick_interval(wpm: u32) -> Duration {
    let wpm = wpm.clamp(FLOW_MIN_WPM, FLOW_MAX_WPM);
    Duration::from_millis(60_000 / u64::from(wpm)).max(MIN_TICK_INTERVAL)
}

/// Text of a page with words up to `visible` revealed.
///
/// A gap is shown once the word before it is visible, so the reader sees the
/// space that follows the newest word but nothing beyond it.
pub fn render(page: &FlowPageData, visible: usize) -> String {
    let mut seen_words = 0;
    let mut output = String::new();
    for token in &page.tokens {
        if FlowPageData::is_word(token) {
            if seen_words <= visible {
                output.push_str(token);
            }
            seen_words += 1;
        } else if seen_words <= visible + 1 {
            output.push_str(token);
        }
    }

    if output.trim().is_empty() {
        RENDER_PLACEHOLDER.to_string()
    } else {
        output
    }
}

/// What a single playback step did to the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    NextWord,
    NextPage,
    NextChapter,
    /// The cursor was already on the last word of the book and did not move
    EndOfBook,
}

/// Move `cursor` one word forward, crossing page and chapter ends
pub fn advance(cursor: &mut Cursor, layout: &BookLayout) -> Advance {
    let words = layout
        .word_count(cursor.chapter_index, cursor.page_index)
        .unwrap_or(1);

    if cursor.word_index + 1 < words {
        cursor.word_index += 1;
        Advance::NextWord
    } else if cursor.page_index + 1 < layout.page_count(cursor.chapter_index) {
        cursor.page_index += 1;
        cursor.word_index = 0;
        Advance::NextPage
    } else if cursor.chapter_index + 1 < layout.chapter_count() {
        cursor.chapter_index += 1;
        cursor.page_index = 0;
        cursor.word_index = 0;
        Advance::NextChapter
    } else {
        Advance::EndOfBook
    }
}

/// Running state of flow playback.
///
/// Holds at most one outstanding timer. A tick is bracketed by
/// [`begin_tick`](Self::begin_tick) and [`end_tick`](Self::end_tick); a second
/// tick cannot begin while one is in flight.
#[derive(Debug, Default)]
pub struct FlowPlayback {
    running: bool,
    tick_in_flight: bool,
    pending: Option<TimerHandle>,
}

impl FlowPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The single timer this playback is waiting on
    pub fn pending(&self) -> Option<TimerHandle> {
        self.pending
    }

    /// Begin playback; returns false if it was already running
    pub fn start(&mut self, scheduler: &mut dyn Scheduler, interval: Duration) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.reschedule(scheduler, interval);
        true
    }

    /// Cancel the outstanding timer and stop. Safe to call repeatedly.
    pub fn stop(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
        self.running = false;
    }

    /// Replace the outstanding timer with one firing after `interval`
    pub fn reschedule(&mut self, scheduler: &mut dyn Scheduler, interval: Duration) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
        if self.running {
            self.pending = Some(scheduler.schedule_after(interval));
        }
    }

    /// Accept a fired timer if it is the outstanding one
    pub fn claim(&mut self, handle: TimerHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Enter a tick; false while stopped or while another tick runs
    pub fn begin_tick(&mut self) -> bool {
        if !self.running || self.tick_in_flight {
            return false;
        }
        self.tick_in_flight = true;
        true
    }

    pub fn end_tick(&mut self) {
        self.tick_in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutParams;
    use crate::flow::{tokenize, ManualScheduler};
    use crate::types::Book;

    #[test]
    fn test_tick_interval() {
        assert_eq!(tick_interval(250), Duration::from_millis(240));
        assert_eq!(tick_interval(600), Duration::from_millis(100));
        assert_eq!(tick_interval(900), Duration::from_millis(80));
        assert_eq!(tick_interval(5000), Duration::from_millis(80));
        assert_eq!(tick_interval(0), Duration::from_millis(1000));
        assert_eq!(tick_interval(10), Duration::from_millis(1000));
    }

    #[test]
    fn test_render_reveals_with_trailing_gap() {
        let page = tokenize("one two  three");
        assert_eq!(render(&page, 0), "one ");
        assert_eq!(render(&page, 1), "one two  ");
        assert_eq!(render(&page, 2), "one two  three");
        assert_eq!(render(&page, 9), "one two  three");
    }

    #[test]
    fn test_render_keeps_leading_gap() {
        let page = tokenize("  lead");
        assert_eq!(render(&page, 0), "  lead");
    }

    #[test]
    fn test_render_placeholder() {
        assert_eq!(render(&tokenize(""), 0), RENDER_PLACEHOLDER);
        assert_eq!(render(&tokenize(" \n "), 0), RENDER_PLACEHOLDER);
    }

    #[test]
    fn test_render_multiline_gap() {
        let page = tokenize("end.\nNext");
        assert_eq!(render(&page, 0), "end.\n");
    }

    fn layout() -> BookLayout {
        let book = Book::new("Advance")
            .with_chapter("One", "a b c d")
            .with_chapter("Two", "e");
        let params = LayoutParams {
            chars_per_line: 3,
            lines_per_page: 1,
            hyphenation: false,
        };
        BookLayout::build(&book, params, None)
    }

    #[test]
    fn test_advance_crosses_pages_and_chapters() {
        let layout = layout();
        // chapter one: "a b" / "c d"; chapter two: "e"
        let mut cursor = Cursor::default();
        assert_eq!(advance(&mut cursor, &layout), Advance::NextWord);
        assert_eq!(cursor, Cursor::new(0, 0, 1));
        assert_eq!(advance(&mut cursor, &layout), Advance::NextPage);
        assert_eq!(cursor, Cursor::new(0, 1, 0));
        advance(&mut cursor, &layout);
        assert_eq!(advance(&mut cursor, &layout), Advance::NextChapter);
        assert_eq!(cursor, Cursor::new(1, 0, 0));
        assert_eq!(advance(&mut cursor, &layout), Advance::EndOfBook);
        assert_eq!(cursor, Cursor::new(1, 0, 0));
    }

    #[test]
    fn test_playback_single_outstanding_timer() {
        let mut scheduler = ManualScheduler::new();
        let mut playback = FlowPlayback::new();
        let interval = Duration::from_millis(100);

        assert!(playback.start(&mut scheduler, interval));
        assert!(!playback.start(&mut scheduler, interval));
        assert_eq!(scheduler.pending_count(), 1);

        playback.reschedule(&mut scheduler, interval);
        assert_eq!(scheduler.pending_count(), 1);

        playback.stop(&mut scheduler);
        playback.stop(&mut scheduler);
        assert_eq!(scheduler.pending_count(), 0);
        assert!(!playback.is_running());
    }

    #[test]
    fn test_claim_rejects_stale_handle() {
        let mut scheduler = ManualScheduler::new();
        let mut playback = FlowPlayback::new();
        playback.start(&mut scheduler, Duration::from_millis(100));
        let first = playback.pending().unwrap();
        playback.reschedule(&mut scheduler, Duration::from_millis(100));

        assert!(!playback.claim(first));
        let second = playback.pending().unwrap();
        assert!(playback.claim(second));
        assert!(playback.pending().is_none());
    }

    #[test]
    fn test_tick_guard() {
        let mut scheduler = ManualScheduler::new();
        let mut playback = FlowPlayback::new();
        assert!(!playback.begin_tick());

        playback.start(&mut scheduler, Duration::from_millis(100));
        assert!(playback.begin_tick());
        assert!(!playback.begin_tick());
        playback.end_tick();
        assert!(playback.begin_tick());
    }
}
