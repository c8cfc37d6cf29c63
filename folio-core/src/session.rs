//! A reading session: one open book, its layout, the cursor and flow playback
//!
//! Every navigation primitive updates the cursor, presents a frame and saves
//! the position of the mode it rendered. Nothing here fails: stale saved
//! state is discarded and storage faults are logged by [`PositionStore`].

use crate::config::ReaderConfig;
use crate::error::ConfigError;
use crate::flow::{
    advance, tick_interval, Advance, FlowPlayback, ManualScheduler, Scheduler, TimerHandle,
};
use crate::hyphenation::{detect_language, hyphenator_for_tag, Hyphenator, Language};
use crate::layout::BookLayout;
use crate::position::{self, Cursor, RestoreSource};
use crate::storage::PositionStore;
use crate::types::{Book, Chapter, ReadingMode};
use crate::view::{self, FrameSink};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Screen the session is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Welcome,
    ChapterList,
    Paged,
    Flow,
}

/// Serializable snapshot of where the reader is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingState {
    pub view: View,
    pub cursor: Cursor,
    /// Highlighted row of the chapter list
    pub list_selection: usize,
}

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The cursor or selection changed and a frame was presented
    Moved,
    /// Already at the first or last item; nothing changed
    Boundary,
    /// Not applicable in the current view
    Ignored,
}

/// Result of a flow tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced(Advance),
    /// The last word of the book was already visible; playback stopped
    Finished,
    /// Stopped, already ticking, no book, or a stale timer
    Skipped,
}

struct LoadedBook {
    book: Book,
    language: Language,
    hyphenator: Option<Box<dyn Hyphenator>>,
    layout: BookLayout,
}

/// Reading session driven by navigation calls and scheduler timers
pub struct ReaderSession<S: Scheduler> {
    config: ReaderConfig,
    positions: PositionStore,
    scheduler: S,
    sink: Box<dyn FrameSink>,
    loaded: Option<LoadedBook>,
    state: ReadingState,
    playback: FlowPlayback,
}

impl<S: Scheduler> ReaderSession<S> {
    pub fn new(
        config: ReaderConfig,
        positions: PositionStore,
        scheduler: S,
        sink: impl FrameSink + 'static,
    ) -> Self {
        Self {
            config,
            positions,
            scheduler,
            sink: Box::new(sink),
            loaded: None,
            state: ReadingState::default(),
            playback: FlowPlayback::new(),
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn state(&self) -> ReadingState {
        self.state
    }

    pub fn cursor(&self) -> Cursor {
        self.state.cursor
    }

    pub fn view(&self) -> View {
        self.state.view
    }

    pub fn book(&self) -> Option<&Book> {
        self.loaded.as_ref().map(|l| &l.book)
    }

    pub fn layout(&self) -> Option<&BookLayout> {
        self.loaded.as_ref().map(|l| &l.layout)
    }

    /// Language detected for the open book
    pub fn language(&self) -> Option<Language> {
        self.loaded.as_ref().map(|l| l.language)
    }

    pub fn positions(&self) -> &PositionStore {
        &self.positions
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn is_flow_running(&self) -> bool {
        self.playback.is_running()
    }

    /// Open `book`, restoring its saved position.
    ///
    /// With `resume` and a usable saved position the reading view for the
    /// configured mode is shown (flow starts playing); otherwise the chapter
    /// list opens on the restored chapter.
    pub async fn load_book(&mut self, mut book: Book, resume: bool) -> RestoreSource {
        self.stop_flow();

        if book.chapters.is_empty() {
            tracing::warn!("'{}' has no chapters, showing an empty one", book.title);
            book.add_chapter(Chapter::new(book.title.clone(), String::new()));
        }

        let language = detect_language(&book.language_sample());
        let hyphenator = hyphenator_for_tag(language.tag());
        let layout = BookLayout::build(&book, self.config.layout_params(), hyphenator.as_deref());

        let paged = self.positions.load(&book.title, ReadingMode::Paged).await;
        let flow = self.positions.load(&book.title, ReadingMode::Flow).await;
        let (cursor, source) = position::restore(
            self.config.reading_mode,
            flow.as_ref(),
            paged.as_ref(),
            &layout,
        );

        tracing::info!(
            "Loaded '{}' ({} chapters, {} pages, language {})",
            book.title,
            layout.chapter_count(),
            layout.total_pages(),
            language.tag()
        );
        if source != RestoreSource::Start {
            tracing::info!(
                "Restored {:?} position: Ch {}, Pg {}, Word {}",
                source,
                cursor.chapter_index + 1,
                cursor.page_index + 1,
                cursor.word_index + 1
            );
        }

        self.loaded = Some(LoadedBook {
            book,
            language,
            hyphenator,
            layout,
        });
        self.state = ReadingState {
            view: View::ChapterList,
            cursor,
            list_selection: cursor.chapter_index,
        };

        if resume && source != RestoreSource::Start {
            self.enter_reading_view().await;
        } else {
            self.present_chapter_list();
        }
        source
    }

    /// Close the open book and show the welcome screen
    pub fn close_book(&mut self) {
        self.stop_flow();
        if let Some(loaded) = self.loaded.take() {
            tracing::info!("Closed '{}'", loaded.book.title);
        }
        self.state = ReadingState::default();
        self.present_welcome();
    }

    /// Replace the settings.
    ///
    /// The book is re-paginated only when the layout signature changed; the
    /// page is then remapped to the same fraction of its chapter. A mode
    /// change switches between the paged and flow views.
    pub async fn apply_settings(&mut self, config: ReaderConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let relayout = config.layout_params() != self.config.layout_params();
        self.config = config;

        let Some(loaded) = self.loaded.as_mut() else {
            self.present_welcome();
            return Ok(());
        };

        if relayout {
            let old_page_count = loaded.layout.page_count(self.state.cursor.chapter_index);
            let params = self.config.layout_params();
            loaded.layout = BookLayout::build(&loaded.book, params, loaded.hyphenator.as_deref());
            self.state.cursor =
                position::remap_after_relayout(self.state.cursor, old_page_count, &loaded.layout);
            tracing::debug!(
                "Re-paginated at {}x{}, now Ch {} Pg {}",
                params.chars_per_line,
                params.lines_per_page,
                self.state.cursor.chapter_index + 1,
                self.state.cursor.page_index + 1
            );
        }

        match (self.config.reading_mode, self.state.view) {
            (ReadingMode::Flow, View::Paged) => {
                self.state.cursor.word_index = 0;
                self.show_flow(false).await;
            }
            (ReadingMode::Paged, View::Flow) => {
                self.show_page().await;
            }
            _ => {
                self.refresh().await;
                if self.state.view == View::Flow && self.playback.is_running() {
                    let interval = tick_interval(self.config.flow_wpm);
                    self.playback.reschedule(&mut self.scheduler, interval);
                }
            }
        }
        Ok(())
    }

    /// Present the current view again
    pub async fn refresh(&mut self) {
        match self.state.view {
            View::Welcome => self.present_welcome(),
            View::ChapterList => self.present_chapter_list(),
            View::Paged => self.present_page().await,
            View::Flow => self.present_flow().await,
        }
    }

    /// Show the whole current page, stopping flow playback
    pub async fn show_page(&mut self) -> Navigation {
        if self.loaded.is_none() {
            return Navigation::Ignored;
        }
        self.stop_flow();
        self.state.view = View::Paged;
        self.present_page().await;
        Navigation::Moved
    }

    /// Show the current page in flow mode, optionally starting playback
    pub async fn show_flow(&mut self, auto_start: bool) -> Navigation {
        if self.loaded.is_none() {
            return Navigation::Ignored;
        }
        self.state.view = View::Flow;
        if auto_start {
            let interval = tick_interval(self.config.flow_wpm);
            if self.playback.start(&mut self.scheduler, interval) {
                tracing::info!("Flow started at {} wpm", self.config.clamped_wpm());
            }
        } else {
            self.stop_flow();
        }
        self.present_flow().await;
        Navigation::Moved
    }

    /// Show the chapter list with the current chapter selected.
    ///
    /// Ignored while flow playback is running.
    pub fn show_chapter_list(&mut self) -> Navigation {
        if self.loaded.is_none() {
            return Navigation::Ignored;
        }
        if self.playback.is_running() {
            tracing::debug!("Chapter list ignored while flow is running");
            return Navigation::Ignored;
        }
        self.state.view = View::ChapterList;
        self.state.list_selection = self.state.cursor.chapter_index;
        self.present_chapter_list();
        Navigation::Moved
    }

    /// Next page, crossing into the next chapter at a chapter end
    pub async fn next_page(&mut self) -> Navigation {
        if !self.in_reading_view() {
            return Navigation::Ignored;
        }
        let Some(loaded) = &self.loaded else {
            return Navigation::Ignored;
        };
        let layout = &loaded.layout;
        let cursor = &mut self.state.cursor;
        if cursor.page_index + 1 < layout.page_count(cursor.chapter_index) {
            cursor.page_index += 1;
        } else if cursor.chapter_index + 1 < layout.chapter_count() {
            cursor.chapter_index += 1;
            cursor.page_index = 0;
        } else {
            tracing::info!("End of book");
            return Navigation::Boundary;
        }
        cursor.word_index = 0;
        self.refresh().await;
        Navigation::Moved
    }

    /// Previous page, crossing into the last page of the previous chapter
    pub async fn prev_page(&mut self) -> Navigation {
        if !self.in_reading_view() {
            return Navigation::Ignored;
        }
        let Some(loaded) = &self.loaded else {
            return Navigation::Ignored;
        };
        let layout = &loaded.layout;
        let cursor = &mut self.state.cursor;
        if cursor.page_index > 0 {
            cursor.page_index -= 1;
        } else if cursor.chapter_index > 0 {
            cursor.chapter_index -= 1;
            cursor.page_index = layout.page_count(cursor.chapter_index).saturating_sub(1);
        } else {
            tracing::info!("Beginning of book");
            return Navigation::Boundary;
        }
        cursor.word_index = 0;
        self.refresh().await;
        Navigation::Moved
    }

    /// First page of the next chapter
    pub async fn next_chapter(&mut self) -> Navigation {
        if !self.in_reading_view() {
            return Navigation::Ignored;
        }
        let Some(loaded) = &self.loaded else {
            return Navigation::Ignored;
        };
        let next = self.state.cursor.chapter_index + 1;
        if next >= loaded.layout.chapter_count() {
            tracing::info!("Already at last chapter");
            return Navigation::Boundary;
        }
        self.state.cursor = Cursor::new(next, 0, 0);
        self.refresh().await;
        Navigation::Moved
    }

    /// First page of the previous chapter
    pub async fn prev_chapter(&mut self) -> Navigation {
        if !self.in_reading_view() || self.loaded.is_none() {
            return Navigation::Ignored;
        }
        let Some(prev) = self.state.cursor.chapter_index.checked_sub(1) else {
            tracing::info!("Already at first chapter");
            return Navigation::Boundary;
        };
        self.state.cursor = Cursor::new(prev, 0, 0);
        self.refresh().await;
        Navigation::Moved
    }

    /// Open chapter `index` in the reading view of the configured mode
    pub async fn jump_to_chapter(&mut self, index: usize) -> Navigation {
        let Some(loaded) = &self.loaded else {
            return Navigation::Ignored;
        };
        if index >= loaded.layout.chapter_count() {
            return Navigation::Ignored;
        }
        self.state.cursor = Cursor::new(index, 0, 0);
        self.state.list_selection = index;
        self.enter_reading_view().await;
        Navigation::Moved
    }

    /// Move the chapter list selection down
    pub fn select_next_chapter(&mut self) -> Navigation {
        let Some(loaded) = &self.loaded else {
            return Navigation::Ignored;
        };
        if self.state.view != View::ChapterList {
            return Navigation::Ignored;
        }
        if self.state.list_selection + 1 >= loaded.layout.chapter_count() {
            return Navigation::Boundary;
        }
        self.state.list_selection += 1;
        self.present_chapter_list();
        Navigation::Moved
    }

    /// Move the chapter list selection up
    pub fn select_prev_chapter(&mut self) -> Navigation {
        if self.loaded.is_none() || self.state.view != View::ChapterList {
            return Navigation::Ignored;
        }
        if self.state.list_selection == 0 {
            return Navigation::Boundary;
        }
        self.state.list_selection -= 1;
        self.present_chapter_list();
        Navigation::Moved
    }

    /// Open the chapter highlighted in the chapter list
    pub async fn open_selected_chapter(&mut self) -> Navigation {
        if self.state.view != View::ChapterList {
            return Navigation::Ignored;
        }
        tracing::debug!("Opening chapter {}", self.state.list_selection + 1);
        self.jump_to_chapter(self.state.list_selection).await
    }

    /// Start flow playback; false if not in the flow view or already running
    pub async fn start_flow(&mut self) -> bool {
        if self.loaded.is_none() || self.state.view != View::Flow {
            return false;
        }
        let interval = tick_interval(self.config.flow_wpm);
        if !self.playback.start(&mut self.scheduler, interval) {
            return false;
        }
        tracing::info!("Flow started at {} wpm", self.config.clamped_wpm());
        self.present_flow().await;
        true
    }

    /// Stop flow playback and cancel the pending tick. Idempotent.
    pub fn stop_flow(&mut self) {
        self.playback.stop(&mut self.scheduler);
    }

    /// Pause running playback or start stopped playback, in the flow view only
    pub async fn toggle_flow(&mut self) -> Navigation {
        if self.loaded.is_none() || self.state.view != View::Flow {
            return Navigation::Ignored;
        }
        if self.playback.is_running() {
            self.stop_flow();
            tracing::info!("Flow paused");
            self.present_flow().await;
        } else {
            self.start_flow().await;
        }
        Navigation::Moved
    }

    /// Change the flow rate; the pending tick keeps its interval and the
    /// next one uses the new rate
    pub async fn set_flow_rate(&mut self, wpm: u32) {
        self.config.flow_wpm = wpm;
        if self.state.view == View::Flow {
            self.present_flow().await;
        }
    }

    /// Handle a fired timer; only the single outstanding handle ticks
    pub async fn on_timer(&mut self, handle: TimerHandle) -> TickOutcome {
        if !self.playback.claim(handle) {
            tracing::debug!("Ignoring stale flow timer {}", handle.id());
            return TickOutcome::Skipped;
        }
        self.tick().await
    }

    /// Reveal the next word, render it and schedule the following tick
    pub async fn tick(&mut self) -> TickOutcome {
        let Some(loaded) = &self.loaded else {
            return TickOutcome::Skipped;
        };
        if !self.playback.begin_tick() {
            return TickOutcome::Skipped;
        }

        let step = advance(&mut self.state.cursor, &loaded.layout);
        if step == Advance::EndOfBook {
            tracing::info!("End of book in flow mode");
            self.playback.stop(&mut self.scheduler);
        }

        self.present_flow().await;

        let interval = tick_interval(self.config.flow_wpm);
        self.playback.reschedule(&mut self.scheduler, interval);
        self.playback.end_tick();

        match step {
            Advance::EndOfBook => TickOutcome::Finished,
            step => TickOutcome::Advanced(step),
        }
    }

    fn in_reading_view(&self) -> bool {
        matches!(self.state.view, View::Paged | View::Flow)
    }

    async fn enter_reading_view(&mut self) {
        match self.config.reading_mode {
            ReadingMode::Flow => {
                self.show_flow(true).await;
            }
            ReadingMode::Paged => {
                self.show_page().await;
            }
        }
    }

    fn present_welcome(&mut self) {
        self.state.view = View::Welcome;
        let frame = view::welcome_frame(self.config.status_bar);
        self.sink.present(&frame);
    }

    fn present_chapter_list(&mut self) {
        let Some(loaded) = &self.loaded else {
            return;
        };
        let frame = view::chapter_list_frame(&loaded.book, self.state.list_selection);
        self.sink.present(&frame);
    }

    async fn present_page(&mut self) {
        let Some(loaded) = &self.loaded else {
            return;
        };
        self.state.cursor.clamp_to(&loaded.layout);
        let frame = view::page_frame(&loaded.layout, &self.state.cursor, self.config.status_bar);
        self.sink.present(&frame);

        self.positions
            .save(
                &loaded.book.title,
                ReadingMode::Paged,
                &self.state.cursor.paged_position(),
            )
            .await;
    }

    async fn present_flow(&mut self) {
        let Some(loaded) = &self.loaded else {
            return;
        };
        self.state.cursor.clamp_to(&loaded.layout);
        let frame = view::flow_frame(
            &loaded.layout,
            &self.state.cursor,
            self.playback.is_running(),
            self.config.flow_wpm,
            self.config.status_bar,
        );
        self.sink.present(&frame);

        self.positions
            .save(
                &loaded.book.title,
                ReadingMode::Flow,
                &self.state.cursor.flow_position(),
            )
            .await;
    }
}

impl ReaderSession<ManualScheduler> {
    /// Move the virtual clock forward by `by`, delivering every timer that
    /// falls due on the way. Returns the number of ticks that moved the
    /// cursor or finished the book.
    pub async fn advance_clock(&mut self, by: Duration) -> usize {
        let until = self.scheduler.now() + by;
        let mut ticks = 0;
        while let Some(handle) = self.scheduler.pop_due(until) {
            if self.on_timer(handle).await != TickOutcome::Skipped {
                ticks += 1;
            }
        }
        self.scheduler.set_now(until);
        ticks
    }
}
