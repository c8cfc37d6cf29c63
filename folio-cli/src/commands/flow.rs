//! Flow command implementation

use super::load_book;
use anyhow::{bail, Result};
use folio_core::config::ReaderConfig;
use folio_core::flow::TokioScheduler;
use folio_core::session::{Navigation, ReaderSession, TickOutcome, View};
use folio_core::storage::{LocalStore, PositionStore};
use folio_core::types::ReadingMode;
use folio_core::view::{Frame, FrameKind, FrameSink};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

const PROGRESS_STEPS: u64 = 1000;

/// Prints newly revealed text to stdout and book progress to a progress bar
struct TerminalSink {
    progress: ProgressBar,
    shown: String,
}

impl TerminalSink {
    fn new(progress: ProgressBar) -> Self {
        Self {
            progress,
            shown: String::new(),
        }
    }

    fn write(&self, text: &str) {
        self.progress.suspend(|| {
            let mut stdout = std::io::stdout().lock();
            // A closed stdout only loses the echo; playback carries on
            let _ = stdout.write_all(text.as_bytes());
            let _ = stdout.flush();
        });
    }
}

impl FrameSink for TerminalSink {
    fn present(&mut self, frame: &Frame) {
        if frame.kind != FrameKind::Flow {
            return;
        }
        let text = frame.text().unwrap_or_default();
        if let Some(revealed) = text.strip_prefix(self.shown.as_str()) {
            self.write(revealed);
        } else {
            self.write("\n\n");
            self.write(text);
        }
        self.shown = text.to_string();

        if let Some(progress) = frame.progress {
            self.progress
                .set_position((progress * PROGRESS_STEPS as f64).round() as u64);
        }
    }
}

/// Reveal a book word by word until the end, `max_words` or Ctrl-C.
///
/// The flow position is saved under `state_dir` after every word.
pub async fn flow(
    input: &Path,
    mut config: ReaderConfig,
    state_dir: &Path,
    chapter: Option<usize>,
    max_words: Option<usize>,
) -> Result<()> {
    let book = load_book(input)?;
    config.reading_mode = ReadingMode::Flow;
    config.validate()?;
    let wpm = config.clamped_wpm();

    let progress = ProgressBar::new(PROGRESS_STEPS);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {percent:>3}% {msg}")?
            .progress_chars("━━─"),
    );
    progress.set_message(format!("{} wpm", wpm));

    let positions = PositionStore::new(Arc::new(LocalStore::new(state_dir)));
    let (scheduler, mut fired) = TokioScheduler::new();
    let sink = TerminalSink::new(progress.clone());
    let mut session = ReaderSession::new(config, positions, scheduler, sink);

    let chapter_count = book.chapters.len();
    session.load_book(book, chapter.is_none()).await;

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
        None if session.view() != View::Flow => {
            session.jump_to_chapter(0).await;
        }
        None => {}
    }
    if !session.is_flow_running() {
        session.start_flow().await;
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut revealed = 0;

    loop {
        tokio::select! {
            Some(handle) = fired.recv() => {
                match session.on_timer(handle).await {
                    TickOutcome::Advanced(_) => {
                        revealed += 1;
                        if max_words.is_some_and(|max| revealed >= max) {
                            break;
                        }
                    }
                    TickOutcome::Finished => {
                        tracing::info!("Reached the end of the book");
                        break;
                    }
                    TickOutcome::Skipped => {}
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    session.stop_flow();
    progress.finish_and_clear();
    println!();
    tracing::info!("Revealed {} words", revealed);

    Ok(())
}
