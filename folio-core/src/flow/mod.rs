//! Flow reading: word-granular reveal of a page at a timed pace

mod playback;
mod scheduler;
mod tokenizer;

pub use playback::{
    advance, render, tick_interval, Advance, FlowPlayback, MIN_TICK_INTERVAL, RENDER_PLACEHOLDER,
};
pub use scheduler::{ManualScheduler, Scheduler, TimerHandle, TokioScheduler};
pub use tokenizer::{build_flow_data, tokenize, FlowPageData};
