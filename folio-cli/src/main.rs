//! Folio CLI - Paginate books and read them page by page or word by word

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate a count argument (must be at least 1)
fn parse_positive(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Reader settings file (JSON); defaults are used when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about a book
    Info {
        /// Input file path (.json or .txt)
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the pages of a book
    Paginate {
        /// Input file path (.json or .txt)
        input: PathBuf,

        /// Characters per line
        #[arg(long, value_parser = parse_positive)]
        chars: Option<usize>,

        /// Lines per page
        #[arg(long, value_parser = parse_positive)]
        lines: Option<usize>,

        /// Disable hyphenation of overlong words
        #[arg(long)]
        no_hyphenation: bool,

        /// Only print this chapter (1-based)
        #[arg(long, value_parser = parse_positive)]
        chapter: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current page, resuming from the saved position
    Read {
        /// Input file path (.json or .txt)
        input: PathBuf,

        /// Directory holding saved reading positions
        #[arg(long, default_value = ".folio")]
        state_dir: PathBuf,

        /// Open this chapter (1-based) instead of the saved position
        #[arg(long, value_parser = parse_positive)]
        chapter: Option<usize>,

        /// Turn this many pages forward before printing
        #[arg(short, long, default_value = "0")]
        next: usize,

        /// Forget the saved position and start from the beginning
        #[arg(long)]
        restart: bool,
    },

    /// Reveal the book word by word at a timed pace
    Flow {
        /// Input file path (.json or .txt)
        input: PathBuf,

        /// Words per minute (60-900)
        #[arg(short, long)]
        wpm: Option<u32>,

        /// Directory holding saved reading positions
        #[arg(long, default_value = ".folio")]
        state_dir: PathBuf,

        /// Start from this chapter (1-based) instead of the saved position
        #[arg(long, value_parser = parse_positive)]
        chapter: Option<usize>,

        /// Stop after revealing this many words
        #[arg(long, value_parser = parse_positive)]
        max_words: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "folio_cli=debug,folio_core=debug"
    } else {
        "folio_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info { input, json } => commands::info(&input, &config, json),

        Commands::Paginate {
            input,
            chars,
            lines,
            no_hyphenation,
            chapter,
            json,
        } => {
            let mut config = config;
            if let Some(chars) = chars {
                config.chars_per_line = chars;
            }
            if let Some(lines) = lines {
                config.lines_per_page = lines;
            }
            if no_hyphenation {
                config.hyphenation = false;
            }
            commands::paginate(&input, &config, chapter, json)
        }

        Commands::Read {
            input,
            state_dir,
            chapter,
            next,
            restart,
        } => commands::read(&input, config, &state_dir, chapter, next, restart).await,

        Commands::Flow {
            input,
            wpm,
            state_dir,
            chapter,
            max_words,
        } => {
            let mut config = config;
            if let Some(wpm) = wpm {
                config.flow_wpm = wpm;
            }
            commands::flow(&input, config, &state_dir, chapter, max_words).await
        }
    }
}
