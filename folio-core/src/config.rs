//! Reader settings

use crate::error::{ConfigError, FolioError, Result};
use crate::types::ReadingMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Slowest allowed flow rate
pub const FLOW_MIN_WPM: u32 = 60;

/// Fastest allowed flow rate
pub const FLOW_MAX_WPM: u32 = 900;

/// Where the progress bar sits on the display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusBarPosition {
    #[default]
    Bottom,
    Right,
    Hidden,
}

/// Parameters that determine page layout.
///
/// Pages are a cache keyed by this signature: any change re-paginates the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutParams {
    pub chars_per_line: usize,
    pub lines_per_page: usize,
    pub hyphenation: bool,
}

impl Default for LayoutParams {
    fn default() -> Self {
        ReaderConfig::default().layout_params()
    }
}

/// User-tunable reader settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReaderConfig {
    /// Character budget per line
    pub chars_per_line: usize,

    /// Line budget per page
    pub lines_per_page: usize,

    /// Split overlong words at syllable boundaries
    pub hyphenation: bool,

    /// Mode used when a book is opened
    pub reading_mode: ReadingMode,

    /// Flow rate in words per minute
    pub flow_wpm: u32,

    /// Progress bar placement
    pub status_bar: StatusBarPosition,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            chars_per_line: 60,
            lines_per_page: 9,
            hyphenation: true,
            reading_mode: ReadingMode::Paged,
            flow_wpm: 250,
            status_bar: StatusBarPosition::Bottom,
        }
    }
}

impl ReaderConfig {
    /// Load settings from a JSON file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        let config: ReaderConfig = match std::fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).map_err(ConfigError::Malformed)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(e.into()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Save settings to a JSON file atomically
    /// Writes to a temp file then renames to avoid partial writes
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).map_err(ConfigError::Malformed)?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, data)?;
        std::fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Reject settings that cannot produce a layout
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.chars_per_line < 1 {
            return Err(ConfigError::InvalidValue {
                field: "chars_per_line",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.lines_per_page < 1 {
            return Err(ConfigError::InvalidValue {
                field: "lines_per_page",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Layout signature for these settings
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            chars_per_line: self.chars_per_line,
            lines_per_page: self.lines_per_page,
            hyphenation: self.hyphenation,
        }
    }

    /// Flow rate clamped into the supported band
    pub fn clamped_wpm(&self) -> u32 {
        self.flow_wpm.clamp(FLOW_MIN_WPM, FLOW_MAX_WPM)
    }
}

impl TryFrom<&str> for ReaderConfig {
    type Error = FolioError;

    fn try_from(json: &str) -> Result<Self> {
        let config: ReaderConfig = serde_json::from_str(json).map_err(ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }
}
