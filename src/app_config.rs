use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::errors::AppError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Parser heuristics
    #[serde(default)]
    pub parser: ParserConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Whitespace share above which text is treated as letter-spaced.
///
/// Ordinary prose sits around 15-20% spaces; exploded text such as
/// "I N T . R O O M" is close to 50%.
pub const DEFAULT_SPACE_RATIO_THRESHOLD: f64 = 0.40;

/// Vertical distance in PDF layout units that starts a new line.
///
/// Fragments of one printed line share a baseline up to rounding noise,
/// while screenplay line spacing is around 12 units.
pub const DEFAULT_LINE_GAP_THRESHOLD: f32 = 5.0;

/// Shortest scene body that is kept.
pub const DEFAULT_MIN_SCENE_CONTENT_CHARS: usize = 10;

/// Shortest input accepted at all.
pub const DEFAULT_MIN_INPUT_CHARS: usize = 20;

/// Shortest reconstructed PDF text before the document is considered image-only.
pub const DEFAULT_MIN_PDF_TEXT_CHARS: usize = 100;

/// Scene count below which a feature-length document is flagged.
pub const DEFAULT_LOW_SCENE_COUNT: usize = 3;

/// Parser heuristics, every one overridable from the config file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParserConfig {
    // @field: Letter-spacing detection ratio (0.0 - 1.0)
    #[serde(default = "default_space_ratio_threshold")]
    pub space_ratio_threshold: f64,

    // @field: PDF line break threshold in layout units
    #[serde(default = "default_line_gap_threshold")]
    pub line_gap_threshold: f32,

    // @field: Minimum scene body length in characters
    #[serde(default = "default_min_scene_content_chars")]
    pub min_scene_content_chars: usize,

    // @field: Minimum input length in characters
    #[serde(default = "default_min_input_chars")]
    pub min_input_chars: usize,

    // @field: Minimum reconstructed PDF text length
    #[serde(default = "default_min_pdf_text_chars")]
    pub min_pdf_text_chars: usize,

    // @field: Scene count below which a warning is attached
    #[serde(default = "default_low_scene_count")]
    pub low_scene_count: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            space_ratio_threshold: default_space_ratio_threshold(),
            line_gap_threshold: default_line_gap_threshold(),
            min_scene_content_chars: default_min_scene_content_chars(),
            min_input_chars: default_min_input_chars(),
            min_pdf_text_chars: default_min_pdf_text_chars(),
            low_scene_count: default_low_scene_count(),
        }
    }
}

impl ParserConfig {
    /// Validate the heuristics for sane ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.space_ratio_threshold > 0.0 && self.space_ratio_threshold < 1.0) {
            return Err(anyhow!(
                "space_ratio_threshold must be between 0 and 1 (exclusive), got {}",
                self.space_ratio_threshold
            ));
        }

        if !self.line_gap_threshold.is_finite() || self.line_gap_threshold <= 0.0 {
            return Err(anyhow!(
                "line_gap_threshold must be a positive number, got {}",
                self.line_gap_threshold
            ));
        }

        if self.min_scene_content_chars == 0 {
            return Err(anyhow!("min_scene_content_chars must be at least 1"));
        }

        Ok(())
    }
}

/// Output settings for the command line tool
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Pretty-print the JSON output
    #[serde(default = "default_true")]
    pub pretty_json: bool,

    /// Also write `<stem>.analysis.json` with one request per scene
    #[serde(default)]
    pub write_analysis_requests: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty_json: true,
            write_analysis_requests: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_space_ratio_threshold() -> f64 {
    DEFAULT_SPACE_RATIO_THRESHOLD
}

fn default_line_gap_threshold() -> f32 {
    DEFAULT_LINE_GAP_THRESHOLD
}

fn default_min_scene_content_chars() -> usize {
    DEFAULT_MIN_SCENE_CONTENT_CHARS
}

fn default_min_input_chars() -> usize {
    DEFAULT_MIN_INPUT_CHARS
}

fn default_min_pdf_text_chars() -> usize {
    DEFAULT_MIN_PDF_TEXT_CHARS
}

fn default_low_scene_count() -> usize {
    DEFAULT_LOW_SCENE_COUNT
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Parse a JSON config document and validate it
    pub fn from_json(json: &str) -> std::result::Result<Self, AppError> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| AppError::Config(format!("invalid JSON: {}", e)))?;
        config.validated()
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.parser.validate()
    }

    // @returns: Self when valid, otherwise a configuration error
    pub fn validated(self) -> std::result::Result<Self, AppError> {
        self.validate().map_err(|e| AppError::Config(e.to_string()))?;
        Ok(self)
    }
}
