/*!
 * Parser entry points.
 *
 * `ScreenplayParser` owns only configuration. Each call builds its own scan
 * session, so one parser can be shared freely across tasks.
 */

use log::{debug, info};
use std::path::Path;

use super::fdx::{read_paragraphs, segment};
use super::format::{detect_bytes, detect_format};
use super::front_matter::{extract_title, first_header_index};
use super::model::{ParsedScreenplay, ScreenplayFormat};
use super::normalizer::normalize;
use super::reconstructor::extract_text;
use super::session::ScanSession;
use super::validator::validate_scenes;
use crate::app_config::ParserConfig;
use crate::errors::{AppError, ParseError};
use crate::glyph_source::GlyphSource;

/// Screenplay parser for plaintext, PDF and Final Draft XML input
#[derive(Debug, Clone, Default)]
pub struct ScreenplayParser {
    config: ParserConfig,
}

impl ScreenplayParser {
    /// Create a parser with the given heuristics
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse pasted or plain-file screenplay text.
    pub fn parse_text(&self, text: &str) -> Result<ParsedScreenplay, ParseError> {
        self.check_input(text)?;
        let normalized = normalize(text, &self.config);
        self.parse_normalized(&normalized, ScreenplayFormat::Text)
    }

    /// Parse a Final Draft XML export.
    pub fn parse_fdx(&self, xml: &str) -> Result<ParsedScreenplay, ParseError> {
        self.check_input(xml)?;

        let document = read_paragraphs(xml)?;
        let scenes = segment(&document.paragraphs, &self.config)?;
        let validated = validate_scenes(scenes, &self.config)?;

        let title_lines: Vec<&str> = document.title_page.iter().map(String::as_str).collect();
        let parsed = ParsedScreenplay::new(
            extract_title(&title_lines),
            validated.scenes,
            ScreenplayFormat::Fdx,
            validated.warnings,
        );

        info!(
            "Parsed '{}' from Final Draft XML: {} scene(s)",
            parsed.title, parsed.metadata.total_scenes
        );
        Ok(parsed)
    }

    /// Parse a PDF, using `source` to pull positioned text out of it.
    pub async fn parse_pdf(&self, source: &dyn GlyphSource, bytes: &[u8]) -> Result<ParsedScreenplay, ParseError> {
        if bytes.is_empty() {
            return Err(ParseError::InvalidInput("PDF data is empty".to_string()));
        }

        let text = extract_text(source, bytes, &self.config).await?;
        self.parse_normalized(&text, ScreenplayFormat::Pdf)
    }

    /// Parse text whose dialect is unknown: Final Draft XML or plaintext.
    pub fn parse_str(&self, text: &str) -> Result<ParsedScreenplay, ParseError> {
        match detect_format(text) {
            ScreenplayFormat::Fdx => self.parse_fdx(text),
            _ => self.parse_text(text),
        }
    }

    /// Parse raw bytes, detecting the dialect from their content.
    pub async fn parse_bytes(&self, source: &dyn GlyphSource, bytes: &[u8]) -> Result<ParsedScreenplay, ParseError> {
        let format = detect_bytes(bytes);
        debug!("Detected input format: {}", format);
        self.parse_bytes_as(source, bytes, format).await
    }

    /// Parse raw bytes as a known dialect.
    pub async fn parse_bytes_as(
        &self,
        source: &dyn GlyphSource,
        bytes: &[u8],
        format: ScreenplayFormat,
    ) -> Result<ParsedScreenplay, ParseError> {
        match format {
            ScreenplayFormat::Pdf => self.parse_pdf(source, bytes).await,
            ScreenplayFormat::Fdx => self.parse_fdx(&String::from_utf8_lossy(bytes)),
            ScreenplayFormat::Text => self.parse_text(&String::from_utf8_lossy(bytes)),
        }
    }

    /// Read a file and parse it, detecting the dialect unless `format` is given.
    pub async fn parse_file<P: AsRef<Path>>(
        &self,
        source: &dyn GlyphSource,
        path: P,
        format: Option<ScreenplayFormat>,
    ) -> Result<ParsedScreenplay, AppError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::File(format!("Failed to read {}: {}", path.display(), e)))?;

        let parsed = match format {
            Some(format) => self.parse_bytes_as(source, &bytes, format).await?,
            None => self.parse_bytes(source, &bytes).await?,
        };
        Ok(parsed)
    }

    /// Shared tail of the plaintext and PDF paths.
    fn parse_normalized(&self, text: &str, format: ScreenplayFormat) -> Result<ParsedScreenplay, ParseError> {
        let lines: Vec<&str> = text.split('\n').collect();

        let start = first_header_index(&lines)?;
        let title = extract_title(&lines[..start]);
        if start > 0 {
            debug!("Skipped {} line(s) of front matter", start);
        }

        let (scenes, collisions) = ScanSession::new().run(lines[start..].iter().copied());
        debug!("Scanned {} scene(s), {} number collision(s)", scenes.len(), collisions);

        let validated = validate_scenes(scenes, &self.config)?;
        let parsed = ParsedScreenplay::new(title, validated.scenes, format, validated.warnings);

        info!(
            "Parsed '{}' from {}: {} scene(s)",
            parsed.title, format, parsed.metadata.total_scenes
        );
        Ok(parsed)
    }

    fn check_input(&self, text: &str) -> Result<(), ParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ParseError::InvalidInput("input is empty".to_string()));
        }

        let length = trimmed.chars().count();
        if length < self.config.min_input_chars {
            return Err(ParseError::TooShort {
                length,
                minimum: self.config.min_input_chars,
            });
        }

        Ok(())
    }
}
