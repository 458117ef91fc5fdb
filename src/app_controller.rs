use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::{AppError, ParseError};
use crate::file_utils::FileManager;
use crate::glyph_source::{GlyphSource, LopdfGlyphSource};
use crate::screenplay::model::{ParsedScreenplay, ScreenplayFormat};
use crate::screenplay::parser::ScreenplayParser;

// @module: Application controller for screenplay parsing

/// Suffix of the parsed document output file
pub const SCENES_SUFFIX: &str = "scenes";

/// Suffix of the analysis request output file
pub const ANALYSIS_SUFFIX: &str = "analysis";

/// Outcome counts of a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Main application controller for screenplay parsing
pub struct Controller {
    // @field: App configuration
    config: Config,
    parser: ScreenplayParser,
    glyph_source: Arc<dyn GlyphSource>,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let config = config.validated()?;

        Ok(Self {
            parser: ScreenplayParser::new(config.parser.clone()),
            config,
            glyph_source: Arc::new(LopdfGlyphSource::new()),
        })
    }

    /// Replace the PDF text engine
    pub fn with_glyph_source(mut self, source: Arc<dyn GlyphSource>) -> Self {
        self.glyph_source = source;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse one file. `format` overrides detection.
    pub async fn parse(&self, input_file: &Path, format: Option<ScreenplayFormat>) -> Result<ParsedScreenplay> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        let format = match format {
            Some(format) => Some(format),
            None => FileManager::detect_file_type(input_file)?.format(),
        };

        let result = self
            .parser
            .parse_file(self.glyph_source.as_ref(), input_file, format)
            .await;

        match result {
            Ok(parsed) => Ok(parsed),
            Err(AppError::Parse(e)) if e.is_pdf_text_problem() => {
                warn!("PDF has no usable text layer, try exporting the script as .fdx or plain text");
                Err(AppError::Parse(e).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse one file and write `<stem>.scenes.json` into `output_dir`.
    ///
    /// Returns the written path, or `None` when the output exists and
    /// `force_overwrite` is off.
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
        format: Option<ScreenplayFormat>,
    ) -> Result<Option<PathBuf>> {
        let start_time = std::time::Instant::now();

        let output_path = FileManager::generate_output_path(&input_file, &output_dir, SCENES_SUFFIX);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, output already exists (use -f to force overwrite)");
            return Ok(None);
        }

        let parsed = self.parse(&input_file, format).await?;
        self.save_outputs(&parsed, &input_file, &output_dir)?;

        for warning in &parsed.warnings {
            warn!("{}", warning);
        }

        info!(
            "Parsed {} scene(s) from {} in {}",
            parsed.metadata.total_scenes,
            input_file.display(),
            Self::format_duration(start_time.elapsed())
        );
        Ok(Some(output_path))
    }

    /// Serialize a parsed document as configured
    pub fn to_json(&self, parsed: &ParsedScreenplay) -> Result<String> {
        let json = if self.config.output.pretty_json {
            serde_json::to_string_pretty(parsed)
        } else {
            serde_json::to_string(parsed)
        };
        json.context("Failed to serialize parsed screenplay")
    }

    /// Write the scene document and, if enabled, the analysis requests
    fn save_outputs(&self, parsed: &ParsedScreenplay, input_file: &Path, output_dir: &Path) -> Result<PathBuf> {
        FileManager::ensure_dir(output_dir)?;

        let output_path = FileManager::generate_output_path(input_file, output_dir, SCENES_SUFFIX);
        FileManager::write_json(&output_path, parsed, self.config.output.pretty_json)?;
        info!("Success: {}", output_path.display());

        if self.config.output.write_analysis_requests {
            let analysis_path = FileManager::generate_output_path(input_file, output_dir, ANALYSIS_SUFFIX);
            FileManager::write_json(
                &analysis_path,
                &parsed.analysis_requests(),
                self.config.output.pretty_json,
            )?;
            info!("Analysis requests: {}", analysis_path.display());
        }

        Ok(output_path)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Parse every screenplay file under a directory, writing outputs next to each file.
    /// Files whose output already exists are skipped unless `force_overwrite` is set.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_screenplays(&input_dir)?;

        if files.is_empty() {
            return Err(anyhow::anyhow!("No screenplay files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Parsing files");

        let mut summary = FolderSummary::default();

        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Parsing: {}", file_name));

            let output_dir = match file.parent() {
                Some(parent) => parent.to_path_buf(),
                None => input_dir.clone(),
            };

            match self.run(file.clone(), output_dir, force_overwrite, None).await {
                Ok(Some(_)) => summary.processed += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    summary.errors += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors ({})",
            summary.processed,
            summary.skipped,
            summary.errors,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }
}

/// One row per scene: number, header, content size
pub fn scene_table(parsed: &ParsedScreenplay) -> String {
    let mut table = format!("{}\n", parsed.title);
    table.push_str(&format!("{:>5}  {:<60}  {:>7}\n", "#", "HEADER", "CHARS"));

    for scene in &parsed.scenes {
        let header: String = scene.header.chars().take(60).collect();
        table.push_str(&format!(
            "{:>5}  {:<60}  {:>7}\n",
            scene.number,
            header,
            scene.content_chars()
        ));
    }

    let duplicates = parsed.duplicate_numbers();
    if !duplicates.is_empty() {
        let numbers: Vec<String> = duplicates.keys().map(|n| n.to_string()).collect();
        table.push_str(&format!("Duplicate scene numbers: {}\n", numbers.join(", ")));
    }

    table
}

/// Exit code for a failed parse, so scripts can tell problems apart
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<AppError>() {
        Some(AppError::Parse(ParseError::InvalidInput(_) | ParseError::TooShort { .. })) => 2,
        Some(AppError::Parse(e)) if e.is_pdf_text_problem() => 3,
        Some(AppError::Parse(_)) => 4,
        Some(AppError::Config(_)) => 5,
        _ => 1,
    }
}
