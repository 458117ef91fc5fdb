use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::screenplay::format::is_pdf;
use crate::screenplay::model::ScreenplayFormat;

// @module: File and directory utilities

/// Extensions picked up when scanning a folder
pub const SCREENPLAY_EXTENSIONS: [&str; 4] = ["pdf", "fdx", "txt", "fountain"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path next to the input, `<stem>.<suffix>.json`
    // @params: input_file, output_dir, suffix
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        suffix: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(suffix);
        output_filename.push_str(".json");

        output_dir.as_ref().join(output_filename)
    }

    /// Find screenplay files under a directory, sorted by path
    pub fn find_screenplays<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && has_screenplay_extension(path) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to bytes
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Serialize a value to JSON and write it
    pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T, pretty: bool) -> Result<()> {
        let json = if pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
        .context("Failed to serialize JSON")?;

        Self::write_to_file(path, &json)
    }

    /// Classify a file by extension, falling back to its first bytes
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<ScreenplayFileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if let Some(ext) = path.extension() {
            match ext.to_string_lossy().to_lowercase().as_str() {
                "pdf" => return Ok(ScreenplayFileType::Pdf),
                "fdx" => return Ok(ScreenplayFileType::FinalDraft),
                "fountain" => return Ok(ScreenplayFileType::Fountain),
                "txt" => return Ok(ScreenplayFileType::PlainText),
                _ => {}
            }
        }

        let bytes = Self::read_bytes(path)?;
        if is_pdf(&bytes) {
            return Ok(ScreenplayFileType::Pdf);
        }

        let head = String::from_utf8_lossy(&bytes[..bytes.len().min(4096)]);
        if head.contains("<FinalDraft") {
            return Ok(ScreenplayFileType::FinalDraft);
        }

        Ok(ScreenplayFileType::Unknown)
    }
}

fn has_screenplay_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SCREENPLAY_EXTENSIONS.contains(&ext.as_str()))
}

/// Kinds of input files the tool recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenplayFileType {
    /// PDF export
    Pdf,
    /// Final Draft XML
    FinalDraft,
    /// Fountain markup, parsed as plaintext
    Fountain,
    /// Plain text
    PlainText,
    /// Unknown file type
    Unknown,
}

impl ScreenplayFileType {
    /// Parser dialect for this file type; `None` lets the parser sniff the content
    pub fn format(&self) -> Option<ScreenplayFormat> {
        match self {
            Self::Pdf => Some(ScreenplayFormat::Pdf),
            Self::FinalDraft => Some(ScreenplayFormat::Fdx),
            Self::Fountain | Self::PlainText => Some(ScreenplayFormat::Text),
            Self::Unknown => None,
        }
    }
}
