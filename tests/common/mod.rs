/*!
 * Common test utilities for the scriptbreak test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use scriptbreak::screenplay::model::TextFragment;

/// Route library logs through the test harness; safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A short plaintext screenplay with a title page and three scenes
pub fn sample_screenplay() -> String {
    r#"THE NIGHT SHIFT

Written by
Alex Moreno

Draft 3 - 03/14/2024
alex@example.com

INT. DINER - NIGHT

Neon hums over empty booths. RITA wipes the counter.

RITA
Kitchen closes in five.

EXT. PARKING LOT - NIGHT

Rain drums on a lone pickup truck.

INT. PICKUP TRUCK - CONTINUOUS

Rita slides behind the wheel and exhales.
"#
    .to_string()
}

/// Writes the sample screenplay as a `.txt` file
pub fn create_test_screenplay(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, &sample_screenplay())
}

/// A minimal Final Draft export built from `(type, text)` paragraphs
pub fn fdx_document(paragraphs: &[(&str, &str)]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|(kind, text)| format!("    <Paragraph Type=\"{}\"><Text>{}</Text></Paragraph>\n", kind, text))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="no" ?>
<FinalDraft DocumentType="Script" Template="No" Version="5">
  <Content>
{}  </Content>
  <TitlePage>
    <Content>
      <Paragraph Type="Text"><Text>HARBOR LIGHTS</Text></Paragraph>
    </Content>
  </TitlePage>
</FinalDraft>
"#,
        body
    )
}

/// Fragments of one page, listed top to bottom and left to right
pub fn sample_page() -> Vec<TextFragment> {
    vec![
        TextFragment::new("1", 40.0, 720.0),
        TextFragment::new("INT. BASEMENT - NIGHT", 72.0, 720.0),
        TextFragment::new("1", 540.0, 720.0),
        TextFragment::new("A single bulb swings over a workbench.", 72.0, 696.0),
        TextFragment::new("Tools hang in careful rows.", 72.0, 684.0),
        TextFragment::new("2", 40.0, 660.0),
        TextFragment::new("EXT. BACKYARD - DAY", 72.0, 660.0),
        TextFragment::new("2", 540.0, 660.0),
        TextFragment::new("Children chase a dog across the wet lawn.", 72.0, 636.0),
    ]
}
