/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;

use crate::common;
use scriptbreak::file_utils::{FileManager, ScreenplayFileType};
use scriptbreak::screenplay::model::ScreenplayFormat;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "script.txt", "INT. ROOM - DAY")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));

    Ok(())
}

/// Test that generate_output_path creates the correct path
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let output_path = FileManager::generate_output_path(Path::new("/tmp/in/pilot.pdf"), Path::new("/tmp/out"), "scenes");
    assert_eq!(output_path, Path::new("/tmp/out/pilot.scenes.json"));
}

/// Test that file types map to the expected parser dialects
#[test]
fn test_detect_file_type_withKnownExtensions_shouldMapToFormats() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let fdx = common::create_test_file(temp_dir.path(), "pilot.fdx", &common::fdx_document(&[]))?;
    let txt = common::create_test_screenplay(temp_dir.path(), "pilot.txt")?;
    let other = common::create_test_file(temp_dir.path(), "pilot.dat", "plain words")?;

    assert_eq!(FileManager::detect_file_type(&fdx)?.format(), Some(ScreenplayFormat::Fdx));
    assert_eq!(FileManager::detect_file_type(&txt)?.format(), Some(ScreenplayFormat::Text));
    assert_eq!(FileManager::detect_file_type(&other)?, ScreenplayFileType::Unknown);
    assert!(FileManager::detect_file_type(temp_dir.path().join("missing.pdf")).is_err());

    Ok(())
}

/// Test recursive discovery of screenplay files
#[test]
fn test_find_screenplays_withNestedFolders_shouldFindSupportedFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let season = temp_dir.path().join("season1");
    std::fs::create_dir(&season)?;

    common::create_test_screenplay(&season, "ep1.txt")?;
    common::create_test_file(&season, "ep2.fountain", "INT. ROOM - DAY")?;
    common::create_test_file(temp_dir.path(), "notes.docx", "")?;

    let found = FileManager::find_screenplays(temp_dir.path())?;

    assert_eq!(found.len(), 2);
    assert!(found[0].ends_with("season1/ep1.txt"));
    assert!(found[1].ends_with("season1/ep2.fountain"));

    Ok(())
}
