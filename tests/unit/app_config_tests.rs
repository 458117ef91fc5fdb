/*!
 * Tests for application configuration functionality
 */

use anyhow::{Context, Result};

use crate::common;
use scriptbreak::app_config::{
    Config, LogLevel, DEFAULT_LINE_GAP_THRESHOLD, DEFAULT_LOW_SCENE_COUNT, DEFAULT_MIN_SCENE_CONTENT_CHARS,
    DEFAULT_SPACE_RATIO_THRESHOLD,
};
use scriptbreak::app_controller::exit_code_for;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.parser.space_ratio_threshold, DEFAULT_SPACE_RATIO_THRESHOLD);
    assert_eq!(config.parser.line_gap_threshold, DEFAULT_LINE_GAP_THRESHOLD);
    assert_eq!(config.parser.min_scene_content_chars, DEFAULT_MIN_SCENE_CONTENT_CHARS);
    assert_eq!(config.parser.low_scene_count, DEFAULT_LOW_SCENE_COUNT);
    assert!(config.output.pretty_json);
    assert!(!config.output.write_analysis_requests);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration round trip through the JSON file format
#[test]
fn test_config_serialization_shouldRoundTrip() {
    let mut config = Config::default();
    config.parser.min_scene_content_chars = 30;
    config.output.write_analysis_requests = true;
    config.log_level = LogLevel::Debug;

    let json = serde_json::to_string_pretty(&config).unwrap();
    assert!(json.contains("\"log_level\": \"debug\""));

    let restored: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.parser, config.parser);
    assert_eq!(restored.output, config.output);
    assert_eq!(restored.log_level, LogLevel::Debug);
}

/// Test that an empty file yields a complete default configuration
#[test]
fn test_config_fromEmptyObject_shouldUseDefaults() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.parser, Config::default().parser);
}

#[test]
fn test_logLevel_toLevelFilter_shouldMapAllLevels() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}

#[test]
fn test_fromJson_withInvalidConfig_shouldMapToConfigExitCode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let bad_range = common::create_test_file(
        temp_dir.path(),
        "bad.json",
        r#"{ "parser": { "space_ratio_threshold": 1.5 } }"#,
    )?;
    let malformed = common::create_test_file(temp_dir.path(), "broken.json", "{ \"parser\": [")?;

    for path in [bad_range, malformed] {
        let contents = std::fs::read_to_string(&path)?;
        let error = Config::from_json(&contents)
            .context(format!("Failed to load config file: {}", path.display()))
            .unwrap_err();

        assert_eq!(exit_code_for(&error), 5, "config file {:?}", path);
    }

    Ok(())
}
