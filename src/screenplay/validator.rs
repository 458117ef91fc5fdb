/*!
 * Post-parse validation.
 *
 * Runs once over the assembled scene sequence. Scenes too short to carry
 * story content are dropped; an empty result is fatal; a low scene count
 * and duplicate numbers are advisory warnings.
 */

use log::warn;

use super::model::{duplicate_scene_numbers, ParseWarning, Scene};
use crate::app_config::ParserConfig;
use crate::errors::ParseError;

/// Scenes that survived validation plus the advisories found on the way
#[derive(Debug, Clone)]
pub struct ValidatedScenes {
    pub scenes: Vec<Scene>,
    pub warnings: Vec<ParseWarning>,
}

/// Whether a scene body meets the minimum content floor.
pub fn has_minimum_content(scene: &Scene, min_chars: usize) -> bool {
    scene.content_chars() >= min_chars
}

/// Validate a full scene sequence. Order is preserved.
pub fn validate_scenes(scenes: Vec<Scene>, config: &ParserConfig) -> Result<ValidatedScenes, ParseError> {
    let mut warnings = Vec::new();
    let mut kept = Vec::with_capacity(scenes.len());

    for scene in scenes {
        if has_minimum_content(&scene, config.min_scene_content_chars) {
            kept.push(scene);
            continue;
        }

        let content_chars = scene.content_chars();
        warn!(
            "Dropping scene {} ('{}'): {} character(s) of content",
            scene.number, scene.header, content_chars
        );
        warnings.push(ParseWarning::SceneDropped {
            ordinal: scene.ordinal,
            number: scene.number,
            content_chars,
        });
    }

    if kept.is_empty() {
        return Err(ParseError::NoScenes);
    }

    if kept.len() < config.low_scene_count {
        warn!(
            "Only {} scene(s) detected, unusually low for a feature-length script",
            kept.len()
        );
        warnings.push(ParseWarning::LowSceneCount {
            count: kept.len(),
            minimum: config.low_scene_count,
        });
    }

    warnings.extend(duplicate_number_warnings(&kept));

    Ok(ValidatedScenes {
        scenes: kept,
        warnings,
    })
}

/// One warning per scene number used more than once, in number order.
pub fn duplicate_number_warnings(scenes: &[Scene]) -> Vec<ParseWarning> {
    duplicate_scene_numbers(scenes)
        .into_iter()
        .map(|(number, occurrences)| {
            warn!("Scene number {} appears {} times", number, occurrences);
            ParseWarning::DuplicateSceneNumber {
                number,
                occurrences,
            }
        })
        .collect()
}
