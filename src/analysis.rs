/*!
 * Hand-off types for per-scene analysis.
 *
 * Analysis itself runs elsewhere. This module only fixes the request shape
 * the analysis collaborator consumes, one request per scene, and carries its
 * response back without interpreting it.
 */

use serde::{Deserialize, Serialize};

use crate::screenplay::model::Scene;

/// One scene, ready to be sent for breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneAnalysisRequest {
    /// Header line followed by the scene body
    pub scene_text: String,
    pub scene_number: u32,
    /// Number of scenes in the whole document
    pub total_scenes: usize,
}

impl SceneAnalysisRequest {
    /// Build the request for `scene` out of `total_scenes`.
    pub fn for_scene(scene: &Scene, total_scenes: usize) -> Self {
        let scene_text = if scene.content.is_empty() {
            scene.header.clone()
        } else {
            format!("{}\n\n{}", scene.header, scene.content)
        };

        Self {
            scene_text,
            scene_number: scene.number,
            total_scenes,
        }
    }
}

/// Breakdown returned for one scene; the payload is opaque here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneAnalysisResponse {
    pub scene_number: u32,
    pub breakdown: serde_json::Value,
}
