/*!
 * Core data model for parsed screenplays.
 *
 * These types are JSON-serializable with camelCase keys so the parsed
 * document can be handed as-is to the analysis and storage layers.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::analysis::SceneAnalysisRequest;

/// Title used when no title could be extracted.
pub const UNTITLED: &str = "Untitled Screenplay";

/// A positioned glyph run from one PDF page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    /// Text of the run
    pub text: String,
    /// Horizontal position
    pub x: f32,
    /// Vertical baseline position (grows upwards)
    pub y: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }
}

/// Paragraph type vocabulary of the XML export dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphKind {
    Heading,
    Action,
    Character,
    Dialogue,
    Parenthetical,
    Other,
}

impl ParagraphKind {
    /// Map a `Type` attribute value to a kind.
    pub fn from_type_attr(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "scene heading" => Self::Heading,
            "action" => Self::Action,
            "character" => Self::Character,
            "dialogue" => Self::Dialogue,
            "parenthetical" => Self::Parenthetical,
            _ => Self::Other,
        }
    }

    /// Whether paragraphs of this kind contribute to scene content.
    pub fn is_content(&self) -> bool {
        matches!(
            self,
            Self::Action | Self::Character | Self::Dialogue | Self::Parenthetical
        )
    }
}

/// One paragraph of the XML export dialect.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphElement {
    pub kind: ParagraphKind,
    pub text: String,
    /// Value of the paragraph's `Number` attribute, when present
    pub number: Option<String>,
}

impl ParagraphElement {
    pub fn new(kind: ParagraphKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            number: None,
        }
    }
}

/// Interior/exterior classification of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntExt {
    #[serde(rename = "INT")]
    Interior,
    #[serde(rename = "EXT")]
    Exterior,
    #[serde(rename = "INT/EXT")]
    InteriorExterior,
}

impl IntExt {
    /// Parse a header keyword such as `INT.`, `EXT`, `I/E` or `INT./EXT.`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let cleaned: String = keyword
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '.')
            .collect::<String>()
            .to_ascii_uppercase();

        match cleaned.as_str() {
            "INT" => Some(Self::Interior),
            "EXT" => Some(Self::Exterior),
            "INT/EXT" | "EXT/INT" | "I/E" => Some(Self::InteriorExterior),
            _ => None,
        }
    }

    /// Canonical display keyword, with trailing period.
    pub fn display_keyword(&self) -> &'static str {
        match self {
            Self::Interior => "INT.",
            Self::Exterior => "EXT.",
            Self::InteriorExterior => "INT./EXT.",
        }
    }
}

impl fmt::Display for IntExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Interior => "INT",
            Self::Exterior => "EXT",
            Self::InteriorExterior => "INT/EXT",
        };
        write!(f, "{}", label)
    }
}

/// Structural fields parsed from a scene header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderFields {
    /// Absent only for export-dialect headings written without a keyword
    pub int_ext: Option<IntExt>,
    pub location: String,
    pub time_of_day: Option<String>,
}

/// A resolved scene header.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneHeader {
    /// The matched source line
    pub raw: String,
    /// Cleaned display form
    pub display: String,
    /// Resolved scene number
    pub number: u32,
    /// Parsed structural fields
    pub fields: HeaderFields,
}

/// One scene of a parsed screenplay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Scene number, not necessarily unique or contiguous
    pub number: u32,
    /// Cleaned header for display
    pub header: String,
    /// Header exactly as it appeared in the source
    pub original_header: String,
    /// Structural header fields
    pub header_parsed: HeaderFields,
    /// Scene body
    pub content: String,
    /// Zero-based position in source order
    pub ordinal: usize,
}

impl Scene {
    /// Open a scene from its header with an empty body.
    pub fn open(header: SceneHeader, ordinal: usize) -> Self {
        Self {
            number: header.number,
            header: header.display,
            original_header: header.raw,
            header_parsed: header.fields,
            content: String::new(),
            ordinal,
        }
    }

    /// Append one source line to the body.
    pub fn push_line(&mut self, line: &str) {
        self.content.push_str(line);
        self.content.push('\n');
    }

    /// Trim the accumulated body; called once when the scene is closed.
    pub fn finalize(mut self) -> Self {
        self.content = self.content.trim().to_string();
        self
    }

    /// Body length in characters
    pub fn content_chars(&self) -> usize {
        self.content.trim().chars().count()
    }
}

/// Input dialect a document was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenplayFormat {
    Text,
    Pdf,
    Fdx,
}

impl fmt::Display for ScreenplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Pdf => write!(f, "pdf"),
            Self::Fdx => write!(f, "fdx"),
        }
    }
}

impl std::str::FromStr for ScreenplayFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "plaintext" => Ok(Self::Text),
            "pdf" => Ok(Self::Pdf),
            "fdx" | "xml" => Ok(Self::Fdx),
            _ => Err(anyhow::anyhow!("Invalid screenplay format: {}", s)),
        }
    }
}

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenplayMetadata {
    pub total_scenes: usize,
    pub format: ScreenplayFormat,
    pub parse_date: DateTime<Utc>,
}

/// Advisory conditions found while parsing. None of these abort a parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParseWarning {
    /// More than one retained scene carries this number
    DuplicateSceneNumber { number: u32, occurrences: usize },
    /// Unusually few scenes for a feature-length document
    LowSceneCount { count: usize, minimum: usize },
    /// A scene was removed because its body was too short
    SceneDropped {
        ordinal: usize,
        number: u32,
        content_chars: usize,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateSceneNumber {
                number,
                occurrences,
            } => write!(f, "Scene number {} is used by {} scenes", number, occurrences),
            Self::LowSceneCount { count, minimum } => write!(
                f,
                "Only {} scene(s) detected (expected at least {})",
                count, minimum
            ),
            Self::SceneDropped {
                ordinal,
                number,
                content_chars,
            } => write!(
                f,
                "Dropped scene {} at position {}: only {} character(s) of content",
                number, ordinal, content_chars
            ),
        }
    }
}

/// The result of one parse call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedScreenplay {
    pub title: String,
    pub scenes: Vec<Scene>,
    pub metadata: ScreenplayMetadata,
    #[serde(default)]
    pub warnings: Vec<ParseWarning>,
}

impl ParsedScreenplay {
    /// Assemble a result, stamping the parse time.
    pub fn new(
        title: Option<String>,
        scenes: Vec<Scene>,
        format: ScreenplayFormat,
        warnings: Vec<ParseWarning>,
    ) -> Self {
        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        Self {
            title,
            metadata: ScreenplayMetadata {
                total_scenes: scenes.len(),
                format,
                parse_date: Utc::now(),
            },
            scenes,
            warnings,
        }
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Scene numbers used more than once, with their occurrence counts.
    pub fn duplicate_numbers(&self) -> BTreeMap<u32, usize> {
        duplicate_scene_numbers(&self.scenes)
    }

    /// One analysis request per scene, in source order.
    pub fn analysis_requests(&self) -> Vec<SceneAnalysisRequest> {
        self.scenes
            .iter()
            .map(|scene| SceneAnalysisRequest::for_scene(scene, self.scenes.len()))
            .collect()
    }
}

/// Scene numbers carried by more than one scene, in number order.
pub fn duplicate_scene_numbers(scenes: &[Scene]) -> BTreeMap<u32, usize> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for scene in scenes {
        *counts.entry(scene.number).or_insert(0) += 1;
    }
    counts.retain(|_, occurrences| *occurrences > 1);
    counts
}

impl fmt::Display for ParsedScreenplay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Screenplay: {}", self.title)?;
        writeln!(f, "Format: {}", self.metadata.format)?;
        writeln!(f, "Scenes: {}", self.metadata.total_scenes)?;
        writeln!(f, "Warnings: {}", self.warnings.len())?;
        Ok(())
    }
}
