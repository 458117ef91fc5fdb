/*!
 * Final Draft XML (`.fdx`) reader and scene segmenter.
 *
 * The export dialect tags every paragraph with a `Type` attribute, so scene
 * boundaries come from the markup rather than from pattern matching. Body
 * paragraphs live directly under `FinalDraft/Content`; title-page paragraphs
 * under `FinalDraft/TitlePage/Content` are collected separately and only
 * used to find the title.
 */

use log::{debug, trace};
use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;

use super::matcher::match_header;
use super::model::{ParagraphElement, ParagraphKind, Scene};
use super::numbering::{build_header, build_keywordless_header, NumberResolver};
use super::validator::has_minimum_content;
use crate::app_config::ParserConfig;
use crate::errors::ParseError;

const ROOT_ELEMENT: &[u8] = b"FinalDraft";
const CONTENT_ELEMENT: &[u8] = b"Content";
const TITLE_PAGE_ELEMENT: &[u8] = b"TitlePage";
const PARAGRAPH_ELEMENT: &[u8] = b"Paragraph";
const TEXT_ELEMENT: &[u8] = b"Text";

/// Structural markers that are typed as paragraphs but carry no story content
static NON_CONTENT_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:TITLE CARD:?|(?:PART|ACT|CHAPTER) (?:ONE|TWO|THREE|FOUR|FIVE|SIX|SEVEN|EIGHT|NINE|TEN|[IVX]+|\d+)|END OF (?:ACT|PART)\b.*|FADE IN:?|FADE OUT\.?|FADE TO BLACK\.?|THE END|\(MORE\)|\(CONT'D\)|CONTINUED:?)$",
    )
    .expect("Invalid non-content marker regex")
});

/// Paragraphs read from an export, split by where they appeared
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FdxDocument {
    /// Paragraphs of the script body, in document order
    pub paragraphs: Vec<ParagraphElement>,
    /// Non-empty text lines of the title page
    pub title_page: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Body,
    TitlePage,
}

/// A paragraph under construction. Dual dialogue nests paragraphs, hence a stack.
#[derive(Debug)]
struct ParagraphBuilder {
    section: Section,
    kind: ParagraphKind,
    number: Option<String>,
    text: String,
}

impl ParagraphBuilder {
    fn from_start(e: &BytesStart, section: Section) -> Result<Self, ParseError> {
        Ok(Self {
            section,
            kind: attribute(e, "Type")?
                .map(|value| ParagraphKind::from_type_attr(&value))
                .unwrap_or(ParagraphKind::Other),
            number: attribute(e, "Number")?,
            text: String::new(),
        })
    }

    fn finish(self, document: &mut FdxDocument) {
        let text = self.text.trim();
        match self.section {
            Section::Body => document.paragraphs.push(ParagraphElement {
                kind: self.kind,
                text: text.to_string(),
                number: self.number,
            }),
            Section::TitlePage => {
                if !text.is_empty() {
                    document.title_page.push(text.to_string());
                }
            }
        }
    }
}

fn attribute(e: &BytesStart, name: &str) -> Result<Option<String>, ParseError> {
    let attr = e
        .try_get_attribute(name)
        .map_err(|err| ParseError::XmlMalformed(err.to_string()))?;

    match attr {
        Some(attr) => attr
            .unescape_value()
            .map(|value| Some(value.into_owned()))
            .map_err(|err| ParseError::XmlMalformed(err.to_string())),
        None => Ok(None),
    }
}

/// Which section a paragraph opened under `path` belongs to, if any.
fn section_for(path: &[Vec<u8>]) -> Option<Section> {
    match path {
        [root, content, ..] if root == ROOT_ELEMENT && content == CONTENT_ELEMENT => Some(Section::Body),
        [root, title, content, ..]
            if root == ROOT_ELEMENT && title == TITLE_PAGE_ELEMENT && content == CONTENT_ELEMENT =>
        {
            Some(Section::TitlePage)
        }
        _ => None,
    }
}

/// Read body and title-page paragraphs from an export document.
pub fn read_paragraphs(xml: &str) -> Result<FdxDocument, ParseError> {
    let mut reader = Reader::from_str(xml);

    let mut document = FdxDocument::default();
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut open: Vec<ParagraphBuilder> = Vec::new();
    let mut seen_root = false;
    let mut seen_content = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name().as_ref().to_vec();
                check_root(&mut seen_root, &name)?;

                if path.len() == 1 && name == CONTENT_ELEMENT {
                    seen_content = true;
                }
                if name == PARAGRAPH_ELEMENT {
                    if let Some(section) = section_for(&path) {
                        open.push(ParagraphBuilder::from_start(&e, section)?);
                    }
                }
                path.push(name);
            }
            Ok(Event::Empty(e)) => {
                let name = e.name().as_ref().to_vec();
                check_root(&mut seen_root, &name)?;

                if path.len() == 1 && name == CONTENT_ELEMENT {
                    seen_content = true;
                }
                if name == PARAGRAPH_ELEMENT {
                    if let Some(section) = section_for(&path) {
                        ParagraphBuilder::from_start(&e, section)?.finish(&mut document);
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if in_text_run(&path) {
                    let text = t
                        .unescape()
                        .map_err(|err| ParseError::XmlMalformed(err.to_string()))?;
                    if let Some(builder) = open.last_mut() {
                        builder.text.push_str(&text);
                    }
                }
            }
            Ok(Event::CData(t)) => {
                if in_text_run(&path) {
                    if let Some(builder) = open.last_mut() {
                        builder.text.push_str(&String::from_utf8_lossy(&t));
                    }
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == PARAGRAPH_ELEMENT {
                    path.pop();
                    if section_for(&path).is_some() {
                        if let Some(builder) = open.pop() {
                            builder.finish(&mut document);
                        }
                    }
                    continue;
                }
                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::XmlMalformed(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if !seen_root {
        return Err(ParseError::XmlInvalidRoot("no root element".to_string()));
    }
    if !seen_content {
        return Err(ParseError::XmlMissingContent);
    }

    debug!(
        "Read {} body paragraph(s) and {} title page line(s)",
        document.paragraphs.len(),
        document.title_page.len()
    );

    Ok(document)
}

fn check_root(seen_root: &mut bool, name: &[u8]) -> Result<(), ParseError> {
    if *seen_root {
        return Ok(());
    }
    if name != ROOT_ELEMENT {
        return Err(ParseError::XmlInvalidRoot(String::from_utf8_lossy(name).into_owned()));
    }
    *seen_root = true;
    Ok(())
}

fn in_text_run(path: &[Vec<u8>]) -> bool {
    path.last().is_some_and(|name| name == TEXT_ELEMENT)
}

/// Whether a paragraph is a structural marker such as `FADE IN:` or `END OF ACT ONE`.
pub fn is_non_content_marker(text: &str) -> bool {
    NON_CONTENT_MARKER.is_match(text.trim())
}

/// Leading digits of a `Number` attribute: `"12"`, `"12A"` -> 12
fn attribute_number(number: Option<&str>) -> Option<u32> {
    let digits: String = number?.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Build scenes from typed paragraphs.
///
/// Every heading opens a scene; content paragraphs append one line each to
/// the open scene. Short scenes are returned as-is so the validator can
/// report them, but at least one scene must meet the content floor.
pub fn segment(paragraphs: &[ParagraphElement], config: &ParserConfig) -> Result<Vec<Scene>, ParseError> {
    if paragraphs.is_empty() {
        return Err(ParseError::XmlNoParagraphs);
    }

    let has_heading = paragraphs.iter().any(|p| {
        p.kind == ParagraphKind::Heading && !p.text.trim().is_empty() && !is_non_content_marker(&p.text)
    });
    if !has_heading {
        return Err(ParseError::XmlNoSceneHeadings);
    }

    let mut resolver = NumberResolver::new();
    let mut scenes = Vec::new();
    let mut current: Option<Scene> = None;

    for paragraph in paragraphs {
        let text = paragraph.text.trim();
        if text.is_empty() {
            continue;
        }
        if is_non_content_marker(text) {
            trace!("Skipping marker paragraph '{}'", text);
            continue;
        }

        match paragraph.kind {
            ParagraphKind::Heading => {
                if let Some(scene) = current.take() {
                    scenes.push(scene.finalize());
                }

                let attr_number = attribute_number(paragraph.number.as_deref());
                let header = match match_header(text) {
                    Some(mut matched) => {
                        if matched.leading_number.is_none() {
                            matched.leading_number = attr_number;
                        }
                        build_header(text, &matched, &mut resolver)
                    }
                    None => {
                        debug!("Heading without INT/EXT keyword: '{}'", text);
                        build_keywordless_header(text, attr_number, &mut resolver)
                    }
                };

                current = Some(Scene::open(header, scenes.len()));
            }
            kind if kind.is_content() => match current.as_mut() {
                Some(scene) => scene.push_line(text),
                None => debug!("Ignoring paragraph before first heading: '{}'", text),
            },
            _ => trace!("Ignoring {:?} paragraph", paragraph.kind),
        }
    }

    if let Some(scene) = current.take() {
        scenes.push(scene.finalize());
    }

    if !scenes
        .iter()
        .any(|scene| has_minimum_content(scene, config.min_scene_content_chars))
    {
        return Err(ParseError::XmlNoValidScenes);
    }

    debug!(
        "Segmented {} scene(s) from {} paragraph(s), {} number collision(s)",
        scenes.len(),
        paragraphs.len(),
        resolver.collisions()
    );

    Ok(scenes)
}
