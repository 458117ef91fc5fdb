/*!
 * Positioned text extraction from PDF documents.
 *
 * The parser never reads PDF internals itself. It asks a `GlyphSource` for a
 * document handle once per parse and then pulls positioned fragments page
 * by page. `LopdfGlyphSource` is the default engine; `StaticGlyphSource`
 * serves fragments that were extracted elsewhere.
 */

use async_trait::async_trait;
use log::{debug, trace};
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use std::fmt::Debug;

use crate::errors::ParseError;
use crate::screenplay::model::TextFragment;

/// Text-space adjustment (thousandths of an em) in a `TJ` array that reads as a word gap
const TJ_WORD_GAP: f32 = 200.0;

/// Leading assumed until a `TL` operator sets one
const DEFAULT_LEADING: f32 = 12.0;

/// Producer of positioned text for PDF documents
///
/// Implementations may do expensive work in `open`; it is called exactly
/// once per parse and is the only awaited step of the PDF path.
#[async_trait]
pub trait GlyphSource: Send + Sync + Debug {
    /// Open a document from its raw bytes
    ///
    /// # Returns
    /// * `Result<Box<dyn GlyphDocument>, ParseError>` - A handle over the loaded pages, or `PdfLoadFailure`
    async fn open(&self, bytes: &[u8]) -> Result<Box<dyn GlyphDocument>, ParseError>;
}

/// A loaded document that yields fragments one page at a time
pub trait GlyphDocument: Send {
    /// Number of pages
    fn page_count(&self) -> usize;

    /// Positioned fragments of the zero-based page `index`, in stream order
    fn page_fragments(&self, index: usize) -> Result<Vec<TextFragment>, ParseError>;
}

/// Glyph source backed by `lopdf`
#[derive(Debug, Default, Clone)]
pub struct LopdfGlyphSource;

impl LopdfGlyphSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GlyphSource for LopdfGlyphSource {
    async fn open(&self, bytes: &[u8]) -> Result<Box<dyn GlyphDocument>, ParseError> {
        let owned = bytes.to_vec();

        let document = tokio::task::spawn_blocking(move || Document::load_mem(&owned))
            .await
            .map_err(|e| ParseError::PdfLoadFailure(format!("PDF loader task failed: {}", e)))?
            .map_err(|e| ParseError::PdfLoadFailure(e.to_string()))?;

        let pages: Vec<ObjectId> = document.get_pages().into_values().collect();
        debug!("Loaded PDF with {} page(s)", pages.len());

        Ok(Box::new(LopdfGlyphDocument { document, pages }))
    }
}

/// A document loaded by `lopdf`
pub struct LopdfGlyphDocument {
    document: Document,
    pages: Vec<ObjectId>,
}

impl GlyphDocument for LopdfGlyphDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_fragments(&self, index: usize) -> Result<Vec<TextFragment>, ParseError> {
        let page_id = *self.pages.get(index).ok_or_else(|| {
            ParseError::PdfLoadFailure(format!("page {} out of range ({} pages)", index + 1, self.pages.len()))
        })?;

        let raw = self
            .document
            .get_page_content(page_id)
            .map_err(|e| ParseError::PdfLoadFailure(format!("page {}: {}", index + 1, e)))?;

        let content = Content::decode(&raw)
            .map_err(|e| ParseError::PdfLoadFailure(format!("page {} content stream: {}", index + 1, e)))?;

        let fragments = fragments_from_operations(&content);
        trace!("Page {}: {} fragment(s)", index + 1, fragments.len());
        Ok(fragments)
    }
}

/// Text and line matrices of one text object
#[derive(Debug, Clone, Copy)]
struct TextState {
    matrix: [f32; 6],
    line_matrix: [f32; 6],
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: IDENTITY,
            line_matrix: IDENTITY,
            leading: DEFAULT_LEADING,
        }
    }
}

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

impl TextState {
    fn begin(&mut self) {
        self.matrix = IDENTITY;
        self.line_matrix = IDENTITY;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        let [a, b, c, d, e, f] = self.line_matrix;
        self.line_matrix = [a, b, c, d, e + tx * a + ty * c, f + tx * b + ty * d];
        self.matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn set_matrix(&mut self, values: [f32; 6]) {
        self.matrix = values;
        self.line_matrix = values;
    }

    fn position(&self) -> (f32, f32) {
        (self.matrix[4], self.matrix[5])
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn operand(operands: &[Object], index: usize) -> f32 {
    operands.get(index).and_then(number).unwrap_or(0.0)
}

/// Walk a content stream and emit one fragment per text-showing operation.
fn fragments_from_operations(content: &Content) -> Vec<TextFragment> {
    let mut fragments = Vec::new();
    let mut state = TextState::default();

    for op in &content.operations {
        let operands = op.operands.as_slice();

        let shown = match op.operator.as_str() {
            "BT" => {
                state.begin();
                None
            }
            "TL" => {
                state.leading = operand(operands, 0);
                None
            }
            "Td" => {
                state.move_line(operand(operands, 0), operand(operands, 1));
                None
            }
            "TD" => {
                state.leading = -operand(operands, 1);
                state.move_line(operand(operands, 0), operand(operands, 1));
                None
            }
            "Tm" if operands.len() >= 6 => {
                state.set_matrix([
                    operand(operands, 0),
                    operand(operands, 1),
                    operand(operands, 2),
                    operand(operands, 3),
                    operand(operands, 4),
                    operand(operands, 5),
                ]);
                None
            }
            "T*" => {
                state.next_line();
                None
            }
            "Tj" => operands.first().and_then(string_operand),
            "TJ" => operands.first().map(array_operand),
            "'" => {
                state.next_line();
                operands.first().and_then(string_operand)
            }
            "\"" => {
                state.next_line();
                operands.get(2).and_then(string_operand)
            }
            _ => None,
        };

        if let Some(text) = shown {
            if !text.trim().is_empty() {
                let (x, y) = state.position();
                fragments.push(TextFragment::new(text, x, y));
            }
        }
    }

    fragments
}

fn string_operand(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// Concatenate the strings of a `TJ` array, turning wide gaps into spaces.
fn array_operand(obj: &Object) -> String {
    let mut combined = String::new();

    if let Object::Array(items) = obj {
        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&decode_pdf_string(bytes)),
                other => {
                    let gap = number(other).map(|n| -n).unwrap_or(0.0);
                    if gap > TJ_WORD_GAP && !combined.is_empty() && !combined.ends_with(' ') {
                        combined.push(' ');
                    }
                }
            }
        }
    }

    combined
}

/// Decode a PDF string without font tables: UTF-16BE with BOM, UTF-8, then Latin-1.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Serves pages that were extracted ahead of time
#[derive(Debug, Clone, Default)]
pub struct StaticGlyphSource {
    pages: Vec<Vec<TextFragment>>,
}

impl StaticGlyphSource {
    pub fn new(pages: Vec<Vec<TextFragment>>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl GlyphSource for StaticGlyphSource {
    async fn open(&self, _bytes: &[u8]) -> Result<Box<dyn GlyphDocument>, ParseError> {
        Ok(Box::new(StaticGlyphDocument {
            pages: self.pages.clone(),
        }))
    }
}

struct StaticGlyphDocument {
    pages: Vec<Vec<TextFragment>>,
}

impl GlyphDocument for StaticGlyphDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_fragments(&self, index: usize) -> Result<Vec<TextFragment>, ParseError> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| ParseError::PdfLoadFailure(format!("page {} out of range", index + 1)))
    }
}
