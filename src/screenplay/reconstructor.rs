/*!
 * Rebuilds reading-order text from positioned PDF fragments.
 *
 * Content streams paint text in whatever order the producing application
 * chose. Sorting by baseline (top of page first) and then by horizontal
 * position recovers the printed line order.
 */

use log::{debug, info};

use super::model::TextFragment;
use super::normalizer::normalize;
use crate::app_config::ParserConfig;
use crate::errors::ParseError;
use crate::glyph_source::GlyphSource;

/// Lay out one page's fragments as newline-delimited text.
///
/// A new line starts whenever the baseline moves by more than `line_gap`.
/// Fragments on the same line are separated by a single space.
pub fn reconstruct_page(fragments: &[TextFragment], line_gap: f32) -> String {
    let mut ordered: Vec<&TextFragment> = fragments.iter().collect();
    ordered.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut page = String::new();
    let mut previous_y: Option<f32> = None;

    for fragment in ordered {
        if let Some(y) = previous_y {
            if (fragment.y - y).abs() > line_gap {
                page.push('\n');
            }
        }
        page.push_str(&fragment.text);
        page.push(' ');
        previous_y = Some(fragment.y);
    }

    page
}

/// Join reconstructed pages and normalize the result.
pub fn reconstruct_document(pages: &[Vec<TextFragment>], config: &ParserConfig) -> Result<String, ParseError> {
    if pages.is_empty() {
        return Err(ParseError::PdfEmptyDocument);
    }

    let fragment_count: usize = pages.iter().map(Vec::len).sum();
    if fragment_count == 0 {
        return Err(ParseError::PdfNoExtractableText(format!(
            "{} page(s) contain no text",
            pages.len()
        )));
    }

    let joined = pages
        .iter()
        .map(|page| reconstruct_page(page, config.line_gap_threshold))
        .collect::<Vec<_>>()
        .join("\n\n");

    let text = normalize(&joined, config);
    let length = text.chars().count();
    if length < config.min_pdf_text_chars {
        return Err(ParseError::PdfNoExtractableText(format!(
            "only {} character(s) of text across {} page(s)",
            length,
            pages.len()
        )));
    }

    debug!(
        "Reconstructed {} character(s) from {} fragment(s)",
        length, fragment_count
    );
    Ok(text)
}

/// Open a PDF through `source` and rebuild its text.
pub async fn extract_text(
    source: &dyn GlyphSource,
    bytes: &[u8],
    config: &ParserConfig,
) -> Result<String, ParseError> {
    let document = source.open(bytes).await?;

    let page_count = document.page_count();
    if page_count == 0 {
        return Err(ParseError::PdfEmptyDocument);
    }
    info!("Extracting text from {} PDF page(s)", page_count);

    let pages = (0..page_count)
        .map(|index| document.page_fragments(index))
        .collect::<Result<Vec<_>, _>>()?;

    reconstruct_document(&pages, config)
}
