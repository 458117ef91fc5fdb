// @module: Input dialect detection

use super::model::ScreenplayFormat;

/// XML declaration token
const XML_DECLARATION: &str = "<?xml";

/// Root element marker of the export dialect
const FDX_ROOT_MARKER: &str = "<FinalDraft";

/// PDF file signature
const PDF_MAGIC: &[u8] = b"%PDF-";

/// How far into a buffer the PDF signature may appear
const PDF_MAGIC_WINDOW: usize = 1024;

// @returns: Fdx when both the XML declaration and the export root are present
pub fn detect_format(text: &str) -> ScreenplayFormat {
    if text.contains(XML_DECLARATION) && text.contains(FDX_ROOT_MARKER) {
        ScreenplayFormat::Fdx
    } else {
        ScreenplayFormat::Text
    }
}

// @returns: Pdf for a PDF signature, otherwise the text classification
pub fn detect_bytes(bytes: &[u8]) -> ScreenplayFormat {
    if is_pdf(bytes) {
        return ScreenplayFormat::Pdf;
    }

    detect_format(&String::from_utf8_lossy(bytes))
}

// @checks: PDF signature near the start of the buffer
pub fn is_pdf(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(PDF_MAGIC_WINDOW)];
    window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}
