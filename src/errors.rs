/*!
 * Error types for the scriptbreak application.
 *
 * `ParseError` covers every fatal condition of a single parse call. All of
 * them abort the parse; none are retried. Advisory conditions are not errors
 * and travel as `ParseWarning`s on the parsed result instead.
 */

use thiserror::Error;

/// Fatal conditions raised while parsing a screenplay
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Input was empty or whitespace only
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input is below the minimum length floor
    #[error("Input is too short to be a screenplay ({length} characters, minimum {minimum})")]
    TooShort {
        /// Length of the trimmed input in characters
        length: usize,
        /// Configured floor
        minimum: usize,
    },

    /// The PDF has no pages at all
    #[error("The PDF document contains no pages")]
    PdfEmptyDocument,

    /// The PDF has pages but no usable text, usually a scanned image
    #[error("No extractable text found in the PDF (it may be a scanned image): {0}")]
    PdfNoExtractableText(String),

    /// The glyph-extraction collaborator could not open the document
    #[error("Failed to load PDF: {0}")]
    PdfLoadFailure(String),

    /// The XML could not be tokenized
    #[error("Malformed XML: {0}")]
    XmlMalformed(String),

    /// The XML root element is not the export dialect's root
    #[error("Invalid Final Draft file: expected <FinalDraft> root, found {0}")]
    XmlInvalidRoot(String),

    /// The export has no top-level <Content> element
    #[error("Invalid Final Draft file: missing <Content> section")]
    XmlMissingContent,

    /// The <Content> element holds no paragraphs
    #[error("Final Draft file contains no paragraphs")]
    XmlNoParagraphs,

    /// Paragraphs exist but none is a scene heading
    #[error("Final Draft file contains no scene headings")]
    XmlNoSceneHeadings,

    /// Headings exist but every scene is empty
    #[error("Final Draft file contains scene headings but no scene has content")]
    XmlNoValidScenes,

    /// Plaintext scan found no recognizable scene header
    #[error("No scene headers found. Expected lines such as 'INT. KITCHEN - DAY'")]
    NoHeadersFound,

    /// Nothing survived validation
    #[error("No scenes with content were found")]
    NoScenes,
}

impl ParseError {
    /// True for the PDF conditions where another format is the practical remedy
    pub fn is_pdf_text_problem(&self) -> bool {
        matches!(self, Self::PdfEmptyDocument | Self::PdfNoExtractableText(_))
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from screenplay parsing
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
