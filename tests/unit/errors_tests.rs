/*!
 * Tests for error types and conversions
 */

use scriptbreak::errors::{AppError, ParseError};

#[test]
fn test_parseError_tooShort_shouldDisplayLengths() {
    let error = ParseError::TooShort { length: 7, minimum: 20 };
    let message = error.to_string();

    assert!(message.contains('7'));
    assert!(message.contains("20"));
}

#[test]
fn test_parseError_xmlInvalidRoot_shouldNameFoundRoot() {
    let error = ParseError::XmlInvalidRoot("Script".to_string());
    assert!(error.to_string().contains("Script"));
}

#[test]
fn test_parseError_isPdfTextProblem_shouldOnlyFlagPdfTextConditions() {
    assert!(ParseError::PdfEmptyDocument.is_pdf_text_problem());
    assert!(ParseError::PdfNoExtractableText("scan".to_string()).is_pdf_text_problem());
    assert!(!ParseError::PdfLoadFailure("bad xref".to_string()).is_pdf_text_problem());
    assert!(!ParseError::NoScenes.is_pdf_text_problem());
}

#[test]
fn test_appError_fromParseError_shouldWrapCorrectly() {
    let app_error: AppError = ParseError::NoHeadersFound.into();

    match app_error {
        AppError::Parse(ParseError::NoHeadersFound) => {}
        other => panic!("Unexpected error variant: {:?}", other),
    }
}

#[test]
fn test_appError_fromIoError_shouldWrapAsFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "script.pdf not found");
    let app_error: AppError = io_error.into();

    match app_error {
        AppError::File(message) => assert!(message.contains("script.pdf")),
        other => panic!("Unexpected error variant: {:?}", other),
    }
}

#[test]
fn test_appError_fromAnyhowError_shouldWrapAsUnknown() {
    let app_error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(app_error, AppError::Unknown(_)));
}
