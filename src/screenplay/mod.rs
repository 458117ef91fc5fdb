/*!
 * Screenplay structure parsing.
 *
 * Three input dialects converge on one `ParsedScreenplay`:
 * - plaintext: normalize, skip front matter, scan lines for headers
 * - PDF: rebuild text from positioned fragments, then the plaintext path
 * - Final Draft XML: segment typed paragraphs
 *
 * Every path ends in the validator.
 */

pub mod fdx;
pub mod format;
pub mod front_matter;
pub mod matcher;
pub mod model;
pub mod normalizer;
pub mod numbering;
pub mod parser;
pub mod reconstructor;
pub mod session;
pub mod tokens;
pub mod validator;

pub use format::{detect_bytes, detect_format};
pub use matcher::{match_header, HeaderMatch, StrategyKind, HEADER_STRATEGIES};
pub use model::{
    HeaderFields, IntExt, ParagraphElement, ParagraphKind, ParseWarning, ParsedScreenplay, Scene, ScreenplayFormat,
    ScreenplayMetadata, TextFragment,
};
pub use normalizer::normalize;
pub use parser::ScreenplayParser;
pub use reconstructor::{reconstruct_document, reconstruct_page};
