/*!
 * Front-matter handling for the plaintext and PDF paths.
 *
 * Everything before the first line recognized as a scene header is title
 * page material and is discarded. The same material is the only place a
 * title can come from, so a best-effort title is pulled out of it first.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::matcher::is_scene_header;
use crate::errors::ParseError;

/// Longest line accepted as a title
const MAX_TITLE_CHARS: usize = 120;

/// `Title: Something` on a Fountain-style title page
static TITLE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^title\s*:\s*(.+)$").expect("Invalid title key regex")
});

/// Lines that are never a title: bylines, drafts, dates, contact details
static NOT_A_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?:original\s+)?(?:screenplay|story|teleplay|written)?\s*by\b|based\s+on\b|draft\b|revised?\b|(?:first|second|third|final|shooting)\s+draft\b|copyright\b|©|\(c\)|contact\b|credit\s*:|author\s*:|fade\s+in\b|\d{1,2}[/.-]\d{1,2}[/.-]\d{2,4}$)|@|https?://|\+?\d[\d\s().-]{6,}\d",
    )
    .expect("Invalid byline regex")
});

/// Index of the first line recognized as a scene header.
///
/// Empty lines are skipped; every other line goes through the same predicate
/// the scanner uses. No match anywhere means the document is not a
/// screenplay in a recognizable format.
pub fn first_header_index(lines: &[&str]) -> Result<usize, ParseError> {
    for (index, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        if is_scene_header(line) {
            debug!("First scene header at line {}: {}", index + 1, line.trim());
            return Ok(index);
        }
    }

    Err(ParseError::NoHeadersFound)
}

/// Best-effort title from the discarded front matter.
pub fn extract_title(front_matter: &[&str]) -> Option<String> {
    let candidates: Vec<&str> = front_matter
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    for line in &candidates {
        if let Some(caps) = TITLE_KEY.captures(line) {
            let title = caps[1].trim();
            if !title.is_empty() {
                return Some(truncate(title));
            }
        }
    }

    candidates
        .into_iter()
        .find(|line| is_title_candidate(line))
        .map(truncate)
}

fn is_title_candidate(line: &str) -> bool {
    line.chars().any(char::is_alphabetic) && !NOT_A_TITLE.is_match(line)
}

fn truncate(title: &str) -> String {
    let title = title.trim_matches(|c: char| c == '"' || c.is_whitespace());
    title.chars().take(MAX_TITLE_CHARS).collect()
}
