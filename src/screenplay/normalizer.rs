/*!
 * Text normalization for screenplay sources.
 *
 * Repairs letter-spaced text produced by poor PDF extraction, rejoins scene
 * headers that a line wrap split in two, and collapses horizontal
 * whitespace. Newlines are kept: they delimit candidate header lines.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::tokens::{KEYWORD, LEADING_NUMBER, TIME_OF_DAY, TIME_OF_DAY_WORD};
use crate::app_config::ParserConfig;

/// Single space between two alphanumeric characters
static LETTER_GAP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([\p{L}\p{N}]) ([\p{L}\p{N}])").expect("Invalid letter gap regex")
});

/// Single space between a letter and a period, as in `I N T .`
static PERIOD_GAP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\p{L}) \.").expect("Invalid period gap regex")
});

/// Line that opens like a scene header
static HEADER_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{}(?:{})(?:[.:,\s]|$)", LEADING_NUMBER, KEYWORD))
        .expect("Invalid header start regex")
});

/// Line that ends with an interior/exterior keyword, as in `KITCHEN - INT.`
static KEYWORD_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?:^|[\s-])(?:{})\.?$", KEYWORD)).expect("Invalid keyword end regex")
});

/// Separator left dangling at the end of a line, as in `INT. HOUSE -`
static DANGLING_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s-+$").expect("Invalid dangling separator regex")
});

/// Line holding nothing but a time of day and optional scene numbers: `NIGHT`, `NIGHT 12 12`
static TIME_OF_DAY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?:{})(?:\s+\d+[A-Z]?)*$", TIME_OF_DAY)).expect("Invalid time-of-day line regex")
});

/// Horizontal whitespace runs
static HORIZONTAL_SPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\S\n]+").expect("Invalid whitespace regex")
});

/// Whitespace hugging a newline
static SPACE_AROUND_NEWLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r" ?\n ?").expect("Invalid newline regex")
});

/// Normalize raw screenplay text. Pure; idempotent on its own output.
///
/// Passes repeat until the text stops changing: collapsing whitespace can
/// push text over the letter-spacing threshold that it did not cross
/// before. After the first pass every change shortens the text or removes
/// a line break, so the loop ends.
pub fn normalize(text: &str, config: &ParserConfig) -> String {
    let unified = text
        .trim_start_matches('\u{feff}')
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let mut current = normalize_pass(&unified, config);
    loop {
        let next = normalize_pass(&current, config);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_pass(text: &str, config: &ParserConfig) -> String {
    let repaired = if is_letter_spaced(text, config.space_ratio_threshold) {
        debug!("Input looks letter-spaced, collapsing inter-character spaces");
        collapse_letter_spacing(text)
    } else {
        text.to_string()
    };

    let merged = merge_wrapped_headers(&repaired);
    collapse_whitespace(&merged)
}

/// Share of horizontal whitespace among all characters.
pub fn space_ratio(text: &str) -> f64 {
    let mut total = 0usize;
    let mut spaces = 0usize;

    for c in text.chars() {
        total += 1;
        if c != '\n' && c.is_whitespace() {
            spaces += 1;
        }
    }

    if total == 0 {
        return 0.0;
    }

    spaces as f64 / total as f64
}

/// Whether the text shows the letter-spacing artifact.
pub fn is_letter_spaced(text: &str, threshold: f64) -> bool {
    space_ratio(text) > threshold
}

/// Collapse single spaces between alphanumerics until nothing changes.
///
/// One pass cannot catch `A B C` completely because matches may not overlap,
/// so the replacement runs to a fixed point.
pub fn collapse_letter_spacing(text: &str) -> String {
    let mut current = text.to_string();

    loop {
        let next = LETTER_GAP.replace_all(&current, "$1$2").into_owned();
        if next == current {
            break;
        }
        current = next;
    }

    PERIOD_GAP.replace_all(&current, "$1.").into_owned()
}

/// Rejoin headers whose time-of-day token wrapped onto the next line.
pub fn merge_wrapped_headers(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut merged: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some(next) = lines.get(i + 1) {
            if is_wrapped_header(line, next) {
                debug!("Merging wrapped header: '{}' + '{}'", line.trim(), next.trim());
                merged.push(format!("{} {}", line.trim_end(), next.trim_start()));
                i += 2;
                continue;
            }
        }

        merged.push(line.to_string());
        i += 1;
    }

    merged.join("\n")
}

/// A header cut short by a line wrap: it ends in a keyword (`KITCHEN - INT.`)
/// or opens like a header and ends in a dangling separator (`INT. HOUSE -`),
/// and the next line is only the missing time of day.
fn is_wrapped_header(first: &str, second: &str) -> bool {
    let first = first.trim();
    let second = second.trim();

    if first.is_empty() || second.is_empty() || TIME_OF_DAY_WORD.is_match(first) {
        return false;
    }

    let cut_short =
        KEYWORD_END.is_match(first) || (HEADER_START.is_match(first) && DANGLING_SEPARATOR.is_match(first));

    cut_short && TIME_OF_DAY_LINE.is_match(second)
}

/// Collapse horizontal whitespace and strip it around newlines.
pub fn collapse_whitespace(text: &str) -> String {
    let single = HORIZONTAL_SPACE.replace_all(text, " ");
    let tight = SPACE_AROUND_NEWLINE.replace_all(&single, "\n");
    tight.trim().to_string()
}
