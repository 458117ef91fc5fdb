/*!
 * Scene number resolution and header cleanup.
 *
 * Numbering priority for a matched header:
 * 1. a number embedded later in the remainder (after the time of day, or
 *    trailing the line), which is where PDF extraction tends to repeat it;
 * 2. the number written before the keyword;
 * 3. one more than the last assigned number.
 *
 * Collisions are detected and logged but never block a parse.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::matcher::HeaderMatch;
use super::model::{HeaderFields, IntExt, SceneHeader};
use super::tokens::{is_time_of_day, TIME_OF_DAY};

/// First number directly after a time-of-day token: `DAY 1 1`, `LATER 8 8 RICHARD`
static TIME_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b(?:{})\s+(\d+)\b", TIME_OF_DAY)).expect("Invalid time number regex")
});

/// Standalone number closing the line: `KITCHEN - DAY - 12`, `HALL 4`
static TRAILING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[\s-])(\d+)\s*$").expect("Invalid trailing number regex")
});

/// `<TIME> N N ...` and anything glued on after it
static TIME_NUMBER_ARTIFACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b({})\s+\d+\b.*$", TIME_OF_DAY)).expect("Invalid time artifact regex")
});

/// Trailing `- N`
static DASH_NUMBER_ARTIFACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*-+\s*\d+\s*$").expect("Invalid dash artifact regex")
});

/// Trailing standalone number
static TRAILING_NUMBER_ARTIFACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+\d+\s*$").expect("Invalid trailing artifact regex")
});

/// Separator between location and time-of-day segments
static SEGMENT_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+-+\s+|\s+--?\s*$").expect("Invalid segment separator regex")
});

/// Per-parse numbering state. Create one per parse call.
#[derive(Debug, Default)]
pub struct NumberResolver {
    seen: HashSet<u32>,
    last_number: u32,
    collisions: usize,
}

impl NumberResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the number for a matched header and record it.
    pub fn resolve(&mut self, header: &HeaderMatch) -> u32 {
        self.resolve_parts(header.leading_number, &header.rest)
    }

    /// Resolve from a leading number and the text after the keyword.
    pub fn resolve_parts(&mut self, leading_number: Option<u32>, rest: &str) -> u32 {
        let embedded = embedded_number(rest);

        if let (Some(trailing), Some(leading)) = (embedded, leading_number) {
            if trailing != leading {
                debug!(
                    "Leading number {} and trailing number {} disagree, using trailing",
                    leading, trailing
                );
            }
        }

        let number = embedded
            .or(leading_number)
            .unwrap_or_else(|| self.last_number.saturating_add(1));

        if !self.seen.insert(number) {
            warn!("Duplicate scene number {} detected", number);
            self.collisions += 1;
        }

        self.last_number = number;
        number
    }

    /// Number of collisions seen so far
    pub fn collisions(&self) -> usize {
        self.collisions
    }
}

/// Explicit scene number embedded in the remainder, if any.
pub fn embedded_number(rest: &str) -> Option<u32> {
    let rest = rest.trim();

    TIME_NUMBER
        .captures(rest)
        .or_else(|| TRAILING_NUMBER.captures(rest))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Strip known trailing-number artifacts from the remainder, in fixed order.
pub fn clean_display_rest(rest: &str) -> String {
    let step1 = TIME_NUMBER_ARTIFACT.replace(rest.trim(), "$1");
    let step2 = DASH_NUMBER_ARTIFACT.replace(&step1, "");
    let step3 = TRAILING_NUMBER_ARTIFACT.replace(&step2, "");
    step3.trim().to_string()
}

/// Split a cleaned remainder into location and time of day.
pub fn parse_header_fields(keyword: Option<IntExt>, cleaned_rest: &str) -> HeaderFields {
    let segments: Vec<&str> = SEGMENT_SEPARATOR
        .split(cleaned_rest.trim())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let time_index = segments
        .iter()
        .rposition(|segment| is_time_of_day(segment.trim_matches(|c| c == '(' || c == ')')));

    match time_index {
        Some(index) if index > 0 => HeaderFields {
            int_ext: keyword,
            location: segments[..index].join(" - "),
            time_of_day: Some(segments[index..].join(" - ")),
        },
        Some(_) => HeaderFields {
            int_ext: keyword,
            location: String::new(),
            time_of_day: Some(segments.join(" - ")),
        },
        None => HeaderFields {
            int_ext: keyword,
            location: segments.join(" - "),
            time_of_day: None,
        },
    }
}

/// Build the resolved header for a matched line.
pub fn build_header(raw: &str, matched: &HeaderMatch, resolver: &mut NumberResolver) -> SceneHeader {
    let number = resolver.resolve(matched);
    let cleaned = clean_display_rest(&matched.rest);
    let fields = parse_header_fields(Some(matched.keyword), &cleaned);

    let display = if cleaned.is_empty() {
        matched.keyword.display_keyword().to_string()
    } else {
        format!("{} {}", matched.keyword.display_keyword(), cleaned)
    };

    SceneHeader {
        raw: raw.trim().to_string(),
        display,
        number,
        fields,
    }
}

/// Build a header for heading text that carries no interior/exterior
/// keyword, such as `BLACK SCREEN` or `MONTAGE`.
pub fn build_keywordless_header(
    raw: &str,
    leading_number: Option<u32>,
    resolver: &mut NumberResolver,
) -> SceneHeader {
    let number = resolver.resolve_parts(leading_number, raw);
    let display = clean_display_rest(raw);
    let fields = parse_header_fields(None, &display);

    SceneHeader {
        raw: raw.trim().to_string(),
        display,
        number,
        fields,
    }
}
