/*!
 * Scene boundary matching.
 *
 * A scene header is recognized by an ordered list of independent strategies.
 * Each strategy is a pure function from a trimmed line to an optional match;
 * the first strategy that succeeds wins, so the list order is the priority.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::model::IntExt;
use super::tokens::LEADING_NUMBER;

/// Which header shape produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// `INT. KITCHEN - DAY`
    KeywordPeriod,
    /// `INT: KITCHEN - DAY`
    KeywordColon,
    /// `INT, KITCHEN - DAY`
    KeywordComma,
    /// `INT KITCHEN - DAY`
    KeywordBare,
    /// `KITCHEN - INT. DAY`
    LocationFirst,
}

/// Structured result of a successful header match, in canonical
/// (keyword, remainder) shape regardless of source order.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMatch {
    pub strategy: StrategyKind,
    /// Number written before the keyword, if any
    pub leading_number: Option<u32>,
    pub keyword: IntExt,
    /// Everything after the keyword: location, time of day, trailing artifacts
    pub rest: String,
}

/// A named matcher in the cascade
pub struct HeaderStrategy {
    pub kind: StrategyKind,
    pub matcher: fn(&str) -> Option<HeaderMatch>,
}

/// The cascade, highest priority first.
pub const HEADER_STRATEGIES: [HeaderStrategy; 5] = [
    HeaderStrategy {
        kind: StrategyKind::KeywordPeriod,
        matcher: match_keyword_period,
    },
    HeaderStrategy {
        kind: StrategyKind::KeywordColon,
        matcher: match_keyword_colon,
    },
    HeaderStrategy {
        kind: StrategyKind::KeywordComma,
        matcher: match_keyword_comma,
    },
    HeaderStrategy {
        kind: StrategyKind::KeywordBare,
        matcher: match_keyword_bare,
    },
    HeaderStrategy {
        kind: StrategyKind::LocationFirst,
        matcher: match_location_first,
    },
];

static KEYWORD_PERIOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^{}(INT\./EXT\.|EXT\./INT\.|INT/EXT\.|EXT/INT\.|I/E\.|INT\.|EXT\.)\s*(.+)$",
        LEADING_NUMBER
    ))
    .expect("Invalid keyword-period regex")
});

static KEYWORD_COLON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{}(INT/EXT|EXT/INT|I/E|INT|EXT)\s*:\s*(.+)$", LEADING_NUMBER))
        .expect("Invalid keyword-colon regex")
});

static KEYWORD_COMMA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{}(INT/EXT|EXT/INT|I/E|INT|EXT)\s*,\s*(.+)$", LEADING_NUMBER))
        .expect("Invalid keyword-comma regex")
});

static KEYWORD_BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{}(INT/EXT|EXT/INT|I/E|INT|EXT)\s+(.+)$", LEADING_NUMBER))
        .expect("Invalid keyword-bare regex")
});

static LOCATION_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^{}([A-Z0-9][A-Z0-9 '.,&/()#]*?)\s+-+\s+(INT/EXT|EXT/INT|I/E|INT|EXT)\.?(?:\s+(.*))?$",
        LEADING_NUMBER
    ))
    .expect("Invalid location-first regex")
});

/// Run the cascade against one line.
pub fn match_header(line: &str) -> Option<HeaderMatch> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    HEADER_STRATEGIES
        .iter()
        .find_map(|strategy| (strategy.matcher)(trimmed))
}

/// The predicate shared by the front-matter skipper and the scanner.
pub fn is_scene_header(line: &str) -> bool {
    match_header(line).is_some()
}

fn leading_number(caps: &Captures) -> Option<u32> {
    caps.get(1).and_then(|m| m.as_str().parse().ok())
}

fn keyword_first(caps: Captures, strategy: StrategyKind) -> Option<HeaderMatch> {
    let keyword = IntExt::from_keyword(caps.get(2)?.as_str())?;
    let rest = caps.get(3)?.as_str().trim().to_string();
    if rest.is_empty() {
        return None;
    }

    Some(HeaderMatch {
        strategy,
        leading_number: leading_number(&caps),
        keyword,
        rest,
    })
}

pub fn match_keyword_period(line: &str) -> Option<HeaderMatch> {
    KEYWORD_PERIOD
        .captures(line)
        .and_then(|caps| keyword_first(caps, StrategyKind::KeywordPeriod))
}

pub fn match_keyword_colon(line: &str) -> Option<HeaderMatch> {
    KEYWORD_COLON
        .captures(line)
        .and_then(|caps| keyword_first(caps, StrategyKind::KeywordColon))
}

pub fn match_keyword_comma(line: &str) -> Option<HeaderMatch> {
    KEYWORD_COMMA
        .captures(line)
        .and_then(|caps| keyword_first(caps, StrategyKind::KeywordComma))
}

pub fn match_keyword_bare(line: &str) -> Option<HeaderMatch> {
    KEYWORD_BARE
        .captures(line)
        .and_then(|caps| keyword_first(caps, StrategyKind::KeywordBare))
}

/// `LOCATION - INT. REST` reordered into `INT. LOCATION - REST`.
pub fn match_location_first(line: &str) -> Option<HeaderMatch> {
    let caps = LOCATION_FIRST.captures(line)?;
    let location = caps.get(2)?.as_str().trim();
    let keyword = IntExt::from_keyword(caps.get(3)?.as_str())?;
    let tail = caps.get(4).map(|m| m.as_str().trim()).unwrap_or("");

    let rest = if tail.is_empty() {
        location.to_string()
    } else {
        format!("{} - {}", location, tail)
    };

    Some(HeaderMatch {
        strategy: StrategyKind::LocationFirst,
        leading_number: leading_number(&caps),
        keyword,
        rest,
    })
}
