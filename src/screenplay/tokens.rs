/*!
 * Shared screenplay vocabulary used by the normalizer, the boundary matcher
 * and the number resolver.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Time-of-day tokens as a regex alternation. Longer forms come first so the
/// leftmost-first alternation prefers "MOMENTS LATER" over "LATER".
pub const TIME_OF_DAY: &str = r"A\s+FEW\s+MOMENTS\s+LATER|MOMENTS\s+LATER|SAME\s+TIME|MAGIC\s+HOUR|CONTINUOUS|LATER|DAY|NIGHT|DAWN|DUSK|MORNING|EVENING|AFTERNOON|SUNRISE|SUNSET|NOON|MIDNIGHT";

/// Interior/exterior keywords without punctuation.
pub const KEYWORD: &str = r"INT\.?/EXT|EXT\.?/INT|I/E|INT|EXT";

/// Optional scene number in front of a header, e.g. `12 `, `12A `, `12. `.
pub const LEADING_NUMBER: &str = r"(?:(\d+)[A-Z]?\.?\s+)?";

/// Line beginning with a time-of-day token
pub static TIME_OF_DAY_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?:{})\b", TIME_OF_DAY)).expect("Invalid time-of-day regex")
});

/// Time-of-day token anywhere as a whole word
pub static TIME_OF_DAY_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b(?:{})\b", TIME_OF_DAY)).expect("Invalid time-of-day regex")
});

/// Whether a fragment of header text is a time-of-day designation.
pub fn is_time_of_day(text: &str) -> bool {
    TIME_OF_DAY_START.is_match(text.trim())
}
