/*!
 * Line classification.
 *
 * Every input line gets exactly one structural tag. The rules are applied in
 * a fixed precedence order and the first match wins:
 *
 * 1. empty or whitespace-only: `Empty`
 * 2. wrapped in `**...**`: `Heading`
 * 3. starts with a bullet glyph: `Bullet`
 * 4. starts with `<digits>. `: `Numbered`
 * 5. short, no trailing period, no numeral prefix, and upper-case, title-case
 *    or containing a colon: `Heading`
 * 6. anything else: `Paragraph`
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Glyphs that mark a bullet line
pub const BULLET_GLYPHS: [char; 6] = ['•', '-', '*', '◦', '▪', '▫'];

/// Lines at or above this many characters are never promoted to headings
pub const MAX_HEADING_CHARS: usize = 80;

/// `1. ` style list prefix
static NUMBERED_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s").unwrap());

/// Numeral prefix without the trailing space requirement
static NUMERAL_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.").unwrap());

/// Structural role of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTag {
    Empty,
    Heading,
    Bullet,
    Numbered,
    Paragraph,
}

impl LineTag {
    /// Whether lines of this tag are merged with their neighbours
    pub fn is_mergeable(&self) -> bool {
        matches!(self, Self::Paragraph)
    }
}

/// Classify a single line of text
pub fn classify(line: &str) -> LineTag {
    let line = line.trim();

    if line.is_empty() {
        return LineTag::Empty;
    }

    if is_marked_heading(line) {
        return LineTag::Heading;
    }

    if line.starts_with(BULLET_GLYPHS) {
        return LineTag::Bullet;
    }

    if NUMBERED_REGEX.is_match(line) {
        return LineTag::Numbered;
    }

    if line.chars().count() < MAX_HEADING_CHARS
        && !line.ends_with('.')
        && !NUMERAL_PREFIX_REGEX.is_match(line)
        && (is_upper_case(line) || is_title_case(line) || line.contains(':'))
    {
        return LineTag::Heading;
    }

    LineTag::Paragraph
}

/// Line is wrapped in `**` on both ends
pub fn is_marked_heading(line: &str) -> bool {
    line.len() >= 4 && line.starts_with("**") && line.ends_with("**")
}

/// At least one cased character and every cased character is upper-case
pub fn is_upper_case(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Every word starts upper-case and continues lower-case
///
/// Upper-case letters may only follow uncased characters and lower-case
/// letters only cased ones, so `Hello World` qualifies while `Hello world`,
/// `HELLO` and `iPhone` do not. Text without cased characters is not
/// title-case.
pub fn is_title_case(text: &str) -> bool {
    let mut previous_cased = false;
    let mut has_cased = false;

    for c in text.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            has_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            has_cased = true;
        } else {
            previous_cased = false;
        }
    }

    has_cased
}
