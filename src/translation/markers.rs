/*!
 * Structural markers.
 *
 * Markers (`**heading**`, `• bullet`, `3. item`) are removed from a block's
 * text before it is sent for translation and put back afterwards, so the
 * API never sees them and a block is never marked twice.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::classifier::{LineTag, BULLET_GLYPHS};

/// Bullet prefix written on translated bullet blocks
pub const BULLET_PREFIX: &str = "• ";

/// Numeral prefix including the whitespace after it
static NUMERAL_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*").unwrap());

/// Numeral prefix echoed back by the API, possibly with leading space
static ECHOED_NUMERAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+\.\s*").unwrap());

/// Remove the structural marker of a block's text
pub fn strip_marker(kind: LineTag, text: &str) -> String {
    let text = text.trim();
    match kind {
        LineTag::Heading => strip_heading(text).to_string(),
        LineTag::Bullet => strip_bullet_glyph(text).to_string(),
        LineTag::Numbered => NUMERAL_PREFIX_REGEX.replace(text, "").to_string(),
        LineTag::Paragraph | LineTag::Empty => text.to_string(),
    }
}

/// Re-apply the structural marker of the source block to a translation
///
/// # Arguments
/// * `kind` - Tag of the source block
/// * `raw_text` - Source block text, used for the numeral prefix
/// * `translated` - Translated content without marker
pub fn reapply_marker(kind: LineTag, raw_text: &str, translated: &str) -> String {
    let translated = translated.trim();
    match kind {
        LineTag::Heading => format!("**{}**", strip_heading(translated)),
        LineTag::Bullet => {
            if translated.starts_with(BULLET_GLYPHS) {
                translated.to_string()
            } else {
                format!("{}{}", BULLET_PREFIX, translated)
            }
        }
        LineTag::Numbered => {
            let prefix = numeral_prefix(raw_text).unwrap_or_default();
            let content = ECHOED_NUMERAL_REGEX.replace(translated, "");
            format!("{}{}", prefix, content)
        }
        LineTag::Paragraph | LineTag::Empty => translated.to_string(),
    }
}

/// The verbatim `\d+\.\s*` prefix of a numbered line
pub fn numeral_prefix(raw_text: &str) -> Option<&str> {
    NUMERAL_PREFIX_REGEX
        .find(raw_text.trim_start())
        .map(|m| m.as_str())
}

/// Remove exactly one leading bullet glyph
fn strip_bullet_glyph(text: &str) -> &str {
    let mut chars = text.chars();
    match chars.next() {
        Some(glyph) if BULLET_GLYPHS.contains(&glyph) => chars.as_str().trim_start(),
        _ => text,
    }
}

/// Heading content without any surrounding asterisks or whitespace
fn strip_heading(text: &str) -> &str {
    text.trim_matches(|c: char| c == '*' || c.is_whitespace())
}
