/*!
 * Text-based PDF documents.
 *
 * Text comes from `pdf-extract`; short title-like lines are wrapped in
 * `**...**` so they survive translation as headings. Scanned PDFs yield no
 * text and are reported as such by the caller.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ExtractionError;
use crate::file_utils::FileType;
use crate::translation::classifier::{is_title_case, is_upper_case};

use super::DocumentExtractor;

/// Prefixes of list items, which are never headings
static LIST_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+\.|[a-z]\)|[•\-])").unwrap());

static EXCESS_BLANK_LINES_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// PDF files with a text layer
#[derive(Debug, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Wrap heading-like lines of extracted page text
    pub fn mark_headings(text: &str) -> String {
        let pages: Vec<String> = text
            .split('\u{c}')
            .map(|page| {
                page.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(|line| {
                        if looks_like_heading(line) {
                            format!("**{}**", line)
                        } else {
                            line.to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .filter(|page| !page.is_empty())
            .collect();

        let joined = pages.join("\n\n");
        EXCESS_BLANK_LINES_REGEX.replace_all(&joined, "\n\n").trim().to_string()
    }
}

/// Heading heuristics for a single trimmed line
pub fn looks_like_heading(line: &str) -> bool {
    let char_count = line.chars().count();
    if char_count >= 100 || LIST_PREFIX_REGEX.is_match(line) || line.ends_with('.') {
        return false;
    }

    if is_upper_case(line) || line.ends_with(':') || is_title_case(line) {
        return true;
    }

    // Short capitalised phrases without sentence punctuation
    let words: Vec<&str> = line.split_whitespace().collect();
    char_count > 5
        && char_count < 60
        && words.len() <= 6
        && words
            .iter()
            .filter(|word| word.chars().all(char::is_alphabetic))
            .all(|word| word.chars().next().is_some_and(char::is_uppercase))
        && !line.contains(['.', ',', ';', '(', ')'])
}

impl DocumentExtractor for PdfExtractor {
    fn file_type(&self) -> FileType {
        FileType::Pdf
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::parse("pdf", e.to_string()))?;
        Ok(Self::mark_headings(&text))
    }
}
