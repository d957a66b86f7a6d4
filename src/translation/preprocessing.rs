/*!
 * Local text preprocessing applied before translation requests.
 *
 * Steps, in order: encoding cleanup, disfluency removal (speech input only)
 * with whitespace collapse, masking of e-mail addresses and phone numbers,
 * unit normalisation, and glossary substitution.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::GlossaryEntry;

static DISFLUENCY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\buh+\b|\bum+\b|\byou know\b|\ber+\b|\bhmm+\b|\bokay\b").unwrap()
});

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+").unwrap()
});

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{10,13}\b").unwrap());

static KILOMETER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*kms?\b").unwrap());

static RUPEE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"₹\s*(\d+)").unwrap());

/// Phrases replaced before every request
const DEFAULT_GLOSSARY: &[(&str, &str)] = &[
    ("circuit brkr", "circuit breaker"),
    ("break a leg", "good luck"),
    ("piece of cake", "very easy"),
];

/// Where the text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Typed or extracted document text
    Text,
    /// Speech recognition output
    Speech,
}

/// Compiled glossary rule
#[derive(Debug, Clone)]
struct GlossaryRule {
    pattern: Regex,
    replacement: String,
}

/// Text preprocessor with a compiled glossary
#[derive(Debug, Clone)]
pub struct TextPreprocessor {
    glossary: Vec<GlossaryRule>,
}

impl Default for TextPreprocessor {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl TextPreprocessor {
    /// Create a preprocessor with the built-in glossary plus `extra` entries
    pub fn new(extra: &[GlossaryEntry]) -> Self {
        let builtin = DEFAULT_GLOSSARY.iter().map(|(term, replacement)| (*term, *replacement));
        let configured = extra
            .iter()
            .filter(|entry| !entry.term.trim().is_empty())
            .map(|entry| (entry.term.as_str(), entry.replacement.as_str()));

        let glossary = builtin
            .chain(configured)
            .filter_map(|(term, replacement)| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(term.trim()));
                match Regex::new(&pattern) {
                    Ok(pattern) => Some(GlossaryRule {
                        pattern,
                        replacement: replacement.to_string(),
                    }),
                    Err(e) => {
                        log::warn!("Skipping glossary term '{}': {}", term, e);
                        None
                    }
                }
            })
            .collect();

        Self { glossary }
    }

    /// Run the whole pipeline
    pub fn process(&self, text: &str, kind: InputKind) -> String {
        let text = normalize_encoding(text);
        let text = remove_disfluencies(&text, kind);
        let text = mask_sensitive_data(&text);
        let text = normalize_units(&text);
        let text = self.apply_glossary(&text);
        text.trim().to_string()
    }

    /// Replace glossary terms (whole words, case-insensitive)
    pub fn apply_glossary(&self, text: &str) -> String {
        self.glossary.iter().fold(text.to_string(), |acc, rule| {
            rule.pattern
                .replace_all(&acc, regex::NoExpand(&rule.replacement))
                .into_owned()
        })
    }
}

/// Drop control characters other than line breaks and tabs
pub fn normalize_encoding(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect()
}

/// Remove fillers from speech input and collapse runs of whitespace
pub fn remove_disfluencies(text: &str, kind: InputKind) -> String {
    let cleaned = match kind {
        InputKind::Speech => DISFLUENCY_REGEX.replace_all(text, ""),
        InputKind::Text => std::borrow::Cow::Borrowed(text),
    };
    WHITESPACE_REGEX.replace_all(&cleaned, " ").trim().to_string()
}

/// Mask e-mail addresses and 10 to 13 digit phone numbers
pub fn mask_sensitive_data(text: &str) -> String {
    let text = EMAIL_REGEX.replace_all(text, "[EMAIL]");
    PHONE_REGEX.replace_all(&text, "[PHONE]").into_owned()
}

/// Spell out kilometre and rupee amounts
pub fn normalize_units(text: &str) -> String {
    let text = KILOMETER_REGEX.replace_all(text, "$1 kilometers");
    RUPEE_REGEX.replace_all(&text, "$1 rupees").into_owned()
}
