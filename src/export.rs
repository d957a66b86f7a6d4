/*!
 * Plain-text rendering of translated documents.
 *
 * Structural markers are turned into layout a text viewer shows well:
 * `**headings**` become upper-case lines underlined with `=`, section labels
 * ending in `:` are underlined with `-`, bullets are normalised to `• `, and
 * paragraphs are separated by one blank line.
 */

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;

static NUMBERED_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s").unwrap());

const BULLET_STARTS: [char; 4] = ['•', '-', '*', '◦'];

const HEADER_RULE_WIDTH: usize = 50;

/// Details printed in the download header
#[derive(Debug, Clone)]
pub struct ExportHeader {
    pub original_file: String,
    pub source_language: String,
    pub target_language: String,
    pub timestamp: DateTime<Local>,
}

/// Render marked-up translated text for reading
pub fn format_for_download(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut formatted: Vec<String> = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();

        if line.is_empty() {
            formatted.push(String::new());
            continue;
        }

        if line.starts_with("**") && line.ends_with("**") && line.matches("**").count() == 2 && line.len() > 4 {
            let heading = line[2..line.len() - 2].trim();
            push_underlined(&mut formatted, &heading.to_uppercase(), '=', heading.chars().count());
        } else if line.starts_with(BULLET_STARTS) {
            let content = line.trim_start_matches(BULLET_STARTS).trim();
            formatted.push(format!("• {}", content));
        } else if NUMBERED_REGEX.is_match(line) {
            formatted.push(line.to_string());
        } else if line.ends_with(':') && line.chars().count() < 100 {
            push_underlined(&mut formatted, &line.to_uppercase(), '-', line.chars().count());
        } else {
            let previous = if i > 0 { lines[i - 1].trim() } else { "" };
            let follows_paragraph = !previous.is_empty() && !previous.starts_with(['•', '-', '*']);
            if follows_paragraph && formatted.last().is_some_and(|last| !last.trim().is_empty()) {
                formatted.push(String::new());
            }
            formatted.push(line.to_string());
        }
    }

    collapse_blank_lines(&formatted)
}

/// Full download: header followed by the formatted text
///
/// Entities are already decoded when the API reply is read; passed-through
/// source text is written as it was.
pub fn render_document(translated_text: &str, header: &ExportHeader) -> String {
    let rule = "=".repeat(HEADER_RULE_WIDTH);
    let body = format_for_download(translated_text);

    format!(
        "TRANSLATED DOCUMENT\n{rule}\n\n\
         Original File: {}\n\
         Source Language: {}\n\
         Target Language: {}\n\
         Translation Date: {}\n\
         Generated by: shikshalok\n\n\
         {rule}\n\n\
         {}\n",
        header.original_file,
        header.source_language,
        header.target_language,
        header.timestamp.format("%Y-%m-%d %H:%M:%S"),
        body,
        rule = rule,
    )
}

fn push_underlined(formatted: &mut Vec<String>, title: &str, rule: char, width: usize) {
    formatted.push(String::new());
    formatted.push(title.to_string());
    formatted.push(rule.to_string().repeat(width));
    formatted.push(String::new());
}

fn collapse_blank_lines(lines: &[String]) -> String {
    let mut result: Vec<&str> = Vec::with_capacity(lines.len());
    let mut previous_empty = false;

    for line in lines {
        let empty = line.trim().is_empty();
        if empty && (previous_empty || result.is_empty()) {
            continue;
        }
        result.push(if empty { "" } else { line.as_str() });
        previous_empty = empty;
    }

    while result.last().is_some_and(|line| line.is_empty()) {
        result.pop();
    }

    result.join("\n")
}
