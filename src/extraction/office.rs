/*!
 * Office Open XML documents (DOCX, PPTX).
 *
 * Both formats are zip archives of XML parts. Paragraph text is gathered
 * from `w:t` (Word) or `a:t` (DrawingML) runs; Word paragraph styles,
 * numbering and bold runs decide the structural hints.
 */

use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::errors::ExtractionError;
use crate::file_utils::FileType;
use crate::translation::classifier::{is_title_case, is_upper_case};

use super::DocumentExtractor;

/// Numeral or bullet prefixes that disqualify a paragraph as a heading
static LIST_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+\.|[•\-*])").unwrap());

static EXCESS_BLANK_LINES_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

static SLIDE_NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").unwrap());

/// Word documents
#[derive(Debug, Default)]
pub struct DocxExtractor;

/// PowerPoint presentations
#[derive(Debug, Default)]
pub struct PptxExtractor;

/// A Word paragraph being collected
#[derive(Debug, Default)]
struct Paragraph {
    style: Option<String>,
    numbered: bool,
    runs: Vec<(String, bool)>,
}

impl Paragraph {
    fn text(&self) -> String {
        self.runs.iter().map(|(text, _)| text.as_str()).collect::<String>()
    }

    fn bold_ratio(&self, total_chars: usize) -> f64 {
        if total_chars == 0 {
            return 0.0;
        }
        let bold: usize = self
            .runs
            .iter()
            .filter(|(_, bold)| *bold)
            .map(|(text, _)| text.trim().chars().count())
            .sum();
        bold as f64 / total_chars as f64
    }

    /// Render with structural hints
    fn render(&self) -> String {
        let text = self.text();
        let text = text.trim();
        if text.is_empty() {
            return String::new();
        }

        let style = self.style.as_deref().unwrap_or_default();
        let char_count = text.chars().count();
        let has_list_prefix = LIST_PREFIX_REGEX.is_match(text);

        let styled_heading = style.starts_with("Heading") || style.starts_with("Title");
        let is_list = !styled_heading && (style.starts_with("List") || self.numbered || has_list_prefix);
        let looks_like_heading = !styled_heading
            && !is_list
            && char_count < 100
            && (text.ends_with(':') || is_upper_case(text) || is_title_case(text));
        let mostly_bold = char_count < 80 && self.bold_ratio(char_count) > 0.7;

        if styled_heading || looks_like_heading || (mostly_bold && !is_list) {
            format!("**{}**", text)
        } else if is_list {
            if has_list_prefix {
                text.to_string()
            } else {
                format!("• {}", text)
            }
        } else {
            text.to_string()
        }
    }
}

fn open_archive<'a>(bytes: &'a [u8], format: &str) -> Result<ZipArchive<Cursor<&'a [u8]>>, ExtractionError> {
    ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractionError::parse(format, e.to_string()))
}

fn read_part(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str, format: &str) -> Result<String, ExtractionError> {
    let mut part = archive
        .by_name(name)
        .map_err(|e| ExtractionError::parse(format, format!("{}: {}", name, e)))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

fn attribute_value(element: &BytesStart, name: &str) -> Option<String> {
    element
        .try_get_attribute(name)
        .ok()
        .flatten()
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// `w:b` without a value, or with a truthy one
fn is_bold_toggle(element: &BytesStart) -> bool {
    !matches!(
        attribute_value(element, "w:val").as_deref(),
        Some("0") | Some("false") | Some("off")
    )
}

impl DocxExtractor {
    /// Extract paragraphs from `word/document.xml`
    pub fn parse_document_xml(xml: &str) -> Result<String, ExtractionError> {
        let mut reader = Reader::from_str(xml);
        let mut lines = Vec::new();
        let mut paragraph: Option<Paragraph> = None;
        let mut in_run = false;
        let mut run_bold = false;
        let mut in_text = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| ExtractionError::parse("docx", e.to_string()))?;

            match event {
                Event::Start(e) => match e.name().as_ref() {
                    b"w:p" => paragraph = Some(Paragraph::default()),
                    b"w:r" => {
                        in_run = true;
                        run_bold = false;
                    }
                    b"w:t" => in_text = true,
                    b"w:numPr" => {
                        if let Some(p) = paragraph.as_mut() {
                            p.numbered = true;
                        }
                    }
                    b"w:b" if in_run => run_bold = is_bold_toggle(&e),
                    _ => {}
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"w:p" => lines.push(String::new()),
                    b"w:pStyle" => {
                        if let Some(p) = paragraph.as_mut() {
                            p.style = attribute_value(&e, "w:val");
                        }
                    }
                    b"w:numId" => {
                        if let Some(p) = paragraph.as_mut() {
                            p.numbered = true;
                        }
                    }
                    b"w:b" if in_run => run_bold = is_bold_toggle(&e),
                    b"w:tab" if in_run => {
                        if let Some(p) = paragraph.as_mut() {
                            p.runs.push((" ".to_string(), run_bold));
                        }
                    }
                    _ => {}
                },
                Event::Text(t) if in_text => {
                    let text = t
                        .unescape()
                        .map_err(|e| ExtractionError::parse("docx", e.to_string()))?;
                    if let Some(p) = paragraph.as_mut() {
                        p.runs.push((text.into_owned(), run_bold));
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"w:t" => in_text = false,
                    b"w:r" => in_run = false,
                    b"w:p" => {
                        if let Some(p) = paragraph.take() {
                            lines.push(p.render());
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        let joined = lines.join("\n");
        Ok(EXCESS_BLANK_LINES_REGEX.replace_all(&joined, "\n\n").trim().to_string())
    }
}

impl DocumentExtractor for DocxExtractor {
    fn file_type(&self) -> FileType {
        FileType::Docx
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = open_archive(bytes, "docx")?;
        let xml = read_part(&mut archive, "word/document.xml", "docx")?;
        Self::parse_document_xml(&xml)
    }
}

impl PptxExtractor {
    /// Extract the paragraphs of one slide, one per line
    pub fn parse_slide_xml(xml: &str) -> Result<Vec<String>, ExtractionError> {
        let mut reader = Reader::from_str(xml);
        let mut lines = Vec::new();
        let mut current: Option<String> = None;
        let mut in_text = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| ExtractionError::parse("pptx", e.to_string()))?;

            match event {
                Event::Start(e) => match e.name().as_ref() {
                    b"a:p" => current = Some(String::new()),
                    b"a:t" => in_text = true,
                    _ => {}
                },
                Event::Text(t) if in_text => {
                    let text = t
                        .unescape()
                        .map_err(|e| ExtractionError::parse("pptx", e.to_string()))?;
                    if let Some(line) = current.as_mut() {
                        line.push_str(&text);
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"a:t" => in_text = false,
                    b"a:p" => {
                        if let Some(line) = current.take() {
                            let line = line.trim();
                            if !line.is_empty() {
                                lines.push(line.to_string());
                            }
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(lines)
    }
}

impl DocumentExtractor for PptxExtractor {
    fn file_type(&self) -> FileType {
        FileType::Pptx
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = open_archive(bytes, "pptx")?;

        let mut slides: Vec<(u32, String)> = archive
            .file_names()
            .filter_map(|name| {
                let number = SLIDE_NAME_REGEX.captures(name)?.get(1)?.as_str().parse().ok()?;
                Some((number, name.to_string()))
            })
            .collect();
        slides.sort_by_key(|(number, _)| *number);

        let mut sections = Vec::with_capacity(slides.len());
        for (_, name) in slides {
            let xml = read_part(&mut archive, &name, "pptx")?;
            let lines = Self::parse_slide_xml(&xml)?;
            if !lines.is_empty() {
                sections.push(lines.join("\n"));
            }
        }

        Ok(sections.join("\n\n"))
    }
}
