/*!
 * Structural segmentation of classified lines into content blocks.
 *
 * Consecutive paragraph lines are merged into one block; every other line
 * becomes a block of its own. Block order always matches line order.
 */

use serde::{Deserialize, Serialize};

use super::classifier::{classify, LineTag};

/// One classified, translatable unit of document text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Structural role of the block
    pub kind: LineTag,
    /// Trimmed source lines joined with `\n`
    pub raw_text: String,
}

impl ContentBlock {
    pub fn new(kind: LineTag, raw_text: impl Into<String>) -> Self {
        Self {
            kind,
            raw_text: raw_text.into(),
        }
    }

    /// Text sent to the translation API: lines joined by single spaces
    pub fn request_text(&self) -> String {
        self.raw_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.kind == LineTag::Empty
    }
}

/// Segment an ordered sequence of lines into content blocks
pub fn segment<S: AsRef<str>>(lines: &[S]) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    let mut pending: Vec<&str> = Vec::new();

    for line in lines {
        let line = line.as_ref().trim();
        let tag = classify(line);

        if tag.is_mergeable() {
            pending.push(line);
            continue;
        }

        flush_paragraph(&mut pending, &mut blocks);
        blocks.push(ContentBlock::new(tag, line));
    }

    flush_paragraph(&mut pending, &mut blocks);
    blocks
}

/// Split a document on line breaks and segment it
pub fn segment_text(text: &str) -> Vec<ContentBlock> {
    let lines: Vec<&str> = text.split('\n').map(|line| line.trim_end_matches('\r')).collect();
    segment(&lines)
}

fn flush_paragraph(pending: &mut Vec<&str>, blocks: &mut Vec<ContentBlock>) {
    if pending.is_empty() {
        return;
    }
    blocks.push(ContentBlock::new(LineTag::Paragraph, pending.join("\n")));
    pending.clear();
}
