/*!
 * Tests for structural marker handling and chunking
 */

use shikshalok::translation::chunking::{chunk_text, split_sentences};
use shikshalok::translation::markers::{reapply_marker, strip_marker};
use shikshalok::translation::LineTag;

#[test]
fn test_stripMarker_withHeading_shouldRemoveAsterisks() {
    assert_eq!(strip_marker(LineTag::Heading, "**Introduction**"), "Introduction");
}

#[test]
fn test_stripMarker_withBullet_shouldRemoveGlyph() {
    assert_eq!(strip_marker(LineTag::Bullet, "• First point"), "First point");
    assert_eq!(strip_marker(LineTag::Bullet, "- dash item"), "dash item");
}

#[test]
fn test_stripMarker_withBoldLedBullet_shouldRemoveOnlyOneGlyph() {
    assert_eq!(strip_marker(LineTag::Bullet, "**Note** read this"), "*Note** read this");
    assert_eq!(strip_marker(LineTag::Bullet, "•• nested"), "• nested");
}

#[test]
fn test_stripMarker_withNumbered_shouldRemovePrefix() {
    assert_eq!(strip_marker(LineTag::Numbered, "3. Mix the solution"), "Mix the solution");
}

#[test]
fn test_reapplyMarker_withAlreadyWrappedHeading_shouldNotDoubleWrap() {
    assert_eq!(reapply_marker(LineTag::Heading, "**Intro**", "**परिचय**"), "**परिचय**");
    assert_eq!(reapply_marker(LineTag::Heading, "**Intro**", "परिचय"), "**परिचय**");
}

#[test]
fn test_reapplyMarker_withBullet_shouldAddPrefixOnce() {
    assert_eq!(reapply_marker(LineTag::Bullet, "• a", "पहला"), "• पहला");
    assert_eq!(reapply_marker(LineTag::Bullet, "• a", "• पहला"), "• पहला");
}

#[test]
fn test_reapplyMarker_withNumbered_shouldKeepSourceNumeral() {
    assert_eq!(reapply_marker(LineTag::Numbered, "7. Step", "पहला कदम"), "7. पहला कदम");
    // A numeral echoed by the API is replaced by the source one
    assert_eq!(reapply_marker(LineTag::Numbered, "7. Step", "७. पहला कदम"), "7. पहला कदम");
    assert_eq!(reapply_marker(LineTag::Numbered, "7. Step", "7. पहला कदम"), "7. पहला कदम");
}

#[test]
fn test_reapplyMarker_withParagraph_shouldReturnTrimmedText() {
    assert_eq!(reapply_marker(LineTag::Paragraph, "text", "  अनुवाद  "), "अनुवाद");
}

#[test]
fn test_chunkText_withShortText_shouldReturnSingleChunk() {
    assert_eq!(chunk_text("Short text.", 100), vec!["Short text."]);
    assert!(chunk_text("   ", 100).is_empty());
}

#[test]
fn test_chunkText_withLongText_shouldSplitAtSentences() {
    let text = "First sentence here. Second sentence here. Third sentence here.";
    let chunks = chunk_text(text, 45);

    assert_eq!(chunks, vec!["First sentence here. Second sentence here.", "Third sentence here."]);
    assert!(chunks.iter().all(|c| c.chars().count() <= 45));
}

#[test]
fn test_chunkText_withLongSentence_shouldSplitAtWords() {
    let text = "alpha beta gamma delta epsilon zeta eta theta";
    let chunks = chunk_text(text, 12);

    assert!(chunks.iter().all(|c| c.chars().count() <= 12));
    assert_eq!(chunks.join(" "), text);
}

#[test]
fn test_splitSentences_withDevanagariDanda_shouldSplit() {
    assert_eq!(split_sentences("पहला वाक्य। दूसरा वाक्य।"), vec!["पहला वाक्य।", "दूसरा वाक्य।"]);
}
