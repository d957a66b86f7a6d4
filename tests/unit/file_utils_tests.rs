/*!
 * Tests for file utilities and format detection
 */

use std::fs;
use std::path::Path;

use shikshalok::file_utils::{FileManager, FileType};

use crate::common;

#[test]
fn test_detectFileType_withKnownExtensions_shouldMapFormats() {
    assert_eq!(FileManager::detect_file_type("notes.TXT"), FileType::Txt);
    assert_eq!(FileManager::detect_file_type("marks.csv"), FileType::Csv);
    assert_eq!(FileManager::detect_file_type("marks.xlsx"), FileType::Excel);
    assert_eq!(FileManager::detect_file_type("lesson.docx"), FileType::Docx);
    assert_eq!(FileManager::detect_file_type("slides.pptx"), FileType::Pptx);
    assert_eq!(FileManager::detect_file_type("book.pdf"), FileType::Pdf);
    assert_eq!(FileManager::detect_file_type("scan.jpeg"), FileType::Image);
}

#[test]
fn test_detectFileType_withUnlistedImageExtension_shouldFallBackToMime() {
    assert_eq!(FileManager::detect_file_type("diagram.gif"), FileType::Image);
}

#[test]
fn test_detectFileType_withUnknownExtension_shouldReturnUnknown() {
    assert_eq!(FileManager::detect_file_type("archive.7z"), FileType::Unknown);
    assert_eq!(FileManager::detect_file_type("Makefile"), FileType::Unknown);
}

#[test]
fn test_generateOutputPath_shouldInsertLanguageBeforeExtension() {
    let path = FileManager::generate_output_path("/in/lesson one.docx", "/out", "hi", "txt");
    assert_eq!(path, Path::new("/out/lesson one.hi.txt"));

    let path = FileManager::generate_output_path("notes.txt", "out", "ta", ".txt");
    assert_eq!(path, Path::new("out/notes.ta.txt"));
}

#[test]
fn test_findDocuments_shouldSkipOutputsAndUnknownFiles() {
    let dir = common::create_temp_dir().unwrap();
    let nested = dir.path().join("unit2");
    fs::create_dir_all(&nested).unwrap();

    common::create_test_file(dir.path(), "b_notes.txt", "text").unwrap();
    common::create_test_file(dir.path(), "a_marks.csv", "a,b").unwrap();
    common::create_test_file(dir.path(), "b_notes.hi.txt", "translated").unwrap();
    common::create_test_file(dir.path(), "archive.7z", "binary").unwrap();
    common::create_test_file(&nested, "lesson.pdf", "%PDF").unwrap();

    let found = FileManager::find_documents(dir.path()).unwrap();
    let names: Vec<String> = found
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();

    assert_eq!(names, vec!["a_marks.csv", "b_notes.txt", "unit2/lesson.pdf"]);
}

#[test]
fn test_writeToFile_shouldCreateParentDirectories() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("deep").join("er").join("out.txt");

    FileManager::write_to_file(&path, "नमस्ते").unwrap();

    assert!(FileManager::file_exists(&path));
    assert_eq!(FileManager::read_to_string(&path).unwrap(), "नमस्ते");
}

#[test]
fn test_ensureDir_shouldBeIdempotent() {
    let dir = common::create_temp_dir().unwrap();
    let target = dir.path().join("created");

    FileManager::ensure_dir(&target).unwrap();
    FileManager::ensure_dir(&target).unwrap();

    assert!(FileManager::dir_exists(&target));
}

#[test]
fn test_readBytes_withMissingFile_shouldFail() {
    assert!(FileManager::read_bytes("/definitely/not/here.bin").is_err());
}

#[test]
fn test_fileType_display_shouldUseShortName() {
    assert_eq!(FileType::Excel.to_string(), "excel");
    assert_eq!(FileType::from_mime("application/pdf"), FileType::Pdf);
}
