/*!
 * End-to-end tests for document, text and speech workflows through the controller
 */

use anyhow::Result;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use shikshalok::app_config::Config;
use shikshalok::errors::{AppError, ProviderError, TranslationError};
use shikshalok::providers::mock::{MockSpeechToText, MockTextToSpeech, MockTranslator};
use shikshalok::translation::BlockStatus;
use shikshalok::{Controller, FileOutcome};

use crate::common;

/// Controller wired to mock providers, returning the mocks for inspection
fn controller_with(config: Config, translator: &MockTranslator) -> (Controller, MockSpeechToText, MockTextToSpeech) {
    common::init_test_logging();
    let stt = MockSpeechToText::returning("good morning class", Some("en-IN"));
    let tts = MockTextToSpeech::returning(b"RIFF-fake-wav".to_vec());
    let controller = Controller::with_providers(
        config,
        Arc::new(translator.clone()),
        Arc::new(stt.clone()),
        Arc::new(tts.clone()),
    );
    (controller, stt, tts)
}

/// Test translating a text document writes the rendered translation
#[tokio::test]
async fn test_translateFile_withTextDocument_shouldWriteRenderedTranslation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "notes.txt",
        "**Intro**\nHello class.\n\n• Read chapter one",
    )?;
    let translator = MockTranslator::working();
    let (controller, _, _) = controller_with(common::test_config(), &translator);

    let outcome = controller.translate_file(&input, temp_dir.path(), false).await?;

    let report = match outcome {
        FileOutcome::Translated(report) => report,
        other => panic!("Expected a translated document, got {:?}", other),
    };
    assert_eq!(report.output_path, temp_dir.path().join("notes.hi.txt"));
    assert_eq!(report.blocks, 4);
    assert_eq!(report.translated_blocks, 3);
    assert_eq!(report.passed_through_blocks, 0);
    assert_eq!(report.api_calls, 3);
    assert_eq!(report.usage.translate_calls, 3);
    let sent_chars: usize = translator.request_texts().iter().map(|text| text.chars().count()).sum();
    assert_eq!(report.usage.translated_chars, sent_chars);
    assert_eq!(report.usage.stt_calls, 0);

    let written = fs::read_to_string(&report.output_path)?;
    assert!(written.starts_with("TRANSLATED DOCUMENT\n"));
    assert!(written.contains("Original File: notes.txt"));
    assert!(written.contains("Source Language: en-IN"));
    assert!(written.contains("Target Language: hi-IN"));
    assert!(written.contains("[HI-IN] INTRO\n============="));
    assert!(written.contains("[hi-IN] Hello class."));
    assert!(written.contains("• [hi-IN] Read chapter one"));
    assert_eq!(translator.request_texts(), vec!["Intro", "Hello class.", "Read chapter one"]);

    Ok(())
}

/// Test an existing translation is kept unless overwriting is forced
#[tokio::test]
async fn test_translateFile_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "lesson.txt", "Some lesson text.")?;
    let existing = common::create_test_file(temp_dir.path(), "lesson.hi.txt", "old translation")?;
    let translator = MockTranslator::working();
    let (controller, _, _) = controller_with(common::test_config(), &translator);

    let outcome = controller.translate_file(&input, temp_dir.path(), false).await?;

    assert_eq!(outcome, FileOutcome::Skipped { output_path: existing.clone() });
    assert_eq!(translator.call_count(), 0);
    assert_eq!(fs::read_to_string(&existing)?, "old translation");

    let outcome = controller.translate_file(&input, temp_dir.path(), true).await?;

    assert!(matches!(outcome, FileOutcome::Translated(_)));
    assert!(fs::read_to_string(&existing)?.contains("[hi-IN] Some lesson text."));

    Ok(())
}

/// Test the short target code names the output file
#[tokio::test]
async fn test_outputPathFor_shouldUseShortTargetCode() -> Result<()> {
    let mut config = common::test_config();
    config.target_language = "ta".to_string();
    let (controller, _, _) = controller_with(config, &MockTranslator::working());
    let temp_dir = common::create_temp_dir()?;

    let path = controller.output_path_for(&temp_dir.path().join("unit1.docx"), temp_dir.path())?;

    assert_eq!(path, temp_dir.path().join("unit1.ta.txt"));
    Ok(())
}

/// Test a blank document fails without calling the API
#[tokio::test]
async fn test_translateFile_withBlankDocument_shouldReportNoText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "blank.txt", "  \n\n ")?;
    let translator = MockTranslator::working();
    let (controller, _, _) = controller_with(common::test_config(), &translator);

    let result = controller.translate_file(&input, temp_dir.path(), false).await;

    assert!(matches!(result, Err(AppError::NoTextExtracted(_))));
    assert_eq!(translator.call_count(), 0);
    Ok(())
}

/// Test an image reports the missing OCR support
#[tokio::test]
async fn test_translateFile_withImage_shouldReportUnsupportedFormat() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_binary_file(temp_dir.path(), "board.png", &[0x89, b'P', b'N', b'G'])?;
    let (controller, _, _) = controller_with(common::test_config(), &MockTranslator::working());

    let error = controller.translate_file(&input, temp_dir.path(), false).await.unwrap_err();

    assert!(matches!(error, AppError::UnsupportedFormat { ref format, .. } if format == "image"));
    assert_eq!(error.status_code(), 415);
    assert!(!temp_dir.path().join("board.hi.txt").exists());
    Ok(())
}

/// Test a missing input file is reported as a file error
#[tokio::test]
async fn test_translateFile_withMissingInput_shouldReturnFileError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (controller, _, _) = controller_with(common::test_config(), &MockTranslator::working());

    let result = controller
        .translate_file(&temp_dir.path().join("absent.txt"), temp_dir.path(), false)
        .await;

    assert!(matches!(result, Err(AppError::File(_))));
    Ok(())
}

/// Test a transport failure aborts the document and writes nothing
#[tokio::test]
async fn test_translateFile_withTimeout_shouldAbortWithoutOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "notes.txt", "first.\n\nsecond.")?;
    let translator = MockTranslator::timing_out();
    let (controller, _, _) = controller_with(common::test_config(), &translator);

    let error = controller.translate_file(&input, temp_dir.path(), false).await.unwrap_err();

    match error {
        AppError::Translation(TranslationError::Aborted { block_index, ref source }) => {
            assert_eq!(block_index, 0);
            assert!(matches!(source, ProviderError::Timeout(_)));
        }
        ref other => panic!("Expected an aborted translation, got {:?}", other),
    }
    assert_eq!(error.status_code(), 504);
    assert_eq!(translator.call_count(), 1);
    assert!(!temp_dir.path().join("notes.hi.txt").exists());
    Ok(())
}

/// Test a declining API still produces a document with the source text
#[tokio::test]
async fn test_translateFile_withDecliningApi_shouldWriteSourceText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "notes.txt", "keep this sentence.")?;
    let (controller, _, _) = controller_with(common::test_config(), &MockTranslator::failing());

    let outcome = controller.translate_file(&input, temp_dir.path(), false).await?;

    match outcome {
        FileOutcome::Translated(report) => {
            assert_eq!(report.passed_through_blocks, 1);
            let written = fs::read_to_string(&report.output_path)?;
            assert!(written.trim_end().ends_with("keep this sentence."));
        }
        other => panic!("Expected a translated document, got {:?}", other),
    }
    Ok(())
}

/// Test a folder run counts translated, skipped and failed documents
#[tokio::test]
async fn test_runFolder_withMixedDocuments_shouldSummarizeOutcomes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "a_lesson.txt", "Plants need water.")?;
    common::create_test_file(temp_dir.path(), "b_empty.txt", "   ")?;
    common::create_test_file(temp_dir.path(), "c_done.txt", "Already translated.")?;
    common::create_test_file(temp_dir.path(), "c_done.hi.txt", "done")?;
    fs::create_dir(temp_dir.path().join("unit2"))?;
    common::create_test_file(&temp_dir.path().join("unit2"), "marks.csv", "name,marks\nAsha,90")?;
    let translator = MockTranslator::working();
    let (controller, _, _) = controller_with(common::test_config(), &translator);

    let summary = controller.run_folder(temp_dir.path(), false).await?;

    assert_eq!(
        (summary.translated, summary.skipped, summary.failed),
        (2, 1, 1)
    );
    assert_eq!(summary.usage.translate_calls, translator.call_count());
    assert!(temp_dir.path().join("a_lesson.hi.txt").exists());
    assert!(temp_dir.path().join("unit2").join("marks.hi.txt").exists());
    assert!(!temp_dir.path().join("b_empty.hi.txt").exists());
    Ok(())
}

/// Test a folder without documents is an error
#[tokio::test]
async fn test_runFolder_withoutDocuments_shouldReturnFileError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "archive.7z", "x")?;
    let (controller, _, _) = controller_with(common::test_config(), &MockTranslator::working());

    let result = controller.run_folder(temp_dir.path(), false).await;

    assert!(matches!(result, Err(AppError::File(_))));
    Ok(())
}

/// Test free text is translated into the configured target
#[tokio::test]
async fn test_translateText_shouldUseConfiguredLanguages() -> Result<()> {
    let mut config = common::test_config();
    config.target_language = "bn".to_string();
    let translator = MockTranslator::working();
    let (controller, _, _) = controller_with(config, &translator);

    let block = controller.translate_text("Good morning").await?;

    assert_eq!(block.translated_text, "[bn-IN] Good morning");
    assert_eq!(block.status, BlockStatus::Translated);
    assert_eq!(translator.requests()[0].source_language, "en-IN");
    Ok(())
}

/// Test transcribing a recording returns the recognised text
#[tokio::test]
async fn test_transcribeFile_withRecording_shouldReturnTranscript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_binary_file(temp_dir.path(), "lecture.wav", &common::wav_bytes(8000, 1.0))?;
    let (controller, stt, _) = controller_with(common::test_config(), &MockTranslator::working());

    let transcript = controller.transcribe_file(&path).await?;

    assert_eq!(transcript.transcript, "good morning class");
    assert_eq!(transcript.language_code.as_deref(), Some("en-IN"));
    assert_eq!(stt.call_count(), 1);
    assert_eq!(stt.requests()[0].language_code, "en-IN");
    assert_eq!(transcript.usage.stt_calls, 1);
    assert_eq!(transcript.usage.transcribed_audio, Duration::from_secs(1));
    Ok(())
}

/// Controller with an `auto` source whose recognizer reports `detected`
fn auto_source_controller(detected: Option<&str>, translator: &MockTranslator) -> Controller {
    common::init_test_logging();
    let mut config = common::test_config();
    config.source_language = "auto".to_string();
    config.target_language = "en-IN".to_string();
    Controller::with_providers(
        config,
        Arc::new(translator.clone()),
        Arc::new(MockSpeechToText::returning("வணக்கம் மாணவர்களே", detected)),
        Arc::new(MockTextToSpeech::default()),
    )
}

/// Test a transcript is translated from the language the recognizer detected
#[tokio::test]
async fn test_translateTranscript_withAutoSource_shouldUseDetectedLanguage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_binary_file(temp_dir.path(), "class.wav", &common::wav_bytes(16000, 1.0))?;
    let translator = MockTranslator::working();
    let controller = auto_source_controller(Some("ta-IN"), &translator);

    let transcript = controller.transcribe_file(&path).await?;
    let translation = controller.translate_transcript(&transcript).await?;

    assert_eq!(translation.source_language, "ta-IN");
    assert_eq!(translation.block.translated_text, "[en-IN] வணக்கம் மாணவர்களே");
    assert_eq!(translator.requests()[0].source_language, "ta-IN");
    assert_eq!(translator.requests()[0].target_language, "en-IN");

    assert_eq!(translation.usage.stt_calls, 1);
    assert_eq!(translation.usage.translate_calls, 1);
    assert_eq!(translation.usage.translated_chars, "வணக்கம் மாணவர்களே".chars().count());
    Ok(())
}

/// Test an `auto` source stays `auto` when no language was detected
#[tokio::test]
async fn test_translateTranscript_withoutDetectedLanguage_shouldFallBackToAuto() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_binary_file(temp_dir.path(), "class.wav", &common::wav_bytes(16000, 1.0))?;
    let translator = MockTranslator::working();
    let controller = auto_source_controller(None, &translator);

    let transcript = controller.transcribe_file(&path).await?;
    let translation = controller.translate_transcript(&transcript).await?;

    assert_eq!(translation.source_language, "auto");
    assert_eq!(translator.requests()[0].source_language, "auto");
    Ok(())
}

/// Test a configured source language wins over the detected one
#[tokio::test]
async fn test_translateTranscript_withFixedSource_shouldIgnoreDetectedLanguage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_binary_file(temp_dir.path(), "class.wav", &common::wav_bytes(16000, 1.0))?;
    let translator = MockTranslator::working();
    let (controller, _, _) = controller_with(common::test_config(), &translator);

    let transcript = controller.transcribe_file(&path).await?;
    let translation = controller.translate_transcript(&transcript).await?;

    assert_eq!(translation.source_language, "en-IN");
    assert_eq!(translation.block.translated_text, "[hi-IN] good morning class");
    Ok(())
}

/// Test silence is reported as a missing transcript
#[tokio::test]
async fn test_transcribeFile_withNothingRecognised_shouldReturnNoTranscript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_binary_file(temp_dir.path(), "quiet.wav", &common::wav_bytes(16000, 0.5))?;
    let stt = MockSpeechToText::returning("", None);
    let controller = Controller::with_providers(
        common::test_config(),
        Arc::new(MockTranslator::working()),
        Arc::new(stt),
        Arc::new(MockTextToSpeech::default()),
    );

    let result = controller.transcribe_file(&path).await;

    assert!(matches!(result, Err(AppError::NoTranscript(_))));
    Ok(())
}

/// Test synthesized audio is written to the requested path
#[tokio::test]
async fn test_speak_shouldWriteSynthesizedAudio() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("audio").join("hello.wav");
    let (controller, _, tts) = controller_with(common::test_config(), &MockTranslator::working());

    let written = controller.speak("नमस्ते", &output).await?;

    assert_eq!(written, output);
    assert_eq!(fs::read(&output)?, b"RIFF-fake-wav".to_vec());
    assert_eq!(tts.call_count(), 1);

    let result = controller.speak("   ", &output).await;
    assert!(matches!(result, Err(AppError::NoTextExtracted(_))));
    assert_eq!(tts.call_count(), 1);
    Ok(())
}

/// Test a recording replayed as a stream is processed in buffered pieces
#[tokio::test]
async fn test_streamFile_shouldTranslateEveryBufferedPiece() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_binary_file(temp_dir.path(), "talk.wav", &common::wav_bytes(16000, 5.0))?;
    let translator = MockTranslator::working();
    let (controller, stt, _) = controller_with(common::test_config(), &translator);

    let session = controller.stream_file(&path).await?;

    // 2s + 2s from full buffers, 1s from the final flush
    assert_eq!(stt.call_count(), 3);
    assert_eq!(session.history_len(), 3);
    assert_eq!(
        session.original_transcript(),
        "good morning class good morning class good morning class"
    );
    assert!(session.translated_transcript().starts_with("[hi-IN] good morning class"));
    assert_eq!(session.buffered_secs(), 0.0);
    Ok(())
}

/// Test the status listing covers every format
#[tokio::test]
async fn test_status_shouldListFormatAvailability() -> Result<()> {
    let mut config = common::test_config();
    config.documents.pdf = false;
    let (controller, _, _) = controller_with(config, &MockTranslator::working());

    let status = controller.status();

    assert_eq!(status.len(), 7);
    assert!(status
        .iter()
        .any(|(file_type, reason)| file_type.name() == "pdf" && reason.is_some()));
    assert!(status
        .iter()
        .any(|(file_type, reason)| file_type.name() == "docx" && reason.is_none()));
    Ok(())
}
