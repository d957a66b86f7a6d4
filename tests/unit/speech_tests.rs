/*!
 * Tests for segment transcription
 */

use std::time::Duration;

use shikshalok::audio::AudioSegment;
use shikshalok::errors::{AppError, AudioError};
use shikshalok::providers::mock::{MockBehavior, MockSpeechToText};
use shikshalok::speech::{transcribe_segment, TranscriberOptions};

fn seconds_of_audio(sample_rate: u32, seconds: usize) -> AudioSegment {
    AudioSegment::new(sample_rate, vec![500; sample_rate as usize * seconds])
}

#[tokio::test]
async fn test_transcribeSegment_withShortAudio_shouldMakeOneCall() {
    let stt = MockSpeechToText::returning("namaste", Some("hi-IN"));

    let transcript = transcribe_segment(&stt, &seconds_of_audio(16000, 2), "hi-IN", &TranscriberOptions::default())
        .await
        .unwrap();

    assert_eq!(transcript.transcript, "namaste");
    assert_eq!(transcript.language_code.as_deref(), Some("hi-IN"));
    assert_eq!(stt.call_count(), 1);
    assert_eq!(stt.requests()[0].language_code, "hi-IN");
}

#[tokio::test]
async fn test_transcribeSegment_shouldUploadAudioAtTargetRate() {
    let stt = MockSpeechToText::returning("hello", None);

    transcribe_segment(&stt, &seconds_of_audio(48000, 1), "en-IN", &TranscriberOptions::default())
        .await
        .unwrap();

    let uploaded = AudioSegment::from_wav_bytes(&stt.requests()[0].wav_bytes).unwrap();
    assert_eq!(uploaded.sample_rate, 16000);
    assert_eq!(uploaded.samples.len(), 16000);
}

#[tokio::test]
async fn test_transcribeSegment_withLongAudio_shouldJoinWindowTranscripts() {
    let stt = MockSpeechToText::default();
    stt.push_transcript("first part", Some("ta-IN"));
    stt.push_transcript("second part", Some("hi-IN"));
    stt.push_transcript("third part", None);
    let options = TranscriberOptions {
        target_sample_rate: 1000,
        max_window_secs: 2.0,
    };

    let transcript = transcribe_segment(&stt, &seconds_of_audio(1000, 5), "auto", &options)
        .await
        .unwrap();

    assert_eq!(stt.call_count(), 3);
    assert_eq!(transcript.transcript, "first part second part third part");
    assert_eq!(transcript.language_code.as_deref(), Some("ta-IN"));
    assert_eq!(transcript.usage.stt_calls, 3);
    assert_eq!(transcript.usage.transcribed_audio, Duration::from_secs(5));
}

#[tokio::test]
async fn test_transcribeSegment_withDeclinedWindow_shouldSkipAndNotBillIt() {
    let stt = MockSpeechToText::default();
    stt.push_transcript("kept", None);
    stt.push_failure(MockBehavior::HttpError(500));
    stt.push_transcript("also kept", None);
    let options = TranscriberOptions {
        target_sample_rate: 1000,
        max_window_secs: 1.0,
    };

    let transcript = transcribe_segment(&stt, &seconds_of_audio(1000, 3), "en-IN", &options)
        .await
        .unwrap();

    assert_eq!(transcript.transcript, "kept also kept");
    assert_eq!(stt.call_count(), 3);
    assert_eq!(transcript.usage.stt_calls, 2);
    assert_eq!(transcript.usage.transcribed_audio, Duration::from_secs(2));
}

#[tokio::test]
async fn test_transcribeSegment_withTimeout_shouldFail() {
    let stt = MockSpeechToText::default();
    stt.push_failure(MockBehavior::Timeout);

    let result = transcribe_segment(&stt, &seconds_of_audio(16000, 1), "en-IN", &TranscriberOptions::default()).await;

    let error = result.unwrap_err();
    assert!(matches!(error, AppError::Provider(_)));
    assert_eq!(error.status_code(), 504);
}

#[tokio::test]
async fn test_transcribeSegment_withEmptySegment_shouldFailWithoutCall() {
    let stt = MockSpeechToText::returning("unused", None);

    let result = transcribe_segment(&stt, &AudioSegment::new(16000, Vec::new()), "en-IN", &TranscriberOptions::default()).await;

    assert!(matches!(result, Err(AppError::Audio(AudioError::Empty))));
    assert_eq!(stt.call_count(), 0);
}
