/*!
 * Speech recognition of audio segments.
 *
 * Audio is converted to the recognizer's sample rate and, when longer than
 * the window length, sent as consecutive windows whose transcripts are
 * joined with spaces.
 */

use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::app_config::SpeechConfig;
use crate::audio::AudioSegment;
use crate::errors::{AppError, AudioError};
use crate::providers::{SpeechToText, TranscriptionRequest};
use crate::usage::ApiUsage;

/// Transcription parameters
#[derive(Debug, Clone)]
pub struct TranscriberOptions {
    /// Sample rate of uploaded audio
    pub target_sample_rate: u32,
    /// Longest window sent in one call
    pub max_window_secs: f64,
}

impl Default for TranscriberOptions {
    fn default() -> Self {
        Self {
            target_sample_rate: 16000,
            max_window_secs: 30.0,
        }
    }
}

impl From<&SpeechConfig> for TranscriberOptions {
    fn from(config: &SpeechConfig) -> Self {
        Self {
            target_sample_rate: config.target_sample_rate,
            max_window_secs: config.max_window_secs,
        }
    }
}

/// Transcript of a whole segment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentTranscript {
    /// Window transcripts joined with spaces, possibly empty
    pub transcript: String,
    /// First language reported by any window
    pub language_code: Option<String>,
    /// Recognition calls that were answered
    pub usage: ApiUsage,
}

/// Transcribe a segment, splitting it into windows when needed
///
/// A window the API declines contributes nothing; a transport failure
/// aborts. The returned transcript is empty when nothing was recognised.
/// The detected language is the first one reported by any window.
pub async fn transcribe_segment(
    stt: &dyn SpeechToText,
    segment: &AudioSegment,
    language_code: &str,
    options: &TranscriberOptions,
) -> Result<SegmentTranscript, AppError> {
    if segment.is_empty() {
        return Err(AudioError::Empty.into());
    }

    let audio = segment.resample(options.target_sample_rate);
    let windows = audio.split_windows(options.max_window_secs);
    if windows.len() > 1 {
        info!(
            "Audio is {:.1}s long, transcribing in {} windows",
            audio.duration_secs(),
            windows.len()
        );
    }

    let mut texts = Vec::new();
    let mut detected_language = None;
    let mut usage = ApiUsage::default();

    for (index, window) in windows.iter().enumerate() {
        let request = TranscriptionRequest {
            wav_bytes: window.to_wav_bytes()?,
            language_code: language_code.to_string(),
        };

        let started = Instant::now();
        match stt.transcribe(request).await {
            Ok(transcript) => {
                usage.record_transcription(Duration::from_secs_f64(window.duration_secs()), started.elapsed());
                let text = transcript.transcript.trim();
                if text.is_empty() {
                    debug!("Window {} returned no transcript", index + 1);
                    continue;
                }
                texts.push(text.to_string());
                if detected_language.is_none() {
                    detected_language = transcript.language_code.filter(|code| !code.trim().is_empty());
                }
            }
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => warn!("Window {} was not transcribed: {}", index + 1, e),
        }
    }

    Ok(SegmentTranscript {
        transcript: texts.join(" "),
        language_code: detected_language,
        usage,
    })
}
