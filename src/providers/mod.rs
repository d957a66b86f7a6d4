/*!
 * Provider interfaces for the speech and translation services.
 *
 * The application talks to the cloud API through three narrow traits so that
 * the pipelines can be exercised against mocks:
 * - `Translator`: text-to-text translation
 * - `SpeechToText`: transcription of WAV audio
 * - `TextToSpeech`: speech synthesis
 *
 * `sarvam` holds the HTTP client implementing all three, `mock` holds
 * scripted in-memory implementations.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A single text translation request
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    /// Text to translate, already stripped of structural markers
    pub text: String,
    /// Source language tag (`hi-IN`, ...) or `auto`
    pub source_language: String,
    /// Target language tag
    pub target_language: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// Response of a successful translation call
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResponse {
    /// Translated text as returned by the API (may contain HTML entities)
    pub translated_text: String,
    /// Detected source language, when the API reports one
    pub source_language_code: Option<String>,
}

/// A transcription request carrying a complete WAV file
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// WAV bytes (mono, 16-bit)
    pub wav_bytes: Vec<u8>,
    /// Language hint or `auto`
    pub language_code: String,
}

/// Response of a transcription call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transcript {
    /// Recognised text, possibly empty
    pub transcript: String,
    /// Detected language tag, when reported
    pub language_code: Option<String>,
}

/// A speech synthesis request
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    /// Text to speak
    pub text: String,
    /// Language of the text
    pub target_language: String,
}

/// Synthesized audio
#[derive(Debug, Clone)]
pub struct SynthesizedSpeech {
    /// Encoded audio (WAV) as returned by the API
    pub audio: Vec<u8>,
}

/// Text-to-text translation service
///
/// # Returns
/// * `Ok(TranslationResponse)` - the API answered with a translation
/// * `Err(ProviderError)` - see `ProviderError::is_fatal` for how callers react
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, ProviderError>;
}

/// Speech recognition service
#[async_trait]
pub trait SpeechToText: Send + Sync + Debug {
    async fn transcribe(&self, request: TranscriptionRequest) -> Result<Transcript, ProviderError>;
}

/// Speech synthesis service
#[async_trait]
pub trait TextToSpeech: Send + Sync + Debug {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SynthesizedSpeech, ProviderError>;
}

pub mod mock;
pub mod sarvam;
