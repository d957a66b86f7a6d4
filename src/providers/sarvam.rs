use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, error};
use reqwest::{Client, StatusCode, multipart};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::ProviderError;
use crate::providers::{
    SpeechRequest, SpeechToText, SynthesizedSpeech, TextToSpeech, Transcript,
    TranscriptionRequest, TranslationRequest, TranslationResponse, Translator,
};

/// Header carrying the subscription key
const AUTH_HEADER: &str = "api-subscription-key";

/// Client for the Sarvam speech and translation API
#[derive(Debug, Clone)]
pub struct Sarvam {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Base URL without trailing slash
    base_url: String,
    /// Fixed translation parameters
    translation: TranslationSettings,
    /// Fixed speech synthesis parameters
    voice: VoiceSettings,
    /// STT model, empty for the API default
    stt_model: String,
}

/// Parameters sent with every translation request
#[derive(Debug, Clone)]
pub struct TranslationSettings {
    pub model: String,
    pub mode: String,
    pub speaker_gender: String,
    pub enable_preprocessing: bool,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            model: "mayura:v1".to_string(),
            mode: "formal".to_string(),
            speaker_gender: "Male".to_string(),
            enable_preprocessing: true,
        }
    }
}

/// Parameters sent with every speech synthesis request
#[derive(Debug, Clone)]
pub struct VoiceSettings {
    pub speaker: String,
    pub pitch: f32,
    pub pace: f32,
    pub loudness: f32,
    pub sample_rate: u32,
    pub model: String,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            speaker: "meera".to_string(),
            pitch: 0.0,
            pace: 1.0,
            loudness: 1.0,
            sample_rate: 22050,
            model: "bulbul:v1".to_string(),
        }
    }
}

/// Translation request body
#[derive(Debug, Serialize)]
struct TranslatePayload<'a> {
    input: &'a str,
    source_language_code: &'a str,
    target_language_code: &'a str,
    speaker_gender: &'a str,
    mode: &'a str,
    model: &'a str,
    enable_preprocessing: bool,
}

/// Translation response body
#[derive(Debug, Deserialize)]
struct TranslateReply {
    #[serde(default)]
    translated_text: String,
    #[serde(default)]
    source_language_code: Option<String>,
}

/// Transcription response body
#[derive(Debug, Deserialize)]
struct TranscribeReply {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    language_code: Option<String>,
}

/// Speech synthesis request body
#[derive(Debug, Serialize)]
struct SpeakPayload<'a> {
    inputs: Vec<&'a str>,
    target_language_code: &'a str,
    speaker: &'a str,
    pitch: f32,
    pace: f32,
    loudness: f32,
    speech_sample_rate: u32,
    enable_preprocessing: bool,
    model: &'a str,
}

/// Speech synthesis response body
#[derive(Debug, Deserialize)]
struct SpeakReply {
    #[serde(default)]
    audios: Vec<String>,
    #[serde(default)]
    audio_content: Option<String>,
}

impl Sarvam {
    /// Create a new client
    ///
    /// # Arguments
    /// * `api_key` - Subscription key
    /// * `base_url` - Service base URL
    /// * `connect_timeout` - Limit for establishing a connection
    /// * `read_timeout` - Limit for the whole request once connected
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(read_timeout)
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            translation: TranslationSettings::default(),
            voice: VoiceSettings::default(),
            stt_model: String::new(),
        })
    }

    /// Create a client from the application configuration
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let client = Self::new(
            config.api.api_key.clone(),
            config.api.base_url.clone(),
            Duration::from_secs(config.api.connect_timeout_secs),
            Duration::from_secs(config.api.read_timeout_secs),
        )?;

        Ok(client
            .with_translation_settings(TranslationSettings {
                model: config.translation.model.clone(),
                mode: config.translation.mode.clone(),
                speaker_gender: config.translation.speaker_gender.clone(),
                enable_preprocessing: config.translation.enable_preprocessing,
            })
            .with_voice_settings(VoiceSettings {
                speaker: config.voice.speaker.clone(),
                pitch: config.voice.pitch,
                pace: config.voice.pace,
                loudness: config.voice.loudness,
                sample_rate: config.voice.sample_rate,
                model: config.voice.model.clone(),
            })
            .with_stt_model(config.speech.model.clone()))
    }

    pub fn with_translation_settings(mut self, settings: TranslationSettings) -> Self {
        self.translation = settings;
        self
    }

    pub fn with_voice_settings(mut self, settings: VoiceSettings) -> Self {
        self.voice = settings;
        self
    }

    pub fn with_stt_model(mut self, model: impl Into<String>) -> Self {
        self.stt_model = model.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Send a prepared request and return the body of a successful response
    async fn execute(&self, builder: reqwest::RequestBuilder, endpoint: &str) -> Result<String, ProviderError> {
        let response = builder
            .header(AUTH_HEADER, &self.api_key)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            error!("Sarvam {} error ({}): {}", endpoint, status, body);
            return Err(map_status_error(status, body));
        }

        debug!("Sarvam {} responded {} ({} bytes)", endpoint, status, body.len());
        Ok(body)
    }
}

/// Map a reqwest failure that happened before a status was available
fn map_transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else if e.is_connect() {
        ProviderError::ConnectionError(e.to_string())
    } else {
        ProviderError::RequestFailed(e.to_string())
    }
}

/// Map a non-2xx response to the matching provider error
fn map_status_error(status: StatusCode, body: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(body),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(body),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message: body,
        },
    }
}

fn parse_body<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::ParseError(e.to_string()))
}

#[async_trait]
impl Translator for Sarvam {
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let payload = TranslatePayload {
            input: &request.text,
            source_language_code: &request.source_language,
            target_language_code: &request.target_language,
            speaker_gender: &self.translation.speaker_gender,
            mode: &self.translation.mode,
            model: &self.translation.model,
            enable_preprocessing: self.translation.enable_preprocessing,
        };

        let builder = self.client.post(self.url("translate")).json(&payload);
        let body = self.execute(builder, "translate").await?;
        let reply: TranslateReply = parse_body(&body)?;

        Ok(TranslationResponse {
            translated_text: reply.translated_text,
            source_language_code: reply.source_language_code,
        })
    }
}

#[async_trait]
impl SpeechToText for Sarvam {
    async fn transcribe(&self, request: TranscriptionRequest) -> Result<Transcript, ProviderError> {
        let file = multipart::Part::bytes(request.wav_bytes)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let mut form = multipart::Form::new()
            .part("file", file)
            .text("language_code", request.language_code);
        if !self.stt_model.is_empty() {
            form = form.text("model", self.stt_model.clone());
        }

        let builder = self.client.post(self.url("speech-to-text")).multipart(form);
        let body = self.execute(builder, "speech-to-text").await?;
        let reply: TranscribeReply = parse_body(&body)?;

        Ok(Transcript {
            transcript: reply.transcript,
            language_code: reply.language_code,
        })
    }
}

#[async_trait]
impl TextToSpeech for Sarvam {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SynthesizedSpeech, ProviderError> {
        let payload = SpeakPayload {
            inputs: vec![&request.text],
            target_language_code: &request.target_language,
            speaker: &self.voice.speaker,
            pitch: self.voice.pitch,
            pace: self.voice.pace,
            loudness: self.voice.loudness,
            speech_sample_rate: self.voice.sample_rate,
            enable_preprocessing: true,
            model: &self.voice.model,
        };

        let builder = self.client.post(self.url("text-to-speech")).json(&payload);
        let body = self.execute(builder, "text-to-speech").await?;
        let reply: SpeakReply = parse_body(&body)?;

        let encoded = reply
            .audios
            .into_iter()
            .next()
            .or(reply.audio_content)
            .ok_or_else(|| ProviderError::ParseError("No audio in text-to-speech response".to_string()))?;

        let audio = BASE64
            .decode(encoded.trim())
            .map_err(|e| ProviderError::ParseError(format!("Invalid base64 audio: {}", e)))?;

        Ok(SynthesizedSpeech { audio })
    }
}
