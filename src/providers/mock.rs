/*!
 * Mock provider implementations for testing.
 *
 * These providers simulate the cloud API without any network access:
 * - `MockTranslator::working()` - Always succeeds with a tagged translation
 * - `MockTranslator::failing()` - Always answers with an HTTP 500
 * - `MockTranslator::timing_out()` - Always fails with a timeout
 * - `MockTranslator::scripted(..)` - Plays back one behavior per call
 *
 * Every request is recorded so tests can assert on call counts and payloads.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{
    SpeechRequest, SpeechToText, SynthesizedSpeech, TextToSpeech, Transcript,
    TranscriptionRequest, TranslationRequest, TranslationResponse, Translator,
};

/// Behavior of a single mock call
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Succeeds with `[<target>] <text>`
    Working,
    /// Succeeds with a fixed reply
    Reply(String),
    /// Succeeds with an empty translation
    Empty,
    /// Answers with a non-2xx status
    HttpError(u16),
    /// Fails with a timeout
    Timeout,
    /// Fails to connect
    Unreachable,
    /// Fails every Nth call with an HTTP 503, otherwise works
    Intermittent { fail_every: usize },
    /// Succeeds after a delay
    Slow { delay_ms: u64 },
}

impl MockBehavior {
    fn resolve(&self, call_index: usize, text: &str, target: &str) -> Result<String, ProviderError> {
        match self {
            Self::Working => Ok(format!("[{}] {}", target, text)),
            Self::Reply(reply) => Ok(reply.clone()),
            Self::Empty => Ok(String::new()),
            Self::HttpError(status_code) => Err(ProviderError::ApiError {
                status_code: *status_code,
                message: format!("Simulated failure (request #{})", call_index + 1),
            }),
            Self::Timeout => Err(ProviderError::Timeout("Simulated timeout".to_string())),
            Self::Unreachable => Err(ProviderError::ConnectionError("Simulated connection refusal".to_string())),
            Self::Intermittent { fail_every } => {
                if *fail_every > 0 && call_index % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated intermittent failure (request #{})", call_index + 1),
                    })
                } else {
                    Ok(format!("[{}] {}", target, text))
                }
            }
            Self::Slow { .. } => Ok(format!("[{}] {}", target, text)),
        }
    }
}

/// Mock translator recording every request
#[derive(Debug, Clone)]
pub struct MockTranslator {
    /// Fallback behavior once the script is exhausted
    behavior: MockBehavior,
    /// Per-call behaviors consumed in order
    script: Arc<Mutex<VecDeque<MockBehavior>>>,
    /// Requests received so far
    requests: Arc<Mutex<Vec<TranslationRequest>>>,
    /// Language reported as detected, if any
    detected_language: Option<String>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&TranslationRequest) -> String>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            detected_language: None,
            custom_response: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::HttpError(500))
    }

    pub fn timing_out() -> Self {
        Self::new(MockBehavior::Timeout)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Play back the given behaviors one per call, then keep working
    pub fn scripted(script: Vec<MockBehavior>) -> Self {
        let translator = Self::working();
        translator.script.lock().extend(script);
        translator
    }

    /// Set a custom response generator used for working calls
    pub fn with_custom_response(mut self, generator: fn(&TranslationRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Report this language as detected in every response
    pub fn with_detected_language(mut self, code: impl Into<String>) -> Self {
        self.detected_language = Some(code.into());
        self
    }

    /// Number of calls received
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Copy of every request received, in order
    pub fn requests(&self) -> Vec<TranslationRequest> {
        self.requests.lock().clone()
    }

    /// Texts of every request received, in order
    pub fn request_texts(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.text.clone()).collect()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let call_index = {
            let mut requests = self.requests.lock();
            requests.push(request.clone());
            requests.len() - 1
        };

        let behavior = self.script.lock().pop_front().unwrap_or_else(|| self.behavior.clone());

        if let MockBehavior::Slow { delay_ms } = behavior {
            tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
        }

        let translated_text = match (&behavior, self.custom_response) {
            (MockBehavior::Working, Some(generator)) => generator(request),
            _ => behavior.resolve(call_index, &request.text, &request.target_language)?,
        };

        Ok(TranslationResponse {
            translated_text,
            source_language_code: self.detected_language.clone(),
        })
    }
}

/// Mock speech recognizer returning queued transcripts
#[derive(Debug, Clone, Default)]
pub struct MockSpeechToText {
    /// Results returned in order; once exhausted the fallback is used
    replies: Arc<Mutex<VecDeque<Result<Transcript, MockBehavior>>>>,
    /// Transcript returned once the queue is empty
    fallback: Transcript,
    /// Requests received so far
    requests: Arc<Mutex<Vec<TranscriptionRequest>>>,
}

impl MockSpeechToText {
    /// Always return the given transcript
    pub fn returning(text: impl Into<String>, language_code: Option<&str>) -> Self {
        Self {
            fallback: Transcript {
                transcript: text.into(),
                language_code: language_code.map(str::to_string),
            },
            ..Default::default()
        }
    }

    /// Queue a transcript for the next call
    pub fn push_transcript(&self, text: impl Into<String>, language_code: Option<&str>) {
        self.replies.lock().push_back(Ok(Transcript {
            transcript: text.into(),
            language_code: language_code.map(str::to_string),
        }));
    }

    /// Queue a failure for the next call
    pub fn push_failure(&self, behavior: MockBehavior) {
        self.replies.lock().push_back(Err(behavior));
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<TranscriptionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl SpeechToText for MockSpeechToText {
    async fn transcribe(&self, request: TranscriptionRequest) -> Result<Transcript, ProviderError> {
        let call_index = {
            let mut requests = self.requests.lock();
            requests.push(request);
            requests.len() - 1
        };

        match self.replies.lock().pop_front() {
            Some(Ok(transcript)) => Ok(transcript),
            Some(Err(behavior)) => behavior
                .resolve(call_index, "", "")
                .map(|transcript| Transcript { transcript, language_code: None }),
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Mock speech synthesizer returning fixed bytes
#[derive(Debug, Clone, Default)]
pub struct MockTextToSpeech {
    audio: Vec<u8>,
    requests: Arc<Mutex<Vec<SpeechRequest>>>,
}

impl MockTextToSpeech {
    pub fn returning(audio: Vec<u8>) -> Self {
        Self {
            audio,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl TextToSpeech for MockTextToSpeech {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SynthesizedSpeech, ProviderError> {
        self.requests.lock().push(request.clone());
        Ok(SynthesizedSpeech { audio: self.audio.clone() })
    }
}
