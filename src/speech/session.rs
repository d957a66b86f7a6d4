/*!
 * Live speech translation session.
 *
 * Microphone chunks are buffered until enough audio exists, then the audio
 * is transcribed, the transcript translated, and both appended to running
 * transcripts. A bounded history keeps the most recent utterances.
 */

use chrono::{DateTime, Local};
use log::{debug, info};
use std::collections::VecDeque;
use std::sync::Arc;
use uuid::Uuid;

use crate::app_config::SpeechConfig;
use crate::audio::{AudioBuffer, AudioChunk, AudioSegment};
use crate::errors::AppError;
use crate::language_utils;
use crate::providers::SpeechToText;
use crate::translation::preprocessing::InputKind;
use crate::translation::ChunkedTranslator;
use crate::usage::ApiUsage;

use super::transcriber::{transcribe_segment, TranscriberOptions};

/// One translated utterance
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub source_language: String,
    pub target_language: String,
    pub original: String,
    pub translated: String,
}

/// Stateful speech-to-translation session
#[derive(Debug)]
pub struct LiveSession {
    id: Uuid,
    stt: Arc<dyn SpeechToText>,
    translator: ChunkedTranslator,
    buffer: AudioBuffer,
    transcriber: TranscriberOptions,
    source_language: String,
    target_language: String,
    history_limit: usize,
    history: VecDeque<HistoryEntry>,
    original_transcript: String,
    translated_transcript: String,
    usage: ApiUsage,
}

impl LiveSession {
    /// Create a session
    ///
    /// # Arguments
    /// * `source_language` - Spoken language tag or `auto`
    /// * `target_language` - Language to translate into
    pub fn new(
        stt: Arc<dyn SpeechToText>,
        translator: ChunkedTranslator,
        config: &SpeechConfig,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        let id = Uuid::new_v4();
        debug!("Starting live session {}", id);

        Self {
            id,
            stt,
            translator,
            buffer: AudioBuffer::new(config.min_buffer_secs),
            transcriber: TranscriberOptions::from(config),
            source_language: source_language.into(),
            target_language: target_language.into(),
            history_limit: config.history_limit.max(1),
            history: VecDeque::new(),
            original_transcript: String::new(),
            translated_transcript: String::new(),
            usage: ApiUsage::default(),
        }
    }

    /// Buffer a chunk and process the buffer once it is long enough
    ///
    /// Returns the new history entry when an utterance was translated.
    pub async fn push_chunk(&mut self, chunk: AudioChunk) -> Result<Option<HistoryEntry>, AppError> {
        self.buffer.add_chunk(chunk);
        if !self.buffer.should_flush() {
            return Ok(None);
        }
        self.flush().await
    }

    /// Process whatever is buffered, regardless of its length
    pub async fn flush(&mut self) -> Result<Option<HistoryEntry>, AppError> {
        match self.buffer.drain() {
            Some(segment) => self.process_segment(segment).await,
            None => Ok(None),
        }
    }

    async fn process_segment(&mut self, segment: AudioSegment) -> Result<Option<HistoryEntry>, AppError> {
        debug!("Session {}: processing {:.2}s of buffered audio", self.id, segment.duration_secs());

        let transcript = transcribe_segment(
            self.stt.as_ref(),
            &segment,
            &self.source_language,
            &self.transcriber,
        )
        .await?;

        self.usage += transcript.usage;

        let original = transcript.transcript.trim().to_string();
        if original.is_empty() {
            debug!("No speech recognised in segment");
            return Ok(None);
        }

        let source_language =
            language_utils::resolve_source_code(&self.source_language, transcript.language_code.as_deref());

        let (translated, usage) = self
            .translator
            .translate_text_metered(&original, &source_language, &self.target_language, InputKind::Speech)
            .await?;
        self.usage += usage;

        append_sentence(&mut self.original_transcript, &original);
        append_sentence(&mut self.translated_transcript, &translated.translated_text);

        let entry = HistoryEntry {
            timestamp: Local::now(),
            source_language,
            target_language: self.target_language.clone(),
            original,
            translated: translated.translated_text,
        };
        info!("{} -> {}", entry.original, entry.translated);

        self.history.push_back(entry.clone());
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }

        Ok(Some(entry))
    }

    /// Identifier used in log messages
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Recent utterances, oldest first
    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Everything recognised so far
    pub fn original_transcript(&self) -> &str {
        &self.original_transcript
    }

    /// Everything translated so far
    pub fn translated_transcript(&self) -> &str {
        &self.translated_transcript
    }

    /// API usage since the session started; not reset by `clear`
    pub fn usage(&self) -> ApiUsage {
        self.usage
    }

    /// Seconds of audio waiting in the buffer
    pub fn buffered_secs(&self) -> f64 {
        self.buffer.buffered_secs()
    }

    /// Drop buffered audio, transcripts and history
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.history.clear();
        self.original_transcript.clear();
        self.translated_transcript.clear();
    }
}

fn append_sentence(accumulator: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !accumulator.is_empty() {
        accumulator.push(' ');
    }
    accumulator.push_str(text);
}
