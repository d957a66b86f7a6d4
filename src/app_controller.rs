use chrono::Local;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::audio::{AudioChunk, AudioSegment};
use crate::errors::AppError;
use crate::export::{render_document, ExportHeader};
use crate::extraction::{Extraction, ExtractorRegistry};
use crate::file_utils::{FileManager, FileType};
use crate::language_utils;
use crate::providers::sarvam::Sarvam;
use crate::providers::{SpeechRequest, SpeechToText, TextToSpeech, Translator};
use crate::speech::{transcribe_segment, LiveSession, SegmentTranscript, TranscriberOptions};
use crate::translation::preprocessing::InputKind;
use crate::translation::{segment_text, ChunkedTranslator, TranslatedBlock, TranslatorOptions};
use crate::usage::{format_duration, ApiUsage};

// @module: Application controller for document, text and speech translation

/// Result of translating one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The document was translated and written
    Translated(FileReport),
    /// An output file already existed and overwriting was not requested
    Skipped { output_path: PathBuf },
}

/// Statistics of a translated document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub output_path: PathBuf,
    pub blocks: usize,
    pub translated_blocks: usize,
    pub passed_through_blocks: usize,
    pub api_calls: usize,
    pub usage: ApiUsage,
}

/// Counts from a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub translated: usize,
    pub skipped: usize,
    pub failed: usize,
    /// API usage of the translated documents
    pub usage: ApiUsage,
}

/// A transcript translated from the language it was spoken in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechTranslation {
    /// Language the transcript was translated from
    pub source_language: String,
    pub block: TranslatedBlock,
    /// Recognition and translation usage together
    pub usage: ApiUsage,
}

/// Main application controller
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Structure-preserving document translator
    translator: ChunkedTranslator,
    // @field: Speech recognition backend
    stt: Arc<dyn SpeechToText>,
    // @field: Speech synthesis backend
    tts: Arc<dyn TextToSpeech>,
    // @field: Document format handlers
    extractors: ExtractorRegistry,
}

impl Controller {
    // @method: Create a controller talking to the Sarvam API
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let client = Arc::new(Sarvam::from_config(&config)?);
        Ok(Self::with_providers(config, client.clone(), client.clone(), client))
    }

    /// Create a controller with explicit provider backends
    pub fn with_providers(
        config: Config,
        translator: Arc<dyn Translator>,
        stt: Arc<dyn SpeechToText>,
        tts: Arc<dyn TextToSpeech>,
    ) -> Self {
        let translator = ChunkedTranslator::new(translator, TranslatorOptions::from(&config.translation));
        let extractors = ExtractorRegistry::from_config(&config.documents);

        Self {
            config,
            translator,
            stt,
            tts,
            extractors,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn source_code(&self) -> Result<String, AppError> {
        self.config.source_code().map_err(|e| AppError::Config(e.to_string()))
    }

    fn target_code(&self) -> Result<String, AppError> {
        self.config.target_code().map_err(|e| AppError::Config(e.to_string()))
    }

    /// Output path of the translation of `input_file`
    pub fn output_path_for(&self, input_file: &Path, output_dir: &Path) -> Result<PathBuf, AppError> {
        let target = language_utils::short_code(&self.target_code()?);
        Ok(FileManager::generate_output_path(input_file, output_dir, &target, "txt"))
    }

    /// Translate one document and write the rendered result to `output_dir`
    pub async fn translate_file(
        &self,
        input_file: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<FileOutcome, AppError> {
        let multi_progress = MultiProgress::new();
        self.translate_file_with_progress(input_file, output_dir, force_overwrite, &multi_progress)
            .await
    }

    async fn translate_file_with_progress(
        &self,
        input_file: &Path,
        output_dir: &Path,
        force_overwrite: bool,
        multi_progress: &MultiProgress,
    ) -> Result<FileOutcome, AppError> {
        let start_time = Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(AppError::File(format!("Input file does not exist: {:?}", input_file)));
        }

        let output_path = self.output_path_for(input_file, output_dir)?;
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, translation already exists (use -f to force overwrite)", input_file);
            return Ok(FileOutcome::Skipped { output_path });
        }

        let text = match self.extractors.extract_file(input_file)? {
            Extraction::Text(text) => text,
            Extraction::Unsupported { format, reason } => {
                return Err(AppError::UnsupportedFormat { format, reason });
            }
        };

        if text.trim().is_empty() {
            return Err(AppError::NoTextExtracted(input_file.display().to_string()));
        }

        let source = self.source_code()?;
        let target = self.target_code()?;
        let blocks = segment_text(&text);

        let progress_bar = multi_progress.add(ProgressBar::new(blocks.len() as u64));
        progress_bar.set_style(progress_style("blocks"));
        progress_bar.set_message(file_name(input_file));

        let result = self
            .translator
            .translate_blocks_with_progress(&blocks, &source, &target, |done, _| {
                progress_bar.set_position(done as u64);
            })
            .await;

        let document = match result {
            Ok(document) => {
                progress_bar.finish_and_clear();
                document
            }
            Err(e) => {
                progress_bar.abandon_with_message("aborted");
                return Err(e.into());
            }
        };

        let header = ExportHeader {
            original_file: file_name(input_file),
            source_language: source,
            target_language: target,
            timestamp: Local::now(),
        };
        let rendered = render_document(&document.text(), &header);
        FileManager::write_to_file(&output_path, &rendered).map_err(|e| AppError::File(e.to_string()))?;

        info!(
            "Success: {} ({})",
            output_path.display(),
            format_duration(start_time.elapsed())
        );
        info!("{}", document.usage.summary(&self.config.costs));

        Ok(FileOutcome::Translated(FileReport {
            output_path,
            blocks: document.blocks.len(),
            translated_blocks: document.translated_count(),
            passed_through_blocks: document.passthrough_count(),
            api_calls: document.api_calls,
            usage: document.usage,
        }))
    }

    /// Translate every supported document below `input_dir`, next to its source
    pub async fn run_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<FolderSummary, AppError> {
        if !FileManager::dir_exists(input_dir) {
            return Err(AppError::File(format!("Input directory does not exist: {:?}", input_dir)));
        }

        let documents = FileManager::find_documents(input_dir).map_err(|e| AppError::File(e.to_string()))?;
        if documents.is_empty() {
            return Err(AppError::File(format!("No documents found in directory: {:?}", input_dir)));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(documents.len() as u64));
        folder_pb.set_style(progress_style("files"));

        let mut summary = FolderSummary::default();
        for document in &documents {
            folder_pb.set_message(format!("Processing: {}", file_name(document)));
            let output_dir = document.parent().unwrap_or(input_dir);

            match self
                .translate_file_with_progress(document, output_dir, force_overwrite, &multi_progress)
                .await
            {
                Ok(FileOutcome::Translated(report)) => {
                    summary.translated += 1;
                    summary.usage += report.usage;
                }
                Ok(FileOutcome::Skipped { .. }) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {}", file_name(document), e);
                    summary.failed += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");
        info!(
            "Folder processing completed: {} translated, {} skipped, {} errors",
            summary.translated, summary.skipped, summary.failed
        );
        info!("Total: {}", summary.usage.summary(&self.config.costs));

        Ok(summary)
    }

    /// Translate a piece of free text
    pub async fn translate_text(&self, text: &str) -> Result<TranslatedBlock, AppError> {
        let source = self.source_code()?;
        let target = self.target_code()?;
        Ok(self.translator.translate_text(text, &source, &target).await?)
    }

    /// Transcribe a WAV file in the configured source language
    pub async fn transcribe_file(&self, input_file: &Path) -> Result<SegmentTranscript, AppError> {
        let segment = AudioSegment::from_wav_file(input_file)?;
        info!(
            "Transcribing {:.1}s of audio from {:?}",
            segment.duration_secs(),
            input_file
        );

        let options = TranscriberOptions::from(&self.config.speech);
        let transcript = transcribe_segment(self.stt.as_ref(), &segment, &self.source_code()?, &options).await?;
        info!("{}", transcript.usage.summary(&self.config.costs));

        if transcript.transcript.trim().is_empty() {
            return Err(AppError::NoTranscript(input_file.display().to_string()));
        }
        Ok(transcript)
    }

    /// Translate a transcript into the target language
    ///
    /// With an `auto` source the language the recognizer detected is used,
    /// falling back to `auto` when none was reported.
    pub async fn translate_transcript(&self, transcript: &SegmentTranscript) -> Result<SpeechTranslation, AppError> {
        let source_language =
            language_utils::resolve_source_code(&self.source_code()?, transcript.language_code.as_deref());
        let target = self.target_code()?;
        debug!("Translating transcript from {} to {}", source_language, target);

        let (block, translate_usage) = self
            .translator
            .translate_text_metered(&transcript.transcript, &source_language, &target, InputKind::Speech)
            .await?;

        let mut usage = transcript.usage;
        usage += translate_usage;
        info!("{}", usage.summary(&self.config.costs));

        Ok(SpeechTranslation {
            source_language,
            block,
            usage,
        })
    }

    /// Synthesize speech in the target language and save it to `output_file`
    pub async fn speak(&self, text: &str, output_file: &Path) -> Result<PathBuf, AppError> {
        let request = SpeechRequest {
            text: text.trim().to_string(),
            target_language: self.target_code()?,
        };
        if request.text.is_empty() {
            return Err(AppError::NoTextExtracted("nothing to speak".to_string()));
        }

        let started = Instant::now();
        let speech = self.tts.synthesize(&request).await?;
        let mut usage = ApiUsage::default();
        usage.record_synthesis(&request.text, started.elapsed());
        info!("{}", usage.summary(&self.config.costs));

        FileManager::write_bytes(output_file, &speech.audio).map_err(|e| AppError::File(e.to_string()))?;

        info!("Success: {} ({} bytes)", output_file.display(), speech.audio.len());
        Ok(output_file.to_path_buf())
    }

    /// New live session using the configured languages
    pub fn live_session(&self) -> Result<LiveSession, AppError> {
        Ok(LiveSession::new(
            self.stt.clone(),
            self.translator.clone(),
            &self.config.speech,
            self.source_code()?,
            self.target_code()?,
        ))
    }

    /// Feed a WAV file through a live session in microphone-sized chunks
    ///
    /// Returns the finished session so its history and transcripts can be read.
    pub async fn stream_file(&self, input_file: &Path) -> Result<LiveSession, AppError> {
        let segment = AudioSegment::from_wav_file(input_file)?;
        let mut session = self.live_session()?;

        let chunk_len = (segment.sample_rate as u64 * self.config.speech.stream_chunk_ms / 1000).max(1) as usize;
        debug!(
            "Streaming {:.1}s of audio in chunks of {} samples",
            segment.duration_secs(),
            chunk_len
        );

        for samples in segment.samples.chunks(chunk_len) {
            let chunk = AudioChunk::mono_i16(segment.sample_rate, samples.to_vec());
            if let Some(entry) = session.push_chunk(chunk).await? {
                println!("{}\n  -> {}", entry.original, entry.translated);
            }
        }

        if let Some(entry) = session.flush().await? {
            println!("{}\n  -> {}", entry.original, entry.translated);
        }

        Ok(session)
    }

    /// Availability of every document format
    pub fn status(&self) -> Vec<(FileType, Option<String>)> {
        self.extractors.capabilities()
    }
}

fn progress_style(unit: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}}",
            unit
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
