/*!
 * Structure-preserving chunked translation.
 *
 * Blocks are translated strictly in document order, one API call per block
 * (more only when a block exceeds the per-request character limit). Each
 * call ends in one of three outcomes:
 *
 * - `Translated`: markers are re-applied and the result is kept
 * - `Recoverable`: the API declined (error status or empty text); the
 *   block's source text is kept verbatim and the run continues
 * - `Fatal`: the request never completed (timeout, connection failure);
 *   the run stops and no further block is attempted
 */

use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::TranslationConfig;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::{TranslationRequest, Translator};
use crate::usage::ApiUsage;

use super::chunking::chunk_text;
use super::classifier::LineTag;
use super::entities::decode_html_entities;
use super::markers::{reapply_marker, strip_marker};
use super::preprocessing::{InputKind, TextPreprocessor};
use super::segmenter::{segment_text, ContentBlock};

/// Result of a single translation attempt
#[derive(Debug)]
pub enum CallOutcome {
    /// The API returned usable text
    Translated(String),
    /// The API declined; the input is carried through untranslated
    Recoverable {
        /// Text to use in place of a translation
        passthrough: String,
        /// Why the translation was declined
        reason: String,
    },
    /// The request failed in transport; the run must stop
    Fatal(ProviderError),
}

/// How a block ended up in the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockStatus {
    /// Translated by the API
    Translated,
    /// Source text kept because the API declined
    PassedThrough { reason: String },
    /// Nothing to translate (empty block)
    Skipped,
}

/// One translated content block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedBlock {
    pub kind: LineTag,
    pub source_text: String,
    pub translated_text: String,
    pub status: BlockStatus,
}

/// A translated document, blocks in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatedDocument {
    pub blocks: Vec<TranslatedBlock>,
    /// Number of API calls made
    pub api_calls: usize,
    /// Latency and volume of the answered calls
    pub usage: ApiUsage,
}

impl TranslatedDocument {
    /// Translated texts joined with `\n`
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.translated_text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of blocks whose source text was kept
    pub fn passthrough_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|block| matches!(block.status, BlockStatus::PassedThrough { .. }))
            .count()
    }

    /// Number of blocks translated by the API
    pub fn translated_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|block| block.status == BlockStatus::Translated)
            .count()
    }
}

/// Tunables for a translation run
#[derive(Debug, Clone)]
pub struct TranslatorOptions {
    /// Pause between consecutive API calls
    pub inter_call_delay: Duration,
    /// Longest request text sent in one call
    pub max_block_chars: usize,
    /// Local preprocessing applied to request texts
    pub preprocessor: Option<TextPreprocessor>,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            inter_call_delay: Duration::from_millis(200),
            max_block_chars: 2000,
            preprocessor: None,
        }
    }
}

impl From<&TranslationConfig> for TranslatorOptions {
    fn from(config: &TranslationConfig) -> Self {
        Self {
            inter_call_delay: Duration::from_millis(config.inter_call_delay_ms),
            max_block_chars: config.max_block_chars.max(1),
            preprocessor: config
                .use_text_preprocessing
                .then(|| TextPreprocessor::new(&config.glossary)),
        }
    }
}

/// Per-run call bookkeeping
#[derive(Debug, Default)]
struct RunState {
    calls: usize,
    usage: ApiUsage,
}

/// Translator that keeps document structure intact
#[derive(Debug, Clone)]
pub struct ChunkedTranslator {
    translator: Arc<dyn Translator>,
    options: TranslatorOptions,
}

impl ChunkedTranslator {
    pub fn new(translator: Arc<dyn Translator>, options: TranslatorOptions) -> Self {
        Self { translator, options }
    }

    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    /// Segment a document and translate it
    pub async fn translate_document(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedDocument, TranslationError> {
        let blocks = segment_text(text);
        self.translate_blocks(&blocks, source_language, target_language).await
    }

    /// Translate blocks in order
    pub async fn translate_blocks(
        &self,
        blocks: &[ContentBlock],
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedDocument, TranslationError> {
        self.translate_blocks_with_progress(blocks, source_language, target_language, |_, _| {})
            .await
    }

    /// Translate blocks in order, reporting `(done, total)` after each block
    pub async fn translate_blocks_with_progress<F>(
        &self,
        blocks: &[ContentBlock],
        source_language: &str,
        target_language: &str,
        mut on_block: F,
    ) -> Result<TranslatedDocument, TranslationError>
    where
        F: FnMut(usize, usize),
    {
        info!(
            "Translating {} blocks from {} to {}",
            blocks.len(),
            source_language,
            target_language
        );

        let mut state = RunState::default();
        let mut translated = Vec::with_capacity(blocks.len());

        for (index, block) in blocks.iter().enumerate() {
            let result = match block.kind {
                LineTag::Empty => TranslatedBlock {
                    kind: block.kind,
                    source_text: block.raw_text.clone(),
                    translated_text: String::new(),
                    status: BlockStatus::Skipped,
                },
                _ => {
                    let outcome = self
                        .translate_block(block, source_language, target_language, InputKind::Text, &mut state)
                        .await;
                    match outcome {
                        CallOutcome::Translated(text) => {
                            debug!("Block {} ({:?}) translated", index, block.kind);
                            TranslatedBlock {
                                kind: block.kind,
                                source_text: block.raw_text.clone(),
                                translated_text: text,
                                status: BlockStatus::Translated,
                            }
                        }
                        CallOutcome::Recoverable { passthrough, reason } => {
                            warn!("Block {} kept untranslated: {}", index, reason);
                            TranslatedBlock {
                                kind: block.kind,
                                source_text: block.raw_text.clone(),
                                translated_text: passthrough,
                                status: BlockStatus::PassedThrough { reason },
                            }
                        }
                        CallOutcome::Fatal(source) => {
                            error!("Translation aborted at block {}: {}", index, source);
                            return Err(TranslationError::Aborted {
                                block_index: index,
                                source,
                            });
                        }
                    }
                }
            };

            translated.push(result);
            on_block(index + 1, blocks.len());
        }

        let document = TranslatedDocument {
            blocks: translated,
            api_calls: state.calls,
            usage: state.usage,
        };
        info!(
            "Translated {} blocks ({} passed through, {} API calls)",
            document.translated_count(),
            document.passthrough_count(),
            document.api_calls
        );

        Ok(document)
    }

    /// Translate free text as a single paragraph block
    pub async fn translate_text(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedBlock, TranslationError> {
        self.translate_text_as(text, source_language, target_language, InputKind::Text)
            .await
    }

    /// Translate free text, preprocessing it according to its origin
    pub async fn translate_text_as(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        kind: InputKind,
    ) -> Result<TranslatedBlock, TranslationError> {
        self.translate_text_metered(text, source_language, target_language, kind)
            .await
            .map(|(block, _)| block)
    }

    /// Translate free text and report the API usage it took
    pub async fn translate_text_metered(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        kind: InputKind,
    ) -> Result<(TranslatedBlock, ApiUsage), TranslationError> {
        let block = ContentBlock::new(LineTag::Paragraph, text.trim());

        if block.raw_text.is_empty() {
            let skipped = TranslatedBlock {
                kind: LineTag::Empty,
                source_text: String::new(),
                translated_text: String::new(),
                status: BlockStatus::Skipped,
            };
            return Ok((skipped, ApiUsage::default()));
        }

        let mut state = RunState::default();
        let translated = match self
            .translate_block(&block, source_language, target_language, kind, &mut state)
            .await
        {
            CallOutcome::Translated(translated_text) => TranslatedBlock {
                kind: block.kind,
                source_text: block.raw_text,
                translated_text,
                status: BlockStatus::Translated,
            },
            CallOutcome::Recoverable { passthrough, reason } => {
                warn!("Text kept untranslated: {}", reason);
                TranslatedBlock {
                    kind: block.kind,
                    source_text: block.raw_text,
                    translated_text: passthrough,
                    status: BlockStatus::PassedThrough { reason },
                }
            }
            CallOutcome::Fatal(source) => {
                error!("Text translation failed: {}", source);
                return Err(TranslationError::Aborted {
                    block_index: 0,
                    source,
                });
            }
        };

        Ok((translated, state.usage))
    }

    /// Translate one non-empty block, splitting it when it is too long
    async fn translate_block(
        &self,
        block: &ContentBlock,
        source_language: &str,
        target_language: &str,
        kind: InputKind,
        state: &mut RunState,
    ) -> CallOutcome {
        let mut request_text = strip_marker(block.kind, &block.request_text());
        if let Some(preprocessor) = &self.options.preprocessor {
            request_text = preprocessor.process(&request_text, kind);
        }

        if request_text.trim().is_empty() {
            return CallOutcome::Recoverable {
                passthrough: block.raw_text.clone(),
                reason: "no translatable text".to_string(),
            };
        }

        let pieces = chunk_text(&request_text, self.options.max_block_chars);
        if pieces.len() > 1 {
            debug!("Block split into {} pieces", pieces.len());
        }

        let mut translated_pieces = Vec::with_capacity(pieces.len());
        for piece in pieces {
            match self.call(piece, source_language, target_language, state).await {
                CallOutcome::Translated(text) => translated_pieces.push(text),
                CallOutcome::Recoverable { reason, .. } => {
                    return CallOutcome::Recoverable {
                        passthrough: block.raw_text.clone(),
                        reason,
                    };
                }
                fatal @ CallOutcome::Fatal(_) => return fatal,
            }
        }

        let joined = translated_pieces.join(" ");
        CallOutcome::Translated(reapply_marker(block.kind, &block.raw_text, &joined))
    }

    /// One API call, preceded by the inter-call delay when it is not the first
    async fn call(
        &self,
        text: String,
        source_language: &str,
        target_language: &str,
        state: &mut RunState,
    ) -> CallOutcome {
        if state.calls > 0 && !self.options.inter_call_delay.is_zero() {
            tokio::time::sleep(self.options.inter_call_delay).await;
        }
        state.calls += 1;

        let request = TranslationRequest::new(text, source_language, target_language);
        let started = Instant::now();
        match self.translator.translate(&request).await {
            Ok(response) => {
                let decoded = decode_html_entities(response.translated_text.trim());
                if decoded.trim().is_empty() {
                    CallOutcome::Recoverable {
                        passthrough: request.text,
                        reason: "empty translated_text in response".to_string(),
                    }
                } else {
                    let latency = started.elapsed();
                    debug!("Translate call answered in {:?}", latency);
                    state.usage.record_translation(&request.text, latency);
                    CallOutcome::Translated(decoded)
                }
            }
            Err(e) if e.is_fatal() => CallOutcome::Fatal(e),
            Err(e) => CallOutcome::Recoverable {
                passthrough: request.text,
                reason: e.to_string(),
            },
        }
    }
}
