/*!
 * # shikshalok - Indian-language translation for documents and speech
 *
 * A Rust library that translates educational material between English and
 * the major Indian languages through the Sarvam API.
 *
 * ## Features
 *
 * - Extract text from TXT, CSV, Excel, DOCX, PPTX and PDF files
 * - Translate documents block by block, keeping headings, bullets and
 *   numbered items in place
 * - Pass declined blocks through untranslated instead of failing the document
 * - Transcribe and translate speech, in whole files or as a live stream
 * - Synthesize speech from text
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `audio`: Sample buffering, resampling and WAV encoding
 * - `errors`: Custom error types for the application
 * - `export`: Plain-text rendering of translated documents
 * - `extraction`: Per-format document text extraction
 * - `file_utils`: File system operations and format detection
 * - `language_utils`: Vendor language tag utilities
 * - `providers`: Translation, speech-to-text and text-to-speech clients:
 *   - `providers::sarvam`: Sarvam API client
 *   - `providers::mock`: Scriptable in-memory backends
 * - `speech`: Transcription and live speech translation
 * - `usage`: API call latency and estimated cost
 * - `translation`: Structure-preserving translation:
 *   - `translation::classifier`: Line classification
 *   - `translation::segmenter`: Grouping lines into content blocks
 *   - `translation::chunked`: Ordered per-block translation
 *   - `translation::preprocessing`: Optional local text cleanup
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod audio;
pub mod errors;
pub mod export;
pub mod extraction;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod speech;
pub mod translation;
pub mod usage;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, FileOutcome, FileReport, FolderSummary, SpeechTranslation};
pub use errors::{AppError, AudioError, ExtractionError, ProviderError, TranslationError};
pub use language_utils::{get_language_name, language_codes_match, normalize_language_code};
pub use speech::{HistoryEntry, LiveSession};
pub use translation::{ChunkedTranslator, ContentBlock, LineTag, TranslatedDocument};
pub use usage::ApiUsage;
