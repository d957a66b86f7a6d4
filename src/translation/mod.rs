/*!
 * Structure-preserving document translation.
 *
 * The pipeline runs leaves first:
 *
 * - `classifier`: tags each line (heading, bullet, numbered, paragraph, empty)
 * - `segmenter`: merges paragraph lines into content blocks
 * - `chunked`: translates blocks in order and re-applies structural markers
 *
 * Supporting modules:
 * - `markers`: removal and re-application of `**`, `• ` and `1. ` markers
 * - `chunking`: sentence-aware splitting of oversized blocks
 * - `entities`: HTML entity decoding of API responses
 * - `preprocessing`: optional local cleanup of request texts
 */

pub use self::chunked::{
    BlockStatus, CallOutcome, ChunkedTranslator, TranslatedBlock, TranslatedDocument,
    TranslatorOptions,
};
pub use self::classifier::{classify, LineTag};
pub use self::segmenter::{segment, segment_text, ContentBlock};

pub mod chunked;
pub mod chunking;
pub mod classifier;
pub mod entities;
pub mod markers;
pub mod preprocessing;
pub mod segmenter;
