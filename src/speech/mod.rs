/*!
 * Speech input pipelines.
 *
 * - `transcriber`: file and segment transcription with windowing
 * - `session`: live microphone translation with buffering and history
 */

pub use self::session::{HistoryEntry, LiveSession};
pub use self::transcriber::{transcribe_segment, SegmentTranscript, TranscriberOptions};

pub mod session;
pub mod transcriber;
