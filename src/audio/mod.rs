/*!
 * Audio handling for speech input.
 *
 * - `buffer`: accumulates short microphone chunks until enough audio exists
 *   to be worth sending to speech recognition
 * - `wav`: mono 16-bit segments with WAV encoding, resampling and windowing
 */

pub use self::buffer::{AudioBuffer, AudioChunk, Samples};
pub use self::wav::AudioSegment;

pub mod buffer;
pub mod wav;
