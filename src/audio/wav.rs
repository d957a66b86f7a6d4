/*!
 * Mono 16-bit audio segments.
 *
 * Segments are what the speech recognizer receives: they can be resampled,
 * cut into windows, and encoded to or decoded from WAV with `hound`.
 */

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Cursor, Read};
use std::path::Path;

use crate::errors::AudioError;

/// Mono 16-bit PCM audio
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSegment {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

impl AudioSegment {
    pub fn new(sample_rate: u32, samples: Vec<i16>) -> Self {
        Self { sample_rate, samples }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Resample with linear interpolation
    pub fn resample(&self, target_rate: u32) -> AudioSegment {
        if target_rate == 0 || self.sample_rate == target_rate || self.samples.is_empty() {
            return AudioSegment::new(if target_rate == 0 { self.sample_rate } else { target_rate }, self.samples.clone());
        }

        let ratio = f64::from(self.sample_rate) / f64::from(target_rate);
        let out_len = ((self.samples.len() as f64) / ratio).round().max(1.0) as usize;
        let last = self.samples.len() - 1;

        let samples = (0..out_len)
            .map(|i| {
                let position = i as f64 * ratio;
                let index = (position.floor() as usize).min(last);
                let next = (index + 1).min(last);
                let fraction = position - index as f64;
                let a = f64::from(self.samples[index]);
                let b = f64::from(self.samples[next]);
                (a + (b - a) * fraction).round() as i16
            })
            .collect();

        AudioSegment::new(target_rate, samples)
    }

    /// Cut into consecutive windows of at most `max_secs` seconds
    pub fn split_windows(&self, max_secs: f64) -> Vec<AudioSegment> {
        let window = (max_secs * f64::from(self.sample_rate)).floor() as usize;
        if window == 0 || self.samples.len() <= window {
            return vec![self.clone()];
        }

        self.samples
            .chunks(window)
            .map(|piece| AudioSegment::new(self.sample_rate, piece.to_vec()))
            .collect()
    }

    /// Encode as a mono 16-bit WAV file
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, AudioError> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec)?;
            for sample in &self.samples {
                writer.write_sample(*sample)?;
            }
            writer.finalize()?;
        }

        Ok(cursor.into_inner())
    }

    /// Decode WAV bytes, down-mixing to mono 16-bit
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self, AudioError> {
        let reader = WavReader::new(Cursor::new(bytes))?;
        Self::from_reader(reader)
    }

    /// Read a WAV file from disk
    pub fn from_wav_file<P: AsRef<Path>>(path: P) -> Result<Self, AudioError> {
        let reader = WavReader::open(path)?;
        Self::from_reader(reader)
    }

    fn from_reader<R: Read>(mut reader: WavReader<R>) -> Result<Self, AudioError> {
        let spec = reader.spec();
        let channels = usize::from(spec.channels.max(1));

        let interleaved: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => reader
                .samples::<f32>()
                .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16))
                .collect::<Result<_, _>>()?,
            (SampleFormat::Int, bits @ 1..=32) => {
                let bits = u32::from(bits);
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| scale_to_i16(v, bits)))
                    .collect::<Result<_, _>>()?
            }
            (format, bits) => {
                return Err(AudioError::UnsupportedFormat(format!(
                    "{:?} samples with {} bits",
                    format, bits
                )));
            }
        };

        if interleaved.is_empty() {
            return Err(AudioError::Empty);
        }

        let samples = if channels == 1 {
            interleaved
        } else {
            interleaved
                .chunks_exact(channels)
                .map(|frame| {
                    let sum: i32 = frame.iter().map(|s| i32::from(*s)).sum();
                    (sum / channels as i32) as i16
                })
                .collect()
        };

        Ok(AudioSegment::new(spec.sample_rate, samples))
    }
}

fn scale_to_i16(value: i32, bits: u32) -> i16 {
    if bits > 16 {
        (value >> (bits - 16)) as i16
    } else {
        (value << (16 - bits)) as i16
    }
}
