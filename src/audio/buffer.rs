/*!
 * Streaming audio buffer.
 *
 * Chunks are appended in arrival order. Once the buffered audio reaches the
 * minimum duration the buffer can be drained into one mono 16-bit segment,
 * which leaves it empty.
 */

use log::debug;

use super::wav::AudioSegment;

/// Raw sample data of a chunk, interleaved when multi-channel
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// 16-bit PCM
    Int16(Vec<i16>),
    /// Floating point samples in [-1.0, 1.0]
    Float32(Vec<f32>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Self::Int16(samples) => samples.len(),
            Self::Float32(samples) => samples.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to 16-bit PCM, scaling and clamping float samples
    pub fn to_i16(&self) -> Vec<i16> {
        match self {
            Self::Int16(samples) => samples.clone(),
            Self::Float32(samples) => samples.iter().map(|s| float_to_i16(*s)).collect(),
        }
    }
}

/// One chunk of microphone audio
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Samples,
}

impl AudioChunk {
    /// Mono 16-bit chunk
    pub fn mono_i16(sample_rate: u32, samples: Vec<i16>) -> Self {
        Self {
            sample_rate,
            channels: 1,
            samples: Samples::Int16(samples),
        }
    }

    /// Mono float chunk
    pub fn mono_f32(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            channels: 1,
            samples: Samples::Float32(samples),
        }
    }

    /// Number of sample frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }

    /// Duration of the chunk at its own sample rate
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// Mono 16-bit samples, channels averaged
    pub fn to_mono_i16(&self) -> Vec<i16> {
        let samples = self.samples.to_i16();
        let channels = usize::from(self.channels.max(1));
        if channels == 1 {
            return samples;
        }

        samples
            .chunks_exact(channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|s| i32::from(*s)).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }
}

/// Accumulator releasing audio once a minimum duration is buffered
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    min_duration_secs: f64,
    chunks: Vec<AudioChunk>,
}

impl Default for AudioBuffer {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl AudioBuffer {
    pub fn new(min_duration_secs: f64) -> Self {
        Self {
            min_duration_secs,
            chunks: Vec::new(),
        }
    }

    pub fn min_duration_secs(&self) -> f64 {
        self.min_duration_secs
    }

    /// Append a chunk; empty chunks are ignored
    pub fn add_chunk(&mut self, chunk: AudioChunk) {
        if chunk.samples.is_empty() || chunk.sample_rate == 0 {
            debug!("Ignoring empty audio chunk");
            return;
        }
        self.chunks.push(chunk);
    }

    /// Total buffered duration, each chunk measured at its own rate
    pub fn buffered_secs(&self) -> f64 {
        self.chunks.iter().map(AudioChunk::duration_secs).sum()
    }

    /// Whether enough audio is buffered to send
    pub fn should_flush(&self) -> bool {
        !self.chunks.is_empty() && self.buffered_secs() >= self.min_duration_secs
    }

    /// Concatenate all buffered chunks into one segment and reset the buffer
    ///
    /// The segment uses the first chunk's sample rate; chunks recorded at
    /// another rate are resampled to it so the duration is preserved.
    pub fn drain(&mut self) -> Option<AudioSegment> {
        let sample_rate = self.chunks.first()?.sample_rate;

        if self.chunks.iter().any(|chunk| chunk.sample_rate != sample_rate) {
            debug!("Resampling mixed-rate chunks to {} Hz", sample_rate);
        }

        let mut samples = Vec::new();
        for chunk in self.chunks.drain(..) {
            let mono = chunk.to_mono_i16();
            if chunk.sample_rate == sample_rate {
                samples.extend(mono);
            } else {
                samples.extend(AudioSegment::new(chunk.sample_rate, mono).resample(sample_rate).samples);
            }
        }

        Some(AudioSegment::new(sample_rate, samples))
    }

    /// Drop all buffered audio
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }
}

fn float_to_i16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16
}
