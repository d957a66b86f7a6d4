/*!
 * API usage tracking.
 *
 * Every answered call to the vendor API adds its latency and billable
 * quantity here; declined and failed calls are not billed. Totals from
 * several runs can be merged, and an estimated cost is derived from the
 * configured rates.
 */

use std::ops::AddAssign;
use std::time::Duration;

use crate::app_config::CostConfig;

/// Latency and volume of API calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiUsage {
    /// Translation calls made
    pub translate_calls: usize,
    /// Characters sent for translation
    pub translated_chars: usize,
    /// Time spent waiting on translation calls
    pub translate_latency: Duration,

    /// Speech recognition calls made
    pub stt_calls: usize,
    /// Audio sent for recognition
    pub transcribed_audio: Duration,
    /// Time spent waiting on recognition calls
    pub stt_latency: Duration,

    /// Speech synthesis calls made
    pub tts_calls: usize,
    /// Characters sent for synthesis
    pub synthesized_chars: usize,
    /// Time spent waiting on synthesis calls
    pub tts_latency: Duration,
}

impl ApiUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one translation call
    pub fn record_translation(&mut self, text: &str, latency: Duration) {
        self.translate_calls += 1;
        self.translated_chars += text.chars().count();
        self.translate_latency += latency;
    }

    /// Record one speech recognition call
    pub fn record_transcription(&mut self, audio: Duration, latency: Duration) {
        self.stt_calls += 1;
        self.transcribed_audio += audio;
        self.stt_latency += latency;
    }

    /// Record one speech synthesis call
    pub fn record_synthesis(&mut self, text: &str, latency: Duration) {
        self.tts_calls += 1;
        self.synthesized_chars += text.chars().count();
        self.tts_latency += latency;
    }

    pub fn total_calls(&self) -> usize {
        self.translate_calls + self.stt_calls + self.tts_calls
    }

    /// Time spent waiting on the API across all services
    pub fn total_latency(&self) -> Duration {
        self.translate_latency + self.stt_latency + self.tts_latency
    }

    /// Estimated cost in USD at the given rates
    pub fn estimated_cost(&self, rates: &CostConfig) -> f64 {
        self.transcribed_audio.as_secs_f64() * rates.stt_usd_per_second
            + self.translated_chars as f64 * rates.translate_usd_per_char
            + self.synthesized_chars as f64 * rates.tts_usd_per_char
    }

    /// One-line summary for logs
    pub fn summary(&self, rates: &CostConfig) -> String {
        format!(
            "{} API calls, {} waiting (translate {}, speech-to-text {}, text-to-speech {}), estimated cost ${:.6}",
            self.total_calls(),
            format_duration(self.total_latency()),
            format_duration(self.translate_latency),
            format_duration(self.stt_latency),
            format_duration(self.tts_latency),
            self.estimated_cost(rates)
        )
    }
}

impl AddAssign for ApiUsage {
    fn add_assign(&mut self, other: Self) {
        self.translate_calls += other.translate_calls;
        self.translated_chars += other.translated_chars;
        self.translate_latency += other.translate_latency;
        self.stt_calls += other.stt_calls;
        self.transcribed_audio += other.transcribed_audio;
        self.stt_latency += other.stt_latency;
        self.tts_calls += other.tts_calls;
        self.synthesized_chars += other.synthesized_chars;
        self.tts_latency += other.tts_latency;
    }
}

/// Format a duration as `1h 2m 3s`, `2m 3s` or `3.042s`
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}.{:03}s", seconds, duration.subsec_millis())
    }
}
