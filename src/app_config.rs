use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (vendor tag or `auto`)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (vendor tag)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Text translation settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Speech recognition and live session settings
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Speech synthesis settings
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Document handler capability flags
    #[serde(default)]
    pub documents: DocumentConfig,

    /// Rates used for estimated API cost reporting
    #[serde(default)]
    pub costs: CostConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Vendor API connection configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    // @field: Subscription key sent with every request
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    // @field: Connect timeout seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    // @field: Read timeout seconds
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

/// Translation request configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation model identifier
    #[serde(default = "default_translation_model")]
    pub model: String,

    /// Register requested from the API
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Speaker gender hint sent with each translation
    #[serde(default = "default_speaker_gender")]
    pub speaker_gender: String,

    /// Ask the API to run its own input preprocessing
    #[serde(default = "default_true")]
    pub enable_preprocessing: bool,

    /// Delay in milliseconds between consecutive API calls
    #[serde(default = "default_inter_call_delay_ms")]
    pub inter_call_delay_ms: u64,

    /// Blocks longer than this many characters are split before sending
    #[serde(default = "default_max_block_chars")]
    pub max_block_chars: usize,

    /// Run the local text preprocessor before sending
    #[serde(default)]
    pub use_text_preprocessing: bool,

    /// Term substitutions applied by the local preprocessor
    #[serde(default)]
    pub glossary: Vec<GlossaryEntry>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: default_translation_model(),
            mode: default_mode(),
            speaker_gender: default_speaker_gender(),
            enable_preprocessing: true,
            inter_call_delay_ms: default_inter_call_delay_ms(),
            max_block_chars: default_max_block_chars(),
            use_text_preprocessing: false,
            glossary: Vec::new(),
        }
    }
}

/// A single glossary substitution
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GlossaryEntry {
    /// Term to look for (whole word, case-insensitive)
    pub term: String,
    /// Replacement sent to the API
    pub replacement: String,
}

/// Speech recognition and live session configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpeechConfig {
    // @field: STT model identifier (empty for the API default)
    #[serde(default = "default_stt_model")]
    pub model: String,

    // @field: Seconds of audio buffered before a flush
    #[serde(default = "default_min_buffer_secs")]
    pub min_buffer_secs: f64,

    // @field: Sample rate of audio sent to STT
    #[serde(default = "default_target_sample_rate")]
    pub target_sample_rate: u32,

    // @field: Longest audio window sent in one STT call
    #[serde(default = "default_max_window_secs")]
    pub max_window_secs: f64,

    // @field: Number of utterances kept in the session history
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    // @field: Chunk size used when replaying a file as a live stream
    #[serde(default = "default_stream_chunk_ms")]
    pub stream_chunk_ms: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            model: default_stt_model(),
            min_buffer_secs: default_min_buffer_secs(),
            target_sample_rate: default_target_sample_rate(),
            max_window_secs: default_max_window_secs(),
            history_limit: default_history_limit(),
            stream_chunk_ms: default_stream_chunk_ms(),
        }
    }
}

/// Speech synthesis configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VoiceConfig {
    #[serde(default = "default_speaker")]
    pub speaker: String,

    #[serde(default)]
    pub pitch: f32,

    #[serde(default = "default_unit")]
    pub pace: f32,

    #[serde(default = "default_unit")]
    pub loudness: f32,

    #[serde(default = "default_speech_sample_rate")]
    pub sample_rate: u32,

    #[serde(default = "default_tts_model")]
    pub model: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            speaker: default_speaker(),
            pitch: 0.0,
            pace: default_unit(),
            loudness: default_unit(),
            sample_rate: default_speech_sample_rate(),
            model: default_tts_model(),
        }
    }
}

/// Capability flags for document handlers
///
/// A disabled handler makes its format report as unsupported instead of
/// failing at extraction time.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DocumentConfig {
    #[serde(default = "default_true")]
    pub txt: bool,
    #[serde(default = "default_true")]
    pub csv: bool,
    #[serde(default = "default_true")]
    pub excel: bool,
    #[serde(default = "default_true")]
    pub docx: bool,
    #[serde(default = "default_true")]
    pub pptx: bool,
    #[serde(default = "default_true")]
    pub pdf: bool,
    /// No OCR engine is bundled, so this stays off unless one is wired in
    #[serde(default)]
    pub ocr: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            txt: true,
            csv: true,
            excel: true,
            docx: true,
            pptx: true,
            pdf: true,
            ocr: false,
        }
    }
}

/// Estimated API rates in USD
///
/// Only used to report an approximate cost next to call latencies.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CostConfig {
    /// Per second of transcribed audio
    #[serde(default = "default_stt_usd_per_second")]
    pub stt_usd_per_second: f64,

    /// Per character sent for translation
    #[serde(default = "default_translate_usd_per_char")]
    pub translate_usd_per_char: f64,

    /// Per character sent for speech synthesis
    #[serde(default = "default_tts_usd_per_char")]
    pub tts_usd_per_char: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            stt_usd_per_second: default_stt_usd_per_second(),
            translate_usd_per_char: default_translate_usd_per_char(),
            tts_usd_per_char: default_tts_usd_per_char(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en-IN".to_string()
}

fn default_target_language() -> String {
    "hi-IN".to_string()
}

fn default_base_url() -> String {
    "https://api.sarvam.ai".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_read_timeout_secs() -> u64 {
    120
}

fn default_translation_model() -> String {
    "mayura:v1".to_string()
}

fn default_mode() -> String {
    "formal".to_string()
}

fn default_speaker_gender() -> String {
    "Male".to_string()
}

fn default_inter_call_delay_ms() -> u64 {
    200
}

fn default_max_block_chars() -> usize {
    // Vendor input limit per request
    2000
}

fn default_stt_model() -> String {
    "saarika:v2".to_string()
}

fn default_min_buffer_secs() -> f64 {
    2.0
}

fn default_target_sample_rate() -> u32 {
    16000
}

fn default_max_window_secs() -> f64 {
    30.0
}

fn default_history_limit() -> usize {
    10
}

fn default_stream_chunk_ms() -> u64 {
    500
}

fn default_speaker() -> String {
    "meera".to_string()
}

fn default_unit() -> f32 {
    1.0
}

fn default_speech_sample_rate() -> u32 {
    22050
}

fn default_tts_model() -> String {
    "bulbul:v1".to_string()
}

fn default_stt_usd_per_second() -> f64 {
    0.00001
}

fn default_translate_usd_per_char() -> f64 {
    0.000005
}

fn default_tts_usd_per_char() -> f64 {
    0.000003
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file, creating it with defaults if missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .context(format!("Failed to open config file: {:?}", path))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .context(format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        log::warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .context(format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        language_utils::normalize_source_code(&self.source_language)?;
        language_utils::normalize_language_code(&self.target_language)?;

        if self.api.api_key.trim().is_empty() {
            return Err(anyhow!("API subscription key is required (set api.api_key or SARVAM_API_KEY)"));
        }

        url::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))?;

        if self.api.connect_timeout_secs == 0 || self.api.read_timeout_secs == 0 {
            return Err(anyhow!("API timeouts must be greater than zero"));
        }

        if self.translation.max_block_chars == 0 {
            return Err(anyhow!("translation.max_block_chars must be greater than zero"));
        }

        if self.speech.min_buffer_secs <= 0.0 {
            return Err(anyhow!("speech.min_buffer_secs must be greater than zero"));
        }

        if self.speech.max_window_secs <= 0.0 || self.speech.target_sample_rate == 0 {
            return Err(anyhow!("speech window length and sample rate must be greater than zero"));
        }

        if self.speech.history_limit == 0 {
            return Err(anyhow!("speech.history_limit must be greater than zero"));
        }

        let rates = [
            self.costs.stt_usd_per_second,
            self.costs.translate_usd_per_char,
            self.costs.tts_usd_per_char,
        ];
        if rates.iter().any(|rate| !rate.is_finite() || *rate < 0.0) {
            return Err(anyhow!("cost rates must be non-negative numbers"));
        }

        Ok(())
    }

    /// Source language in vendor form (`auto` preserved)
    pub fn source_code(&self) -> Result<String> {
        language_utils::normalize_source_code(&self.source_language)
    }

    /// Target language in vendor form
    pub fn target_code(&self) -> Result<String> {
        language_utils::normalize_language_code(&self.target_language)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            api: ApiConfig::default(),
            translation: TranslationConfig::default(),
            speech: SpeechConfig::default(),
            voice: VoiceConfig::default(),
            documents: DocumentConfig::default(),
            costs: CostConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
