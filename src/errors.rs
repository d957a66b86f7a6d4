/*!
 * Error types for the shikshalok application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Provider failures come in two flavours: transport failures (timeouts, refused
 * connections) that abort the current document or segment, and API-declined
 * responses (HTTP errors, unreadable bodies) that the pipelines absorb by
 * passing the original text through.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// The request did not complete within the configured timeout
    #[error("API request timed out: {0}")]
    Timeout(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether this failure must abort the current document or segment.
    ///
    /// Transport failures are fatal; anything the API answered (even with an
    /// error status) is recoverable by passing the input through.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::ConnectionError(_) | Self::RequestFailed(_)
        )
    }

    /// HTTP-equivalent status code for reporting
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Timeout(_) => 504,
            Self::ConnectionError(_) | Self::RequestFailed(_) => 502,
            Self::ParseError(_) => 502,
            Self::ApiError { status_code, .. } => *status_code,
            Self::RateLimitExceeded(_) => 429,
            Self::AuthenticationError(_) => 401,
        }
    }
}

/// Errors that abort a translation run
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API outside of any block
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A fatal provider failure stopped the run at the given block
    #[error("Translation aborted at block {block_index}: {source}")]
    Aborted {
        /// Zero-based index of the block being translated
        block_index: usize,
        /// The fatal provider failure
        #[source]
        source: ProviderError,
    },
}

impl TranslationError {
    /// The provider failure behind this error
    pub fn provider_error(&self) -> &ProviderError {
        match self {
            Self::Provider(e) => e,
            Self::Aborted { source, .. } => source,
        }
    }
}

/// Errors raised while reading a document
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The file could not be read
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// The file was read but its content could not be parsed
    #[error("Failed to parse {format} document: {message}")]
    Parse {
        /// Format name (docx, pdf, ...)
        format: String,
        /// Parser message
        message: String,
    },
}

impl ExtractionError {
    /// Create a parse error for the given format
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by audio handling
#[derive(Error, Debug)]
pub enum AudioError {
    /// WAV encoding or decoding failed
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// The audio has no samples
    #[error("Audio contains no samples")]
    Empty,

    /// The audio format cannot be handled
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from document extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from audio handling
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// The document format has no available handler
    #[error("Unsupported format {format}: {reason}")]
    UnsupportedFormat {
        /// Format name
        format: String,
        /// Why the format cannot be handled
        reason: String,
    },

    /// The document yielded no text
    #[error("No text extracted: {0}")]
    NoTextExtracted(String),

    /// Speech recognition returned nothing
    #[error("No transcript returned: {0}")]
    NoTranscript(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// HTTP-equivalent status code for reporting
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Provider(e) => e.status_code(),
            Self::Translation(e) => e.provider_error().status_code(),
            Self::UnsupportedFormat { .. } => 415,
            Self::NoTextExtracted(_) | Self::Extraction(_) | Self::Audio(_) => 400,
            Self::Config(_) => 400,
            Self::NoTranscript(_) => 422,
            Self::File(_) | Self::Unknown(_) => 500,
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
