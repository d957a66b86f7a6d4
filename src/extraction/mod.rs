/*!
 * Document text extraction.
 *
 * Each supported format has a handler implementing `DocumentExtractor`.
 * Handlers are registered once from the `documents` capability flags; a
 * format without a registered handler yields `Extraction::Unsupported`
 * with a readable reason instead of an error.
 *
 * Extracted text carries structural hints for the translation pipeline:
 * headings wrapped in `**...**` and list items prefixed with `• `.
 *
 * - `office`: DOCX and PPTX (zip archives of XML parts)
 * - `spreadsheet`: CSV and Excel workbooks
 * - `pdf`: text-based PDF files
 */

use log::{debug, info};
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;

use crate::app_config::DocumentConfig;
use crate::errors::ExtractionError;
use crate::file_utils::{FileManager, FileType};

pub use self::office::{DocxExtractor, PptxExtractor};
pub use self::pdf::PdfExtractor;
pub use self::spreadsheet::{CsvExtractor, ExcelExtractor};

pub mod office;
pub mod pdf;
pub mod spreadsheet;

/// Outcome of an extraction attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Plain text with structural hints
    Text(String),
    /// No handler is available for this format
    Unsupported { format: String, reason: String },
}

impl Extraction {
    /// Descriptive placeholder for unsupported formats, or the text
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Unsupported { format, reason } => {
                format!("{} processing not available: {}", format.to_uppercase(), reason)
            }
        }
    }
}

/// Handler turning the bytes of one document format into text
pub trait DocumentExtractor: Send + Sync + Debug {
    /// Format handled by this extractor
    fn file_type(&self) -> FileType;

    /// Extract text from the complete file contents
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Plain text files, decoded as UTF-8 with invalid sequences replaced
#[derive(Debug, Default)]
pub struct TxtExtractor;

impl DocumentExtractor for TxtExtractor {
    fn file_type(&self) -> FileType {
        FileType::Txt
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = String::from_utf8_lossy(bytes);
        Ok(text.trim_start_matches('\u{feff}').replace("\r\n", "\n"))
    }
}

/// Registered extractors, resolved from the capability flags
#[derive(Debug)]
pub struct ExtractorRegistry {
    extractors: HashMap<FileType, Box<dyn DocumentExtractor>>,
    config: DocumentConfig,
}

impl ExtractorRegistry {
    /// Register the handlers enabled in the configuration
    pub fn from_config(config: &DocumentConfig) -> Self {
        let mut registry = Self {
            extractors: HashMap::new(),
            config: config.clone(),
        };

        if config.txt {
            registry.register(Box::new(TxtExtractor));
        }
        if config.csv {
            registry.register(Box::new(CsvExtractor));
        }
        if config.excel {
            registry.register(Box::new(ExcelExtractor));
        }
        if config.docx {
            registry.register(Box::new(DocxExtractor));
        }
        if config.pptx {
            registry.register(Box::new(PptxExtractor));
        }
        if config.pdf {
            registry.register(Box::new(PdfExtractor));
        }

        debug!("Registered {} document extractors", registry.extractors.len());
        registry
    }

    /// Add or replace the handler for a format
    pub fn register(&mut self, extractor: Box<dyn DocumentExtractor>) {
        self.extractors.insert(extractor.file_type(), extractor);
    }

    /// Whether a format has a handler
    pub fn supports(&self, file_type: FileType) -> bool {
        self.extractors.contains_key(&file_type)
    }

    /// Every known format with its availability and, if unavailable, why
    pub fn capabilities(&self) -> Vec<(FileType, Option<String>)> {
        [
            FileType::Txt,
            FileType::Csv,
            FileType::Excel,
            FileType::Docx,
            FileType::Pptx,
            FileType::Pdf,
            FileType::Image,
        ]
        .into_iter()
        .map(|file_type| {
            let reason = (!self.supports(file_type)).then(|| self.unsupported_reason(file_type));
            (file_type, reason)
        })
        .collect()
    }

    /// Extract text from a file on disk
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<Extraction, ExtractionError> {
        let path = path.as_ref();
        let file_type = FileManager::detect_file_type(path);

        if file_type == FileType::Unknown {
            let format = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .unwrap_or_else(|| "unknown".to_string());
            return Ok(Extraction::Unsupported {
                format,
                reason: "unrecognised file type".to_string(),
            });
        }

        if !self.supports(file_type) {
            return Ok(self.unsupported(file_type));
        }

        let bytes = std::fs::read(path)?;
        info!("Extracting {} text from {:?}", file_type, path);
        self.extract_bytes(&bytes, file_type)
    }

    /// Extract text from in-memory contents of a known format
    pub fn extract_bytes(&self, bytes: &[u8], file_type: FileType) -> Result<Extraction, ExtractionError> {
        match self.extractors.get(&file_type) {
            Some(extractor) => {
                let text = extractor.extract(bytes)?;
                debug!("Extracted {} characters of {} text", text.chars().count(), file_type);
                Ok(Extraction::Text(text))
            }
            None => Ok(self.unsupported(file_type)),
        }
    }

    fn unsupported(&self, file_type: FileType) -> Extraction {
        Extraction::Unsupported {
            format: file_type.to_string(),
            reason: self.unsupported_reason(file_type),
        }
    }

    fn unsupported_reason(&self, file_type: FileType) -> String {
        match file_type {
            FileType::Image if self.config.ocr => "no OCR engine is bundled with this build".to_string(),
            FileType::Image => "OCR is disabled".to_string(),
            FileType::Unknown => "unrecognised file type".to_string(),
            other => format!("{} support is disabled in the configuration", other),
        }
    }
}
