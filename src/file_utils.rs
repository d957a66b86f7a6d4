use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path for a translated document
    // @params: input_file, output_dir, target_language, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        target_language: &str,
        extension: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let output_filename = format!(
            "{}.{}.{}",
            stem.to_string_lossy(),
            target_language,
            extension.trim_start_matches('.')
        );

        output_dir.as_ref().join(output_filename)
    }

    /// Find every document in a directory tree that has a known format
    ///
    /// Files produced by an earlier run (`<stem>.<lang>.txt`) are skipped.
    pub fn find_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() || Self::is_translation_output(path) {
                continue;
            }

            if Self::detect_file_type(path) != FileType::Unknown {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a file into memory
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        Self::write_bytes(path, content.as_bytes())
    }

    /// Write bytes to a file, creating the parent directory if needed
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect the document format of a file from its name
    ///
    /// The extension decides; when it is missing or unknown the MIME type
    /// guessed from the name is consulted.
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        let path = path.as_ref();

        if let Some(ext) = path.extension() {
            let file_type = FileType::from_extension(&ext.to_string_lossy());
            if file_type != FileType::Unknown {
                return file_type;
            }
        }

        mime_guess::from_path(path)
            .first()
            .map(|mime| FileType::from_mime(mime.essence_str()))
            .unwrap_or(FileType::Unknown)
    }

    // @checks: Output of a previous run (stem ends in a language suffix, .txt)
    fn is_translation_output(path: &Path) -> bool {
        let is_txt = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
        let stem_ext = Path::new(path.file_stem().unwrap_or_default())
            .extension()
            .map(|ext| ext.to_string_lossy().to_string());

        is_txt
            && stem_ext.is_some_and(|lang| crate::language_utils::normalize_language_code(&lang).is_ok())
    }
}

/// Document formats the application knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Plain text
    Txt,
    /// Comma separated values
    Csv,
    /// Excel workbook (xlsx, xls, ods)
    Excel,
    /// Word document
    Docx,
    /// PowerPoint presentation
    Pptx,
    /// PDF document
    Pdf,
    /// Raster image (needs OCR)
    Image,
    /// Unknown file type
    Unknown,
}

impl FileType {
    // @returns: Format for a file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" | "text" | "md" => Self::Txt,
            "csv" => Self::Csv,
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Self::Excel,
            "docx" => Self::Docx,
            "pptx" => Self::Pptx,
            "pdf" => Self::Pdf,
            "png" | "jpg" | "jpeg" | "bmp" | "tiff" | "tif" | "webp" => Self::Image,
            _ => Self::Unknown,
        }
    }

    // @returns: Format for a MIME type
    pub fn from_mime(mime: &str) -> Self {
        match mime {
            "text/plain" => Self::Txt,
            "text/csv" => Self::Csv,
            "application/pdf" => Self::Pdf,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => Self::Docx,
            "application/vnd.openxmlformats-officedocument.presentationml.presentation" => Self::Pptx,
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.oasis.opendocument.spreadsheet" => Self::Excel,
            m if m.starts_with("image/") => Self::Image,
            _ => Self::Unknown,
        }
    }

    // @returns: Short display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Csv => "csv",
            Self::Excel => "excel",
            Self::Docx => "docx",
            Self::Pptx => "pptx",
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
