/*!
 * Tabular formats (CSV, Excel).
 *
 * Rows become single lines with non-empty cells joined by ` | `. Workbooks
 * emit a `Sheet: <name>` line before each sheet and a blank line after it.
 */

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

use crate::errors::ExtractionError;
use crate::file_utils::FileType;

use super::DocumentExtractor;

/// Separator placed between cells of a row
pub const CELL_SEPARATOR: &str = " | ";

/// Comma separated values
#[derive(Debug, Default)]
pub struct CsvExtractor;

/// Excel and OpenDocument workbooks
#[derive(Debug, Default)]
pub struct ExcelExtractor;

fn join_cells<I, S>(cells: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cells: Vec<String> = cells
        .into_iter()
        .map(|cell| cell.as_ref().trim().to_string())
        .filter(|cell| !cell.is_empty())
        .collect();

    (!cells.is_empty()).then(|| cells.join(CELL_SEPARATOR))
}

impl DocumentExtractor for CsvExtractor {
    fn file_type(&self) -> FileType {
        FileType::Csv
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut lines = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| ExtractionError::parse("csv", e.to_string()))?;
            if let Some(line) = join_cells(record.iter()) {
                lines.push(line);
            }
        }

        Ok(lines.join("\n"))
    }
}

impl DocumentExtractor for ExcelExtractor {
    fn file_type(&self) -> FileType {
        FileType::Excel
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| ExtractionError::parse("excel", e.to_string()))?;

        let mut lines = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| ExtractionError::parse("excel", format!("sheet '{}': {}", name, e)))?;

            lines.push(format!("Sheet: {}", name));
            for row in range.rows() {
                let cells = row
                    .iter()
                    .filter(|cell| !matches!(cell, Data::Empty))
                    .map(|cell| cell.to_string());
                if let Some(line) = join_cells(cells) {
                    lines.push(line);
                }
            }
            lines.push(String::new());
        }

        Ok(lines.join("\n").trim_end().to_string())
    }
}
