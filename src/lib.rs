//! Provider directory extraction from PDF listings
//!
//! This crate provides:
//! - Text extraction from PDF directory listings (line-ordered)
//! - Segmentation of the text into one block per provider
//! - Field extraction into typed provider records
//! - CSV output with a fixed column order

pub mod csv_output;
pub mod extractor;
pub mod fields;
pub mod parser;
pub mod record;
pub mod segmenter;
pub mod text;

pub use csv_output::{write_csv, write_csv_to};
pub use extractor::{extract_text, extract_text_with_positions, group_into_lines, TextItem};
pub use fields::{disambiguate_header, extract_record, BlockParseError};
pub use parser::{parse_provider_data, ParseOptions, ParseReport, ProviderParser, SkippedBlock};
pub use record::{Gender, ProviderRecord, ServiceType, COLUMNS};
pub use segmenter::{segment, Segmenter};
pub use text::{to_text_from_lines, TextOptions};

use std::path::{Path, PathBuf};

/// How document text is pulled out of the PDF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    /// Position-aware: items grouped into lines, one line per row
    #[default]
    Layout,
    /// lopdf's own content stream text extraction
    Plain,
}

/// Options for text extraction
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub mode: TextMode,
    pub text: TextOptions,
}

/// Options for a full conversion run
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub extract: ExtractOptions,
    pub parse: ParseOptions,
}

/// Result of converting one document
#[derive(Debug)]
pub struct ConversionSummary {
    pub report: ParseReport,
    /// False when no records were found and no file was written
    pub written: bool,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Extract the full document text, pages joined by newlines
pub fn extract_document_text<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<String, ProviderError> {
    match options.mode {
        TextMode::Plain => extract_text(path),
        TextMode::Layout => {
            let items = extract_text_with_positions(path)?;
            let lines = group_into_lines(items);
            Ok(to_text_from_lines(&lines, &options.text))
        }
    }
}

/// Extract the full document text from a memory buffer
pub fn extract_document_text_mem(
    buffer: &[u8],
    options: &ExtractOptions,
) -> Result<String, ProviderError> {
    match options.mode {
        TextMode::Plain => extractor::extract_text_mem(buffer),
        TextMode::Layout => {
            let items = extractor::extract_text_with_positions_mem(buffer)?;
            let lines = group_into_lines(items);
            Ok(to_text_from_lines(&lines, &options.text))
        }
    }
}

/// Convert a PDF directory listing to CSV
///
/// This function will:
/// 1. Load the PDF and extract its text
/// 2. Split the text into provider blocks and extract records
/// 3. Write the records to `output`, unless there are none
pub fn convert_pdf<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &ConvertOptions,
) -> Result<ConversionSummary, ProviderError> {
    let start = std::time::Instant::now();
    let text = extract_document_text(input, &options.extract)?;
    convert_text_inner(&text, output.as_ref(), &options.parse, start)
}

/// Convert already extracted text to CSV
pub fn convert_text<Q: AsRef<Path>>(
    text: &str,
    output: Q,
    options: &ConvertOptions,
) -> Result<ConversionSummary, ProviderError> {
    convert_text_inner(text, output.as_ref(), &options.parse, std::time::Instant::now())
}

fn convert_text_inner(
    text: &str,
    output: &Path,
    options: &ParseOptions,
    start: std::time::Instant,
) -> Result<ConversionSummary, ProviderError> {
    let parser = ProviderParser::new(options.clone())?;
    let report = parser.parse(text);

    let written = if report.records.is_empty() {
        log::warn!("No provider records found; not writing {}", output.display());
        false
    } else {
        write_csv(&report.records, output)?;
        true
    };

    Ok(ConversionSummary {
        report,
        written,
        processing_time_ms: start.elapsed().as_millis() as u64,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("The file '{}' was not found", .0.display())]
    InputNotFound(PathBuf),
    #[error("An error occurred while reading the PDF: {0}")]
    InputUnreadable(String),
    #[error("Error writing to file {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl From<lopdf::Error> for ProviderError {
    fn from(e: lopdf::Error) -> Self {
        ProviderError::InputUnreadable(e.to_string())
    }
}
