//! Segment-then-extract pipeline over one document's text
//!
//! Blocks are processed strictly in document order. A block that is not a
//! provider entry is counted as rejected; a block that fails extraction is
//! recorded as skipped and processing moves on to the next one.

use crate::fields::{BlockParseError, FieldExtractor};
use crate::record::ProviderRecord;
use crate::segmenter::{Segmenter, DEFAULT_CREDENTIALS};
use crate::ProviderError;
use once_cell::sync::Lazy;

static DEFAULT_PARSER: Lazy<ProviderParser> =
    Lazy::new(|| ProviderParser::new(ParseOptions::default()).unwrap());

/// Options for parsing provider text
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Credential suffixes that end a provider name line
    pub credentials: Vec<String>,
    /// Characters of an offending block kept for diagnostics
    pub block_prefix_len: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            credentials: DEFAULT_CREDENTIALS.iter().map(|c| c.to_string()).collect(),
            block_prefix_len: 100,
        }
    }
}

/// A block that looked like a provider entry but could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    /// Position of the block in the document (0-based)
    pub index: usize,
    pub error: BlockParseError,
    /// Leading text of the block
    pub prefix: String,
}

/// Outcome of parsing one document
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    /// Records in document order
    pub records: Vec<ProviderRecord>,
    /// Blocks produced by segmentation
    pub blocks_seen: usize,
    /// Name lines found in the text
    pub boundaries_found: usize,
    /// Blocks without both phone and gender labels
    pub rejected: usize,
    pub skipped: Vec<SkippedBlock>,
}

impl ParseReport {
    /// Text was present but no name line matched the credential pattern
    pub fn is_unsupported_input(&self) -> bool {
        self.boundaries_found == 0 && self.blocks_seen > 0
    }
}

/// Provider parser with compiled patterns
#[derive(Debug, Clone)]
pub struct ProviderParser {
    segmenter: Segmenter,
    extractor: FieldExtractor,
    block_prefix_len: usize,
}

impl ProviderParser {
    pub fn new(options: ParseOptions) -> Result<Self, ProviderError> {
        Ok(Self {
            segmenter: Segmenter::new(&options.credentials)?,
            extractor: FieldExtractor::new(&options.credentials)?,
            block_prefix_len: options.block_prefix_len,
        })
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    /// Extract one block
    pub fn parse_block(&self, block: &str) -> Result<Option<ProviderRecord>, BlockParseError> {
        self.extractor.extract(block)
    }

    /// Parse a whole document
    pub fn parse(&self, text: &str) -> ParseReport {
        let mut report = ParseReport {
            boundaries_found: self.segmenter.boundary_count(text),
            ..ParseReport::default()
        };

        for (index, block) in self.segmenter.segment(text).enumerate() {
            report.blocks_seen += 1;

            match self.extractor.extract(block) {
                Ok(Some(record)) => {
                    log::debug!("Block {}: provider {:?}", index, record.name);
                    report.records.push(record);
                }
                Ok(None) => {
                    log::debug!("Block {}: no phone/gender labels, rejected", index);
                    report.rejected += 1;
                }
                Err(error) => {
                    let prefix = block_prefix(block, self.block_prefix_len);
                    log::warn!("Skipping block {}: {} ({:?})", index, error, prefix);
                    report.skipped.push(SkippedBlock {
                        index,
                        error,
                        prefix,
                    });
                }
            }
        }

        log::debug!(
            "Parsed {} blocks: {} records, {} rejected, {} skipped",
            report.blocks_seen,
            report.records.len(),
            report.rejected,
            report.skipped.len()
        );
        report
    }
}

/// Parse text with default options
pub fn parse_provider_data(text: &str) -> ParseReport {
    DEFAULT_PARSER.parse(text)
}

/// First `max_chars` characters of a block, kept on char boundaries
fn block_prefix(block: &str, max_chars: usize) -> String {
    block.trim().chars().take(max_chars).collect()
}
