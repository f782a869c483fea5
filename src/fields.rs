//! Field extraction for a single provider block
//!
//! Every field is located on its own anchor because field order and
//! presence vary from entry to entry. A block is only a provider entry when
//! it carries both a `Phone:` and a `Gender:` label; everything else about
//! it degrades to a default rather than failing.

use crate::record::{Gender, ProviderRecord, ServiceType, NOT_AVAILABLE};
use crate::segmenter::{name_line_pattern, DEFAULT_CREDENTIALS};
use crate::ProviderError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

pub const PHONE_LABEL: &str = "Phone:";
pub const GENDER_LABEL: &str = "Gender:";
pub const LANGUAGES_LABEL: &str = "Languages Spoken:";
pub const SPECIALTIES_LABEL: &str = "Specialties:";
pub const GROUP_AFFILIATIONS_LABEL: &str = "Group Affiliations:";

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\((\d{3})\)\s*(\d{3})-(\d{4})").unwrap());
static GENDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(Male|Female)\b").unwrap());
static BLANK_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\r?\n").unwrap());
// Whole line or a trailing fragment merged onto an address line
static DISTANCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|\s+)\d+\.\d+\s*miles?$").unwrap());
static CONTACT_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:phone|fax)\s*:").unwrap());

static DEFAULT_EXTRACTOR: Lazy<FieldExtractor> =
    Lazy::new(|| FieldExtractor::new(&DEFAULT_CREDENTIALS).unwrap());

/// Why a block that passed the label gate still could not be read
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockParseError {
    #[error("phone value is not (NNN) NNN-NNNN: {0:?}")]
    MalformedPhone(String),
    #[error("gender value is not Male or Female: {0:?}")]
    MalformedGender(String),
}

/// Pulls a [`ProviderRecord`] out of one block
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    name_line: Regex,
}

impl FieldExtractor {
    pub fn new<S: AsRef<str>>(credentials: &[S]) -> Result<Self, ProviderError> {
        Ok(Self {
            name_line: Regex::new(&name_line_pattern(credentials)?)?,
        })
    }

    /// `Ok(None)` when the block lacks a phone or gender label (not a
    /// provider entry), `Err` when the phone or gender value is malformed.
    /// A missing name line or header block leaves those fields empty.
    pub fn extract(&self, block: &str) -> Result<Option<ProviderRecord>, BlockParseError> {
        let (Some(phone_pos), Some(gender_pos)) =
            (block.find(PHONE_LABEL), block.find(GENDER_LABEL))
        else {
            return Ok(None);
        };

        let name_span = self.name_line.captures(block).and_then(|caps| caps.name("name"));
        let name = match name_span {
            Some(span) => normalize_name(span.as_str()),
            None => {
                log::debug!("No provider name line in block, leaving name empty");
                String::new()
            }
        };

        let phone = parse_phone(&block[phone_pos + PHONE_LABEL.len()..])?;
        let gender = parse_gender(&block[gender_pos + GENDER_LABEL.len()..])?;

        let (service_type, medical_group) = match name_span {
            Some(span) if span.end() <= phone_pos => {
                let header_lines: Vec<&str> = block[span.end()..phone_pos]
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .collect();
                disambiguate_header(&header_lines)
            }
            _ => {
                log::debug!("No header block before Phone: label, leaving it empty");
                (ServiceType::Unknown, String::new())
            }
        };

        Ok(Some(ProviderRecord {
            name,
            service_type,
            medical_group,
            phone,
            gender,
            languages: extract_languages(block),
            specialties: extract_specialties(block),
        }))
    }
}

/// Extract a record using the default `MD`/`DO` credentials
pub fn extract_record(block: &str) -> Result<Option<ProviderRecord>, BlockParseError> {
    DEFAULT_EXTRACTOR.extract(block)
}

/// `"Adkins, Amanda  C, MD"` -> `"Adkins Amanda C MD"`
fn normalize_name(raw: &str) -> String {
    collapse_whitespace(&raw.replace(',', ""))
}

fn parse_phone(after_label: &str) -> Result<String, BlockParseError> {
    PHONE_RE
        .captures(after_label)
        .map(|caps| format!("({}) {}-{}", &caps[1], &caps[2], &caps[3]))
        .ok_or_else(|| BlockParseError::MalformedPhone(first_line(after_label)))
}

fn parse_gender(after_label: &str) -> Result<Gender, BlockParseError> {
    GENDER_RE
        .captures(after_label)
        .and_then(|caps| Gender::parse(&caps[1]))
        .ok_or_else(|| BlockParseError::MalformedGender(first_line(after_label)))
}

/// Resolve service type and medical group from the unlabelled lines between
/// the name line and `Phone:`.
pub fn disambiguate_header(lines: &[&str]) -> (ServiceType, String) {
    let Some(first) = lines.first() else {
        return (ServiceType::Unknown, String::new());
    };

    let is_telemedicine = |line: &&str| line.to_lowercase().contains("telemedicine");

    if lines.iter().any(is_telemedicine) {
        let group = lines
            .iter()
            .find(|l| !is_telemedicine(*l))
            .map(|l| collapse_whitespace(l))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        return (ServiceType::Telemedicine, group);
    }

    let medical_group = collapse_whitespace(first);
    let address_lines: Vec<Cow<str>> = lines[1..]
        .iter()
        .map(|l| l.trim())
        .filter(|l| !CONTACT_LINE_RE.is_match(l))
        .map(|l| DISTANCE_RE.replace(l, ""))
        .collect();
    let address = collapse_whitespace(&address_lines.join(" "));

    let service_type = if address.is_empty() {
        ServiceType::Unknown
    } else {
        ServiceType::Address(address)
    };
    (service_type, medical_group)
}

/// Rest of the `Languages Spoken:` line, split on commas
pub fn extract_languages(block: &str) -> Vec<String> {
    let Some(pos) = block.find(LANGUAGES_LABEL) else {
        return Vec::new();
    };
    let rest = &block[pos + LANGUAGES_LABEL.len()..];
    let mut line = rest.lines().next().unwrap_or("");
    // Line-wrap artifact: the next label can land on the same line
    if let Some(cut) = line.find(SPECIALTIES_LABEL) {
        line = &line[..cut];
    }
    split_items(line)
}

/// Text after `Specialties:` up to a blank line or `Group Affiliations:`,
/// which may wrap across several lines
pub fn extract_specialties(block: &str) -> Vec<String> {
    let Some(pos) = block.find(SPECIALTIES_LABEL) else {
        return Vec::new();
    };
    let mut rest = &block[pos + SPECIALTIES_LABEL.len()..];
    if let Some(cut) = rest.find(GROUP_AFFILIATIONS_LABEL) {
        rest = &rest[..cut];
    }
    if let Some(m) = BLANK_LINE_RE.find(rest) {
        rest = &rest[..m.start()];
    }
    let joined = rest.lines().map(str::trim).collect::<Vec<_>>().join(" ");
    split_items(&joined)
}

fn split_items(text: &str) -> Vec<String> {
    text.split(',')
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty())
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_line(text: &str) -> String {
    text.trim_start()
        .lines()
        .next()
        .unwrap_or("")
        .chars()
        .take(40)
        .collect()
}
