//! Block segmentation
//!
//! Directory entries are not separated by blank lines or markers. The only
//! boundary present on every entry is the provider's name line ending in a
//! credential suffix (`Adkins, Amanda C, MD`), so the text is cut right
//! before each such line. A name line belongs to the block it opens.

use crate::ProviderError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Credential suffixes recognised by default
pub const DEFAULT_CREDENTIALS: [&str; 2] = ["MD", "DO"];

static DEFAULT_SEGMENTER: Lazy<Segmenter> =
    Lazy::new(|| Segmenter::new(&DEFAULT_CREDENTIALS).unwrap());

/// Regex source for a name line: name-like tokens, a comma, then one of the
/// credentials. The name itself is captured as `name`.
pub(crate) fn name_line_pattern<S: AsRef<str>>(credentials: &[S]) -> Result<String, ProviderError> {
    if credentials.is_empty() {
        return Err(ProviderError::InvalidOptions(
            "at least one credential suffix is required".into(),
        ));
    }
    let alternatives = credentials
        .iter()
        .map(|c| regex::escape(c.as_ref().trim()))
        .collect::<Vec<_>>()
        .join("|");
    Ok(format!(
        r"(?m)^[ \t]*(?P<name>\p{{L}}[\p{{L}} \t.,'\-]*,[ \t]*(?:{alternatives}))[ \t]*\r?$"
    ))
}

/// Splits document text at provider name lines
#[derive(Debug, Clone)]
pub struct Segmenter {
    boundary: Regex,
}

impl Segmenter {
    pub fn new<S: AsRef<str>>(credentials: &[S]) -> Result<Self, ProviderError> {
        // The boundary must be followed by a newline, unlike the name anchor
        let pattern = name_line_pattern(credentials)?;
        let pattern = format!(r"{}\n", pattern.trim_end_matches('$'));
        Ok(Self {
            boundary: Regex::new(&pattern)?,
        })
    }

    /// Byte offsets where a provider block starts
    pub fn boundaries(&self, text: &str) -> Vec<usize> {
        self.boundary.find_iter(text).map(|m| m.start()).collect()
    }

    pub fn boundary_count(&self, text: &str) -> usize {
        self.boundary.find_iter(text).count()
    }

    /// Split `text` into blocks, preamble first (if it holds anything)
    pub fn segment<'t>(&self, text: &'t str) -> Blocks<'t> {
        let mut starts = self.boundaries(text);
        if starts.first() != Some(&0) {
            starts.insert(0, 0);
        }
        Blocks {
            text,
            starts,
            next: 0,
        }
    }
}

/// Split `text` using the default `MD`/`DO` credentials
pub fn segment(text: &str) -> Blocks<'_> {
    DEFAULT_SEGMENTER.segment(text)
}

/// Consume-once iterator over the blocks of one document
#[derive(Debug)]
pub struct Blocks<'t> {
    text: &'t str,
    starts: Vec<usize>,
    next: usize,
}

impl<'t> Iterator for Blocks<'t> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        while self.next < self.starts.len() {
            let start = self.starts[self.next];
            let end = self
                .starts
                .get(self.next + 1)
                .copied()
                .unwrap_or(self.text.len());
            self.next += 1;

            let block = &self.text[start..end];
            if !block.trim().is_empty() {
                return Some(block);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_before_name_lines() {
        let text = "TRICARE Directory\nPage 1\nAdkins, Amanda C, MD\nPhone: (555) 123-4567\nBaker, Bob, DO\nGender: Male\n";
        let blocks: Vec<&str> = segment(text).collect();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], "TRICARE Directory\nPage 1\n");
        assert!(blocks[1].starts_with("Adkins, Amanda C, MD\n"));
        assert!(blocks[1].ends_with("Phone: (555) 123-4567\n"));
        assert_eq!(blocks[2], "Baker, Bob, DO\nGender: Male\n");
    }

    #[test]
    fn test_no_preamble() {
        let text = "O'Neil-Smith, Mary J., MD\nGender: Female\n";
        let blocks: Vec<&str> = segment(text).collect();
        assert_eq!(blocks, vec![text]);
    }

    #[test]
    fn test_name_line_needs_trailing_newline() {
        let segmenter = Segmenter::new(&DEFAULT_CREDENTIALS).unwrap();
        assert_eq!(segmenter.boundary_count("Smith, John, MD"), 0);
        assert_eq!(segmenter.boundary_count("Smith, John, MD\n"), 1);
    }

    #[test]
    fn test_labels_are_not_boundaries() {
        let segmenter = Segmenter::new(&DEFAULT_CREDENTIALS).unwrap();
        assert_eq!(segmenter.boundary_count("Specialties: Internal Medicine, MD\n"), 0);
        assert_eq!(segmenter.boundary_count("Smith, John, PhD\n"), 0);
    }

    #[test]
    fn test_custom_credentials() {
        let segmenter = Segmenter::new(&["NP"]).unwrap();
        let blocks: Vec<&str> = segmenter.segment("Lee, Ann, NP\nA\nKim, Jo, NP\nB\n").collect();
        assert_eq!(blocks, vec!["Lee, Ann, NP\nA\n", "Kim, Jo, NP\nB\n"]);
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            Segmenter::new(&empty),
            Err(ProviderError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_blank_text_has_no_blocks() {
        assert_eq!(segment("").count(), 0);
        assert_eq!(segment("\n  \n").count(), 0);
    }
}
