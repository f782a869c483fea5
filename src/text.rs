//! Plain text rendering of grouped lines
//!
//! Rebuilds the document as newline-delimited text: one output line per
//! [`TextLine`], pages separated by a newline, and an optional blank line
//! where the vertical gap between lines is paragraph sized.

use crate::extractor::TextLine;
use std::collections::HashMap;

/// Options for rendering lines to text
#[derive(Debug, Clone)]
pub struct TextOptions {
    /// Insert a blank line on large vertical gaps
    pub paragraph_breaks: bool,
    /// Drop standalone page number lines
    pub remove_page_numbers: bool,
    /// Base font size for gap comparison (detected when `None`)
    pub base_font_size: Option<f32>,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            paragraph_breaks: true,
            remove_page_numbers: true,
            base_font_size: None,
        }
    }
}

/// Render grouped lines as newline-delimited text
pub fn to_text_from_lines(lines: &[TextLine], options: &TextOptions) -> String {
    if lines.is_empty() {
        return String::new();
    }

    let base_size = options
        .base_font_size
        .unwrap_or_else(|| most_common_font_size(lines));

    let mut output = String::new();
    let mut page_text = String::new();
    let mut current_page = lines[0].page;
    let mut prev_y = f32::MAX;

    for line in lines {
        if line.page != current_page {
            push_page(&mut output, &page_text, options);
            page_text.clear();
            current_page = line.page;
            prev_y = f32::MAX;
        }

        let text = line.text();
        if text.is_empty() {
            continue;
        }

        let y_gap = prev_y - line.y;
        if options.paragraph_breaks && prev_y != f32::MAX && y_gap > base_size * 2.0 {
            page_text.push('\n');
        }
        prev_y = line.y;

        page_text.push_str(&text);
        page_text.push('\n');
    }
    push_page(&mut output, &page_text, options);

    // At most one blank line in a row
    while output.contains("\n\n\n") {
        output = output.replace("\n\n\n", "\n\n");
    }

    output
}

/// Append one page, trimmed of blank lines at its edges so that a list
/// wrapping onto the next page is not split by a blank line
fn push_page(output: &mut String, page_text: &str, options: &TextOptions) {
    let page_text = if options.remove_page_numbers {
        remove_page_numbers(page_text)
    } else {
        page_text.to_string()
    };
    let trimmed = page_text.trim_matches('\n');
    if !trimmed.is_empty() {
        output.push_str(trimmed);
        output.push('\n');
    }
}

/// Most common font size across lines, ignoring tiny footnote text
fn most_common_font_size(lines: &[TextLine]) -> f32 {
    let mut size_counts: HashMap<i32, usize> = HashMap::new();

    for item in lines.iter().flat_map(|l| l.items.iter()) {
        if item.font_size >= 6.0 {
            let size_key = (item.font_size * 10.0) as i32;
            *size_counts.entry(size_key).or_insert(0) += 1;
        }
    }

    size_counts
        .iter()
        .max_by_key(|(size, count)| (**count, **size))
        .map(|(size, _)| *size as f32 / 10.0)
        .unwrap_or(12.0)
}

/// Remove standalone page numbers (lines that are just 1-4 digit numbers)
fn remove_page_numbers(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut result = String::with_capacity(text.len());

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if trimmed.len() <= 4 && !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
        {
            let prev_is_empty = i == 0 || lines[i - 1].trim().is_empty();
            let next_is_empty = i + 1 == lines.len() || lines[i + 1].trim().is_empty();
            if prev_is_empty || next_is_empty {
                continue;
            }
        }

        result.push_str(line);
        result.push('\n');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::TextItem;

    fn line(text: &str, y: f32, page: u32) -> TextLine {
        TextLine {
            items: vec![TextItem {
                text: text.into(),
                x: 72.0,
                y,
                font: "F1".into(),
                font_size: 10.0,
                page,
            }],
            y,
            page,
        }
    }

    #[test]
    fn test_lines_and_pages() {
        let lines = vec![
            line("Smith, John, MD", 700.0, 1),
            line("Telemedicine", 688.0, 1),
            line("Phone: (555) 123-4567", 700.0, 2),
        ];
        let options = TextOptions {
            paragraph_breaks: false,
            ..TextOptions::default()
        };
        let text = to_text_from_lines(&lines, &options);
        assert_eq!(
            text,
            "Smith, John, MD\nTelemedicine\nPhone: (555) 123-4567\n"
        );
    }

    #[test]
    fn test_paragraph_gap_inserts_blank_line() {
        let lines = vec![
            line("Specialties: Cardiology", 700.0, 1),
            line("Group Affiliations:", 650.0, 1),
        ];
        let text = to_text_from_lines(&lines, &TextOptions::default());
        assert_eq!(text, "Specialties: Cardiology\n\nGroup Affiliations:\n");
    }

    #[test]
    fn test_remove_page_numbers() {
        let text = "Gender: Male\n\n12\n";
        assert_eq!(remove_page_numbers(text), "Gender: Male\n\n");
        // Digits inside a run of text are kept
        let text = "Suite\n200\nMain St\n";
        assert_eq!(remove_page_numbers(text), text);
    }

    #[test]
    fn test_page_number_between_pages_leaves_no_gap() {
        let lines = vec![
            line("Specialties: Family Medicine,", 656.0, 1),
            line("1", 40.0, 1),
            line("Pediatrics", 740.0, 2),
            line("Group Affiliations: Acme Health", 728.0, 2),
        ];
        let text = to_text_from_lines(&lines, &TextOptions::default());
        assert_eq!(
            text,
            "Specialties: Family Medicine,\nPediatrics\nGroup Affiliations: Acme Health\n"
        );
    }

    #[test]
    fn test_page_number_at_top_of_page() {
        let lines = vec![
            line("A", 700.0, 1),
            line("2", 760.0, 2),
            line("B", 700.0, 2),
        ];
        let options = TextOptions {
            paragraph_breaks: false,
            ..TextOptions::default()
        };
        assert_eq!(to_text_from_lines(&lines, &options), "A\nB\n");
    }

    #[test]
    fn test_empty() {
        assert_eq!(to_text_from_lines(&[], &TextOptions::default()), "");
    }
}
