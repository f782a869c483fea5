//! Text extraction from PDF using lopdf
//!
//! This module extracts text with position information so that directory
//! listings can be rebuilt line by line before segmentation.

use crate::ProviderError;
use lopdf::{Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::Path;

/// A text item with position information
#[derive(Debug, Clone)]
pub struct TextItem {
    /// The text content
    pub text: String,
    /// X position on page
    pub x: f32,
    /// Y position on page (PDF coordinates, origin at bottom-left)
    pub y: f32,
    /// Font name
    pub font: String,
    /// Font size
    pub font_size: f32,
    /// Page number (1-indexed)
    pub page: u32,
}

/// A line of text (grouped text items)
#[derive(Debug, Clone)]
pub struct TextLine {
    pub items: Vec<TextItem>,
    pub y: f32,
    pub page: u32,
}

impl TextLine {
    pub fn text(&self) -> String {
        self.items
            .iter()
            .map(|i| i.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Load a document, distinguishing a missing file from an unreadable one
fn load_document(path: &Path) -> Result<Document, ProviderError> {
    if !path.is_file() {
        return Err(ProviderError::InputNotFound(path.to_path_buf()));
    }
    Document::load(path).map_err(|e| ProviderError::InputUnreadable(e.to_string()))
}

/// Extract text from PDF file as plain string
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String, ProviderError> {
    let doc = load_document(path.as_ref())?;
    extract_text_from_doc(&doc)
}

/// Extract text from PDF memory buffer
pub fn extract_text_mem(buffer: &[u8]) -> Result<String, ProviderError> {
    let doc = Document::load_mem(buffer)?;
    extract_text_from_doc(&doc)
}

/// Extract text from loaded document
fn extract_text_from_doc(doc: &Document) -> Result<String, ProviderError> {
    let pages = doc.get_pages();
    let page_nums: Vec<u32> = pages.keys().cloned().collect();

    let text = doc
        .extract_text(&page_nums)
        .map_err(|e| ProviderError::InputUnreadable(e.to_string()))?;
    log::debug!(
        "Extracted {} chars from {} pages (plain mode)",
        text.len(),
        page_nums.len()
    );
    Ok(text)
}

/// Extract text with position information from PDF file
pub fn extract_text_with_positions<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<TextItem>, ProviderError> {
    let doc = load_document(path.as_ref())?;
    extract_positioned_text_from_doc(&doc)
}

/// Extract text with positions from memory buffer
pub fn extract_text_with_positions_mem(buffer: &[u8]) -> Result<Vec<TextItem>, ProviderError> {
    let doc = Document::load_mem(buffer)?;
    extract_positioned_text_from_doc(&doc)
}

/// Extract positioned text from loaded document
fn extract_positioned_text_from_doc(doc: &Document) -> Result<Vec<TextItem>, ProviderError> {
    let pages = doc.get_pages();
    let mut all_items = Vec::new();

    for (page_num, &page_id) in pages.iter() {
        let items = extract_page_text_items(doc, page_id, *page_num)?;
        all_items.extend(items);
    }

    log::debug!(
        "Extracted {} positioned items from {} pages",
        all_items.len(),
        pages.len()
    );
    Ok(all_items)
}

/// Multiply two 2D transformation matrices
/// Matrix format: [a, b, c, d, e, f] representing:
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
fn multiply_matrices(m1: &[f32; 6], m2: &[f32; 6]) -> [f32; 6] {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

/// Text and graphics state while walking one content stream
struct PageState {
    ctm: [f32; 6],
    ctm_stack: Vec<[f32; 6]>,
    font: String,
    font_size: f32,
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    in_text_block: bool,
}

impl PageState {
    const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

    fn new() -> Self {
        Self {
            ctm: Self::IDENTITY,
            ctm_stack: Vec::new(),
            font: String::new(),
            font_size: 12.0,
            text_matrix: Self::IDENTITY,
            line_matrix: Self::IDENTITY,
            in_text_block: false,
        }
    }

    fn next_line(&mut self) {
        // Approximate leading
        self.line_matrix[5] -= self.font_size * 1.2;
        self.text_matrix = self.line_matrix;
    }

    fn make_item(&self, text: String, page: u32) -> TextItem {
        let rendered_size = effective_font_size(self.font_size, &self.text_matrix);
        let combined = multiply_matrices(&self.text_matrix, &self.ctm);
        TextItem {
            text,
            x: combined[4],
            y: combined[5],
            font: self.font.clone(),
            font_size: rendered_size,
            page,
        }
    }
}

/// Extract text items from a single page
fn extract_page_text_items(
    doc: &Document,
    page_id: ObjectId,
    page_num: u32,
) -> Result<Vec<TextItem>, ProviderError> {
    use lopdf::content::Content;

    let mut items = Vec::new();

    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();

    let content_data = doc
        .get_page_content(page_id)
        .map_err(|e| ProviderError::InputUnreadable(e.to_string()))?;

    let content = Content::decode(&content_data)
        .map_err(|e| ProviderError::InputUnreadable(e.to_string()))?;

    let mut state = PageState::new();

    for op in &content.operations {
        match op.operator.as_str() {
            "q" => state.ctm_stack.push(state.ctm),
            "Q" => {
                if let Some(saved) = state.ctm_stack.pop() {
                    state.ctm = saved;
                }
            }
            "cm" => {
                if op.operands.len() >= 6 {
                    let new_matrix = [
                        get_number(&op.operands[0]).unwrap_or(1.0),
                        get_number(&op.operands[1]).unwrap_or(0.0),
                        get_number(&op.operands[2]).unwrap_or(0.0),
                        get_number(&op.operands[3]).unwrap_or(1.0),
                        get_number(&op.operands[4]).unwrap_or(0.0),
                        get_number(&op.operands[5]).unwrap_or(0.0),
                    ];
                    state.ctm = multiply_matrices(&new_matrix, &state.ctm);
                }
            }
            "BT" => {
                state.in_text_block = true;
                state.text_matrix = PageState::IDENTITY;
                state.line_matrix = PageState::IDENTITY;
            }
            "ET" => state.in_text_block = false,
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Ok(name) = op.operands[0].as_name() {
                        state.font = String::from_utf8_lossy(name).to_string();
                    }
                    if let Some(size) = get_number(&op.operands[1]) {
                        state.font_size = size;
                    }
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    state.line_matrix[4] += tx;
                    state.line_matrix[5] += ty;
                    state.text_matrix = state.line_matrix;
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    for (i, operand) in op.operands.iter().take(6).enumerate() {
                        state.text_matrix[i] = get_number(operand)
                            .unwrap_or(if i == 0 || i == 3 { 1.0 } else { 0.0 });
                    }
                    state.line_matrix = state.text_matrix;
                }
            }
            "T*" => state.next_line(),
            "Tj" => {
                if state.in_text_block && !op.operands.is_empty() {
                    if let Some(text) =
                        extract_text_from_operand(&op.operands[0], doc, &fonts, &state.font)
                    {
                        if !text.trim().is_empty() {
                            items.push(state.make_item(text, page_num));
                        }
                    }
                }
            }
            "TJ" => {
                if state.in_text_block && !op.operands.is_empty() {
                    if let Ok(array) = op.operands[0].as_array() {
                        let mut combined_text = String::new();
                        for item in array {
                            if let Some(text) =
                                extract_text_from_operand(item, doc, &fonts, &state.font)
                            {
                                combined_text.push_str(&text);
                            }
                        }
                        if !combined_text.trim().is_empty() {
                            items.push(state.make_item(combined_text, page_num));
                        }
                    }
                }
            }
            "'" => {
                state.next_line();
                if !op.operands.is_empty() {
                    if let Some(text) =
                        extract_text_from_operand(&op.operands[0], doc, &fonts, &state.font)
                    {
                        if !text.trim().is_empty() {
                            items.push(state.make_item(text, page_num));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(items)
}

/// Helper to get f32 from Object
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Compute effective font size from base size and text matrix
fn effective_font_size(base_size: f32, text_matrix: &[f32; 6]) -> f32 {
    let scale_x = (text_matrix[0].powi(2) + text_matrix[1].powi(2)).sqrt();
    let scale_y = (text_matrix[2].powi(2) + text_matrix[3].powi(2)).sqrt();
    base_size * scale_x.max(scale_y)
}

/// Extract text from a text operand, handling encoding
fn extract_text_from_operand(
    obj: &Object,
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    current_font: &str,
) -> Option<String> {
    if let Object::String(bytes, _) = obj {
        if let Some(font_dict) = fonts.get(current_font.as_bytes()) {
            if let Ok(encoding) = font_dict.get_font_encoding(doc) {
                if let Ok(text) = Document::decode_text(&encoding, bytes) {
                    return Some(text);
                }
            }
        }

        // Fallback: try UTF-16BE then Latin-1
        if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
            let utf16: Vec<u16> = bytes[2..]
                .chunks_exact(2)
                .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                .collect();
            return Some(String::from_utf16_lossy(&utf16));
        }

        Some(bytes.iter().map(|&b| b as char).collect())
    } else {
        None
    }
}

/// Group text items into lines, page by page.
///
/// Directory listings are single column, so PDF stream order is kept as
/// reading order and only consecutive items sharing a baseline are merged.
pub fn group_into_lines(items: Vec<TextItem>) -> Vec<TextLine> {
    let mut lines: Vec<TextLine> = Vec::new();
    let y_tolerance = 3.0;

    for item in items {
        match lines.last_mut() {
            Some(last) if last.page == item.page && (last.y - item.y).abs() < y_tolerance => {
                last.items.push(item);
            }
            _ => {
                let y = item.y;
                let page = item.page;
                lines.push(TextLine {
                    items: vec![item],
                    y,
                    page,
                });
            }
        }
    }

    // Left to right within a line
    for line in &mut lines {
        line.items
            .sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    }

    lines
}
