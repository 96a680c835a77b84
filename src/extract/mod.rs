//! Row extraction: decodes a source document into an ordered sequence of
//! flat column-name → text maps. Two encodings are supported — a grid
//! already decoded from a binary spreadsheet by an external collaborator,
//! and the flat SpreadsheetML table the sportsbook writes when exporting
//! ".xls" files that are really XML.

mod tabular;
mod xml;

pub use tabular::TabularDocument;

use std::collections::HashMap;

use crate::error::{AppError, Result};

/// One source row. A column absent from the map means the cell was
/// missing entirely; a present key with `""` means the cell existed but
/// was empty. Downstream classification relies on that distinction.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    /// 1-based row number in the source document (the header is row 1).
    pub line: usize,
    pub fields: HashMap<String, String>,
}

impl RawRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Cell text, empty when the cell is absent.
    pub fn text(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub enum SourceDocument {
    /// Externally decoded spreadsheet grid.
    Tabular(TabularDocument),
    /// Flat XML table text (SpreadsheetML Workbook/Worksheet/Table).
    Xml(String),
}

pub fn extract(document: &SourceDocument) -> Result<Vec<RawRow>> {
    let grid = match document {
        SourceDocument::Tabular(doc) => doc.rows.clone(),
        SourceDocument::Xml(text) => xml::read_grid(text)?,
    };
    rows_from_grid(&grid)
}

/// Positional header→cell mapping shared by both encodings. The first
/// row supplies the column labels; unlabeled positions are ignored.
fn rows_from_grid(grid: &[Vec<Option<String>>]) -> Result<Vec<RawRow>> {
    let header = grid.first().ok_or(AppError::MissingHeader)?;
    let labels: Vec<String> = header
        .iter()
        .map(|cell| cell.as_deref().unwrap_or("").trim().to_string())
        .collect();
    if labels.iter().all(|l| l.is_empty()) {
        return Err(AppError::MissingHeader);
    }

    let mut rows = Vec::with_capacity(grid.len().saturating_sub(1));
    for (i, cells) in grid.iter().enumerate().skip(1) {
        let mut fields = HashMap::new();
        for (label, cell) in labels.iter().zip(cells.iter()) {
            if label.is_empty() {
                continue;
            }
            if let Some(value) = cell {
                fields.insert(label.clone(), value.clone());
            }
        }
        rows.push(RawRow { line: i + 1, fields });
    }
    Ok(rows)
}
