//! Flat SpreadsheetML table decoding.
//!
//! The sportsbook's ".xls" export is actually XML: a `Workbook` holding a
//! `Worksheet`/`Table` of `Row` elements whose `Cell`s optionally carry a
//! `Data` text payload. Namespace prefixes (`ss:`) vary between exports,
//! so elements are matched by local name. A `Cell` without a `Data` child
//! is a missing cell (`None`), distinct from `<Data></Data>` which is an
//! empty one (`Some("")`).

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::Result;

pub(super) fn read_grid(text: &str) -> Result<Vec<Vec<Option<String>>>> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    let mut current_row: Option<Vec<Option<String>>> = None;
    let mut current_cell: Option<Option<String>> = None;
    let mut in_data = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"Row" => current_row = Some(Vec::new()),
                b"Cell" => {
                    if current_row.is_some() {
                        current_cell = Some(None);
                    }
                }
                b"Data" => {
                    if let Some(cell) = current_cell.as_mut() {
                        cell.get_or_insert_with(String::new);
                        in_data = true;
                    }
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"Cell" => {
                    if let Some(row) = current_row.as_mut() {
                        row.push(None);
                    }
                }
                b"Data" => {
                    if let Some(cell) = current_cell.as_mut() {
                        cell.get_or_insert_with(String::new);
                    }
                }
                b"Row" => rows.push(Vec::new()),
                _ => {}
            },
            Event::Text(t) => {
                if in_data {
                    let chunk = t.unescape()?;
                    if let Some(Some(buf)) = current_cell.as_mut() {
                        buf.push_str(&chunk);
                    }
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"Data" => in_data = false,
                b"Cell" => {
                    if let (Some(row), Some(cell)) = (current_row.as_mut(), current_cell.take()) {
                        row.push(cell);
                    }
                }
                b"Row" => {
                    if let Some(row) = current_row.take() {
                        rows.push(row);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<ss:Workbook xmlns:ss="urn:schemas-microsoft-com:office:spreadsheet">
 <ss:Worksheet ss:Name="Bet History">
  <ss:Table>
   <ss:Row>
    <ss:Cell><ss:Data ss:Type="String">Status</ss:Data></ss:Cell>
    <ss:Cell><ss:Data ss:Type="String">Wager</ss:Data></ss:Cell>
   </ss:Row>
   <ss:Row>
    <ss:Cell><ss:Data ss:Type="String">Won</ss:Data></ss:Cell>
    <ss:Cell><ss:Data ss:Type="Number">10</ss:Data></ss:Cell>
   </ss:Row>
  </ss:Table>
 </ss:Worksheet>
</ss:Workbook>"#;

    #[test]
    fn reads_prefixed_rows_and_cells() {
        let grid = read_grid(SAMPLE).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0], vec![Some("Status".into()), Some("Wager".into())]);
        assert_eq!(grid[1], vec![Some("Won".into()), Some("10".into())]);
    }

    #[test]
    fn unprefixed_elements_also_match() {
        let xml = "<Table><Row><Cell><Data>A</Data></Cell></Row></Table>";
        let grid = read_grid(xml).unwrap();
        assert_eq!(grid, vec![vec![Some("A".to_string())]]);
    }

    #[test]
    fn cell_without_data_is_none_empty_data_is_some() {
        let xml = "<Table><Row>\
            <Cell></Cell>\
            <Cell/>\
            <Cell><Data></Data></Cell>\
            <Cell><Data/></Cell>\
        </Row></Table>";
        let grid = read_grid(xml).unwrap();
        assert_eq!(
            grid,
            vec![vec![None, None, Some(String::new()), Some(String::new())]]
        );
    }

    #[test]
    fn entities_are_unescaped() {
        let xml = "<Table><Row><Cell><Data>Bills &amp; Chiefs</Data></Cell></Row></Table>";
        let grid = read_grid(xml).unwrap();
        assert_eq!(grid[0][0].as_deref(), Some("Bills & Chiefs"));
    }

    #[test]
    fn rowless_document_is_empty_grid() {
        let grid = read_grid("<Workbook><Worksheet><Table/></Worksheet></Workbook>").unwrap();
        assert!(grid.is_empty());
    }
}
