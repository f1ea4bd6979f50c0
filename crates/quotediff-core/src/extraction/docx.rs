use crate::error::QuoteDiffError;
use crate::model::Table;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};

/// Paragraph text and tables of a Word document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocxContent {
    /// One entry per paragraph (or line break within one). Table rows appear
    /// here too, cells separated by two spaces.
    pub lines: Vec<String>,
    pub tables: Vec<Table>,
}

/// Read `word/document.xml` from a DOCX archive.
pub fn extract_docx(bytes: &[u8]) -> Result<DocxContent, QuoteDiffError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;
    parse_document_xml(&xml)
}

#[derive(Default)]
struct TableState {
    rows: Table,
    row: Vec<String>,
    cell: String,
}

pub(crate) fn parse_document_xml(xml: &str) -> Result<DocxContent, QuoteDiffError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut out = DocxContent::default();
    let mut tables: Vec<TableState> = Vec::new();
    let mut paragraph = String::new();
    let mut in_text = false;
    let mut in_props = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:pPr" => in_props = true,
                b"w:tbl" => tables.push(TableState::default()),
                b"w:tr" => {
                    if let Some(t) = tables.last_mut() {
                        t.row.clear();
                    }
                }
                b"w:tc" => {
                    if let Some(t) = tables.last_mut() {
                        t.cell.clear();
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(e)) if !in_props => match e.name().as_ref() {
                b"w:tab" => paragraph.push('\t'),
                b"w:br" | b"w:cr" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| QuoteDiffError::ParseError(format!("invalid document.xml: {e}")))?;
                paragraph.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:pPr" => in_props = false,
                b"w:p" => {
                    let text = std::mem::take(&mut paragraph);
                    match tables.last_mut() {
                        Some(t) => {
                            let text = text.trim();
                            if !text.is_empty() {
                                if !t.cell.is_empty() {
                                    t.cell.push(' ');
                                }
                                t.cell.push_str(text);
                            }
                        }
                        None => out.lines.extend(text.split('\n').map(String::from)),
                    }
                }
                b"w:tc" => {
                    if let Some(t) = tables.last_mut() {
                        let cell = std::mem::take(&mut t.cell);
                        t.row.push(cell);
                    }
                }
                b"w:tr" => {
                    // Only top-level rows become text lines.
                    let top_level = tables.len() == 1;
                    if let Some(t) = tables.last_mut() {
                        let row = std::mem::take(&mut t.row);
                        if top_level {
                            out.lines.push(row.join("  "));
                        }
                        t.rows.push(row);
                    }
                }
                b"w:tbl" => {
                    if let Some(t) = tables.pop() {
                        if !t.rows.is_empty() {
                            out.tables.push(t.rows);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(QuoteDiffError::ParseError(format!(
                    "invalid document.xml at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    tracing::debug!(
        lines = out.lines.len(),
        tables = out.tables.len(),
        "parsed docx body"
    );
    Ok(out)
}
