use crate::error::QuoteDiffError;
use crate::model::Table;
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

/// One worksheet's used range as strings.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetContent {
    pub name: String,
    pub rows: Table,
}

/// Read every worksheet of an XLSX workbook. Fully empty rows are dropped.
pub fn extract_xlsx(bytes: &[u8]) -> Result<Vec<SheetContent>, QuoteDiffError> {
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let rows: Table = range
            .rows()
            .map(|row| row.iter().map(cell_as_string).collect::<Vec<_>>())
            .filter(|row| row.iter().any(|c| !c.is_empty()))
            .collect();
        tracing::debug!(sheet = %name, rows = rows.len(), "read worksheet");
        sheets.push(SheetContent { name, rows });
    }
    Ok(sheets)
}

/// Text lines for a sheet: non-empty cells of each row joined by two spaces.
pub fn sheet_lines(sheet: &SheetContent) -> Vec<String> {
    sheet
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .filter(|c| !c.is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect()
}

fn cell_as_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        // Whole numbers print without a trailing ".0".
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => format!("{cell}"),
    }
}
