use crate::compare::ComparisonReport;
use crate::error::QuoteDiffError;
use crate::export::Tabular;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

fn header_format() -> Format {
    Format::new().set_bold()
}

fn write_table<T: Tabular>(sheet: &mut Worksheet, records: &[T]) -> Result<(), QuoteDiffError> {
    let bold = header_format();
    for (col, header) in T::headers().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, cell) in record.cells().iter().enumerate() {
            sheet.write_string(row, col as u16, cell)?;
        }
    }
    sheet.autofit();
    Ok(())
}

/// Single-sheet workbook of records.
pub fn to_xlsx<T: Tabular>(sheet_name: &str, records: &[T]) -> Result<Vec<u8>, QuoteDiffError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name(sheet_name)?;
    write_table(sheet, records)?;
    Ok(workbook.save_to_buffer()?)
}

/// Workbook with a "Comparison" sheet of rows and a "Summary" sheet of counts.
pub fn report_to_xlsx(report: &ComparisonReport) -> Result<Vec<u8>, QuoteDiffError> {
    let mut workbook = Workbook::new();
    let rows = workbook.add_worksheet().set_name("Comparison")?;
    write_table(rows, &report.rows)?;

    let s = &report.summary;
    let bold = header_format();
    let summary = workbook.add_worksheet().set_name("Summary")?;
    let counts = [
        ("Total", s.total),
        ("Exact", s.exact),
        ("Partial", s.partial),
        ("Only in A", s.only_in_a),
        ("Only in B", s.only_in_b),
        ("No match", s.no_match),
    ];
    for (i, (label, count)) in counts.iter().enumerate() {
        summary.write_string_with_format(i as u32, 0, *label, &bold)?;
        summary.write_number(i as u32, 1, *count as f64)?;
    }
    let rate_row = counts.len() as u32;
    summary.write_string_with_format(rate_row, 0, "Match rate", &bold)?;
    summary.write_string(rate_row, 1, s.match_rate_display())?;
    summary.autofit();

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::MatchResult;
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;

    #[test]
    fn test_report_workbook_has_both_sheets() {
        let report = ComparisonReport::from_rows(vec![
            MatchResult::only_in_a("Shutters", "Black"),
            MatchResult::only_in_b("Skylight", "2 EA"),
        ]);
        let bytes = report_to_xlsx(&report).unwrap();

        let mut wb: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(wb.sheet_names(), vec!["Comparison", "Summary"]);

        let rows = wb.worksheet_range("Comparison").unwrap();
        assert_eq!(rows.get_value((0, 0)), Some(&Data::String("Line Item".into())));
        assert_eq!(rows.get_value((2, 0)), Some(&Data::String("Skylight".into())));

        let summary = wb.worksheet_range("Summary").unwrap();
        assert_eq!(summary.get_value((0, 1)), Some(&Data::Float(2.0)));
        assert_eq!(summary.get_value((6, 1)), Some(&Data::String("0.0%".into())));
    }
}
