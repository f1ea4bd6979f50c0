use crate::compare::ComparisonReport;
use crate::export::Tabular;

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

/// Render records as a GitHub-flavoured markdown table.
pub fn to_markdown_table<T: Tabular>(records: &[T]) -> String {
    let headers = T::headers();
    let mut out = format!("| {} |\n", headers.join(" | "));
    out.push_str(&format!("|{}\n", "---|".repeat(headers.len())));
    for record in records {
        let cells: Vec<String> = record.cells().iter().map(|c| escape_cell(c)).collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

/// Markdown report: title, summary counts and the row table.
pub fn report_to_markdown(report: &ComparisonReport) -> String {
    let s = &report.summary;
    let mut out = String::from("# Quote Comparison\n\n");
    if let (Some(a), Some(b)) = (&report.name_a, &report.name_b) {
        out.push_str(&format!("**A:** {a}  \n**B:** {b}\n\n"));
    }
    out.push_str(&format!(
        "| Total | Exact | Partial | Only in A | Only in B | No match | Match rate |\n\
         |---|---|---|---|---|---|---|\n\
         | {} | {} | {} | {} | {} | {} | {} |\n\n",
        s.total,
        s.exact,
        s.partial,
        s.only_in_a,
        s.only_in_b,
        s.no_match,
        s.match_rate_display()
    ));
    out.push_str(&to_markdown_table(&report.rows));
    out
}
