use quotediff_core::compare::ComparisonReport;
use quotediff_core::model::{ExtractedDocument, FieldMap};
use quotediff_core::parsing::ParsedSpec;
use std::fmt::Write;

/// Longest cell shown before truncation.
const MAX_CELL: usize = 48;

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_CELL {
        s.to_string()
    } else {
        let cut: String = s.chars().take(MAX_CELL - 3).collect();
        format!("{cut}...")
    }
}

/// Render rows as space-padded columns under a header line.
fn columns(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    let _ = writeln!(out, "  {}", line(headers.iter().map(|h| h.to_string()).collect()));
    let _ = writeln!(out, "  {}", "-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    for row in rows {
        let _ = writeln!(out, "  {}", line(row.clone()));
    }
    out
}

pub fn format_extracted(doc: &ExtractedDocument, raw: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ({}) ===\n", doc.name, doc.kind);

    let text = if raw { &doc.raw_text } else { &doc.text };
    if text.trim().is_empty() {
        let _ = writeln!(out, "  (no text extracted)\n");
    } else {
        let _ = writeln!(out, "{}\n", text.trim_end());
    }

    for (i, table) in doc.tables.iter().enumerate() {
        let _ = writeln!(out, "--- Table {} ({} rows) ---", i + 1, table.len());
        for row in table {
            let cells: Vec<String> = row.iter().map(|c| truncate(c)).collect();
            let _ = writeln!(out, "  {}", cells.join(" | "));
        }
        out.push('\n');
    }
    out
}

pub fn format_parsed(parsed: &ParsedSpec, show_skipped: bool) -> String {
    let mut out = String::new();
    let mut section: Option<&str> = None;

    for line in &parsed.lines {
        if section != Some(line.section.as_str()) {
            if section.is_some() {
                out.push('\n');
            }
            let _ = writeln!(out, "=== {} ===\n", line.section);
            section = Some(line.section.as_str());
        }
        let code = line.option_code.as_deref().unwrap_or("-");
        let _ = write!(out, "  {:<24} {:<9}", truncate(&line.feature), code);
        if let Some(ref variant) = line.variant {
            let _ = write!(out, " [{}]", variant);
        }
        if !line.description.is_empty() {
            let _ = write!(out, " {}", line.description);
        }
        if let Some(ref qty) = line.quantity {
            let _ = write!(out, "  x {}", qty);
        }
        if let Some(ref price) = line.price {
            let _ = write!(out, "  @ {}", price);
        }
        out.push('\n');
    }

    if parsed.lines.is_empty() {
        let _ = writeln!(out, "No specification lines found.");
    }

    if show_skipped && !parsed.skipped.is_empty() {
        let _ = writeln!(out, "\nSkipped lines:");
        for s in &parsed.skipped {
            let _ = writeln!(out, "  {:>4}  {:<32} {}", s.line_number, s.reason.to_string(), truncate(&s.line_text));
        }
    } else if !parsed.skipped.is_empty() {
        let _ = writeln!(out, "\n{} line(s) skipped (use --show-skipped to list them)", parsed.skipped.len());
    }
    out
}

pub fn format_variables(map: &FieldMap) -> String {
    if map.is_empty() {
        return "No variables found.\n".to_string();
    }
    let rows: Vec<Vec<String>> = map
        .records()
        .iter()
        .map(|r| vec![r.name.clone(), truncate(&r.value), r.source.to_string()])
        .collect();
    columns(&["Variable", "Value", "Source"], &rows)
}

pub fn format_report(report: &ComparisonReport) -> String {
    let mut out = String::new();
    if let (Some(a), Some(b)) = (&report.name_a, &report.name_b) {
        let _ = writeln!(out, "A: {a}\nB: {b}\n");
    }

    if report.rows.is_empty() {
        let _ = writeln!(out, "Nothing to compare: no field was found in either document.\n");
    } else {
        let rows: Vec<Vec<String>> = report
            .rows
            .iter()
            .map(|r| {
                vec![
                    r.match_status.symbol().to_string(),
                    truncate(&r.line_item),
                    truncate(&r.value_a),
                    truncate(&r.value_b),
                    r.confidence.map(|c| format!("{c:.0}")).unwrap_or_default(),
                ]
            })
            .collect();
        out.push_str(&columns(&["", "Line Item", "Value A", "Value B", "Score"], &rows));
        out.push('\n');
    }

    let s = &report.summary;
    let _ = writeln!(
        out,
        "Total {}  Exact {}  Partial {}  Only in A {}  Only in B {}  No match {}",
        s.total, s.exact, s.partial, s.only_in_a, s.only_in_b, s.no_match
    );
    let _ = writeln!(out, "Match rate: {}", s.match_rate_display());
    out
}
