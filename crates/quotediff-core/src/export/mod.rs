//! Byte-buffer exports of comparison reports and parsed specifications.

pub mod delimited;
pub mod markdown;
pub mod workbook;

use crate::compare::{ComparisonReport, MatchResult};
use crate::error::QuoteDiffError;
use crate::model::SpecLine;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Json,
    Markdown,
}

impl ExportFormat {
    /// Format implied by a file name's extension.
    pub fn from_path(path: &Path) -> Result<Self, QuoteDiffError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "json" => Ok(ExportFormat::Json),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            _ => Err(QuoteDiffError::Export(format!(
                "cannot export to '{}': use a .csv, .xlsx, .json or .md file",
                path.display()
            ))),
        }
    }
}

/// A record that exports as one table row.
pub trait Tabular {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

impl Tabular for MatchResult {
    fn headers() -> &'static [&'static str] {
        &["Line Item", "Value A", "Value B", "Status", "Confidence"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.line_item.clone(),
            self.value_a.clone(),
            self.value_b.clone(),
            self.match_status.to_string(),
            self.confidence.map(|c| format!("{c:.1}")).unwrap_or_default(),
        ]
    }
}

impl Tabular for SpecLine {
    fn headers() -> &'static [&'static str] {
        &[
            "Section",
            "Feature",
            "Option Code",
            "Variant",
            "Description",
            "Quantity",
            "Price",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.section.clone(),
            self.feature.clone(),
            self.option_code.clone().unwrap_or_default(),
            self.variant.clone().unwrap_or_default(),
            self.description.clone(),
            self.quantity.clone().unwrap_or_default(),
            self.price.clone().unwrap_or_default(),
        ]
    }
}

pub fn export_report(report: &ComparisonReport, format: ExportFormat) -> Result<Vec<u8>, QuoteDiffError> {
    let bytes = match format {
        ExportFormat::Csv => delimited::to_csv(&report.rows)?,
        ExportFormat::Xlsx => workbook::report_to_xlsx(report)?,
        ExportFormat::Json => serde_json::to_vec_pretty(report)?,
        ExportFormat::Markdown => markdown::report_to_markdown(report).into_bytes(),
    };
    tracing::info!(format = ?format, bytes = bytes.len(), "exported comparison report");
    Ok(bytes)
}

pub fn export_spec_lines(lines: &[SpecLine], format: ExportFormat) -> Result<Vec<u8>, QuoteDiffError> {
    let bytes = match format {
        ExportFormat::Csv => delimited::to_csv(lines)?,
        ExportFormat::Xlsx => workbook::to_xlsx("Specification", lines)?,
        ExportFormat::Json => serde_json::to_vec_pretty(lines)?,
        ExportFormat::Markdown => markdown::to_markdown_table(lines).into_bytes(),
    };
    tracing::info!(format = ?format, bytes = bytes.len(), "exported spec lines");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::MatchStatus;

    fn sample_report() -> ComparisonReport {
        ComparisonReport::from_rows(vec![
            MatchResult {
                line_item: "Roof Pitch".into(),
                value_a: "4/12".into(),
                value_b: "4/12".into(),
                match_status: MatchStatus::Exact,
                confidence: Some(100.0),
            },
            MatchResult::only_in_a("Shutters", "Black, raised panel"),
        ])
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/report.CSV")).unwrap(),
            ExportFormat::Csv
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("r.md")).unwrap(),
            ExportFormat::Markdown
        );
        assert!(ExportFormat::from_path(Path::new("report.pdf")).is_err());
        assert!(ExportFormat::from_path(Path::new("report")).is_err());
    }

    #[test]
    fn test_match_result_cells() {
        let report = sample_report();
        assert_eq!(
            report.rows[0].cells(),
            vec!["Roof Pitch", "4/12", "4/12", "Exact", "100.0"]
        );
        assert_eq!(report.rows[1].cells()[3], "Only in A");
        assert_eq!(report.rows[1].cells()[4], "");
    }

    #[test]
    fn test_json_export_round_trips() {
        let report = sample_report();
        let bytes = export_report(&report, ExportFormat::Json).unwrap();
        let back: ComparisonReport = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, report);
    }
}
