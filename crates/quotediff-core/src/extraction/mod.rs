pub mod docx;
pub mod pdftotext;
pub mod table;
pub mod xlsx;

use crate::error::QuoteDiffError;
use crate::model::{DocumentKind, ExtractedDocument};

/// Default cap on uploaded document size (25 MiB).
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 25 * 1024 * 1024;

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, QuoteDiffError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Extract text and tables from an uploaded document, dispatching on the
/// file extension of `name`.
pub fn extract_document(
    name: &str,
    bytes: &[u8],
    pdf: &dyn PdfExtractor,
    max_bytes: usize,
) -> Result<ExtractedDocument, QuoteDiffError> {
    if bytes.len() > max_bytes {
        return Err(QuoteDiffError::DocumentTooLarge {
            size: bytes.len(),
            limit: max_bytes,
        });
    }

    let kind = DocumentKind::from_file_name(name)
        .ok_or_else(|| QuoteDiffError::UnsupportedFormat(name.to_string()))?;

    let (raw_text, tables) = match kind {
        DocumentKind::Pdf => {
            let pages = pdf.extract_pages(bytes)?;
            let lines: Vec<String> = pages.into_iter().flat_map(|p| p.lines).collect();
            let tables = table::detect_tables(&lines);
            (lines.join("\n"), tables)
        }
        DocumentKind::Text => {
            let text = String::from_utf8_lossy(bytes).into_owned();
            let lines: Vec<&str> = text.lines().collect();
            let tables = table::detect_tables(&lines);
            (text, tables)
        }
        DocumentKind::Docx => {
            let content = docx::extract_docx(bytes)?;
            (content.lines.join("\n"), content.tables)
        }
        DocumentKind::Xlsx => {
            let sheets = xlsx::extract_xlsx(bytes)?;
            let text = sheets
                .iter()
                .flat_map(xlsx::sheet_lines)
                .collect::<Vec<_>>()
                .join("\n");
            let tables = sheets
                .into_iter()
                .map(|s| s.rows)
                .filter(|rows| !rows.is_empty())
                .collect();
            (text, tables)
        }
    };

    let text = process_text(&raw_text);
    let backend = match kind {
        DocumentKind::Pdf => pdf.backend_name(),
        _ => "builtin",
    };
    if text.is_empty() {
        tracing::warn!(document = name, "no text extracted");
    }
    tracing::info!(
        document = name,
        kind = %kind,
        backend,
        chars = text.len(),
        tables = tables.len(),
        "extracted document"
    );

    Ok(ExtractedDocument {
        name: name.to_string(),
        kind,
        text,
        raw_text,
        tables,
    })
}

/// Collapse whitespace runs inside each line and drop blank lines.
pub fn process_text(raw: &str) -> String {
    raw.lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPages(Vec<&'static str>);

    impl PdfExtractor for FixedPages {
        fn extract_pages(&self, _: &[u8]) -> Result<Vec<PageContent>, QuoteDiffError> {
            Ok(self
                .0
                .iter()
                .enumerate()
                .map(|(i, page)| PageContent {
                    page_number: i + 1,
                    lines: page.lines().map(String::from).collect(),
                })
                .collect())
        }

        fn backend_name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_process_text() {
        assert_eq!(
            process_text("  ROOF   SHINGLES\tOP000080 \n\n   \nEXTERIOR"),
            "ROOF SHINGLES OP000080\nEXTERIOR"
        );
    }

    #[test]
    fn test_pdf_pages_joined_and_tables_detected() {
        let pdf = FixedPages(vec![
            "EXTERIOR\nROOF SHINGLES   OP000080   Standard\nSIDING         OP000412   4,250.00",
            "KITCHEN\nFAUCET  OP000512",
        ]);
        let doc = extract_document("quote.pdf", b"%PDF", &pdf, DEFAULT_MAX_DOCUMENT_BYTES).unwrap();
        assert_eq!(doc.kind, DocumentKind::Pdf);
        assert!(doc.raw_text.contains("ROOF SHINGLES   OP000080"));
        assert!(doc.text.contains("ROOF SHINGLES OP000080 Standard"));
        assert_eq!(doc.text.lines().count(), 5);
        assert_eq!(doc.tables.len(), 1);
        assert_eq!(doc.tables[0].len(), 2);
    }

    #[test]
    fn test_text_document() {
        let pdf = FixedPages(vec![]);
        let doc = extract_document("notes.TXT", b"Roof Pitch: 4/12\n\n", &pdf, 1024).unwrap();
        assert_eq!(doc.kind, DocumentKind::Text);
        assert_eq!(doc.text, "Roof Pitch: 4/12");
        assert!(doc.tables.is_empty());
    }

    #[test]
    fn test_size_limit() {
        let pdf = FixedPages(vec![]);
        let err = extract_document("big.txt", &[b'a'; 11], &pdf, 10).unwrap_err();
        assert!(matches!(
            err,
            QuoteDiffError::DocumentTooLarge { size: 11, limit: 10 }
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let pdf = FixedPages(vec![]);
        let err = extract_document("photo.png", b"x", &pdf, 1024).unwrap_err();
        assert!(matches!(err, QuoteDiffError::UnsupportedFormat(_)));
    }
}
