//! End-to-end tests for the extract -> parse -> match -> aggregate pipeline.
//!
//! Uses a MockExtractor that returns pre-built PageContent without
//! invoking pdftotext, and a MockClient standing in for the LLM API.

use quotediff_core::compare::MatchStatus;
use quotediff_core::error::QuoteDiffError;
use quotediff_core::export::{export_report, ExportFormat};
use quotediff_core::extraction::{extract_document, PageContent, PdfExtractor};
use quotediff_core::llm::{CompletionRequest, LlmClient, LlmComparison, LlmSettings, RetryingClient};
use quotediff_core::matching::MatcherConfig;
use quotediff_core::model::ExtractedDocument;
use quotediff_core::vocab::builtin::load_preset;
use quotediff_core::vocab::Vocabulary;
use quotediff_core::{compare_spec_documents, compare_variable_documents, parse_document};
use std::sync::Mutex;
use std::time::Duration;

const LIMIT: usize = 1024 * 1024;

struct MockExtractor {
    pages: Vec<PageContent>,
}

impl PdfExtractor for MockExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, QuoteDiffError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn page(number: usize, lines: &[&str]) -> PageContent {
    PageContent {
        page_number: number,
        lines: lines.iter().map(|s| s.to_string()).collect(),
    }
}

fn factory() -> Vocabulary {
    Vocabulary::compile(load_preset("factory").unwrap()).unwrap()
}

fn pdf(name: &str, pages: Vec<PageContent>) -> ExtractedDocument {
    extract_document(name, b"%PDF-1.7", &MockExtractor { pages }, LIMIT).unwrap()
}

fn txt(name: &str, text: &str) -> ExtractedDocument {
    let none = MockExtractor { pages: vec![] };
    extract_document(name, text.as_bytes(), &none, LIMIT).unwrap()
}

// ---------------------------------------------------------------------------
// Spec-line pipeline
// ---------------------------------------------------------------------------

fn quote_a() -> ExtractedDocument {
    pdf(
        "quote-a.pdf",
        vec![
            page(
                1,
                &[
                    "Acme Homes Specification",
                    "Buyer: Jane Doe",
                    "Feature      Option     Variant   Description        Quantity   Price",
                    "Exterior",
                    "ROOF SHINGLES    OP000080    Architectural shingles    Standard",
                    "SIDING    OP000412    Vinyl lap, Almond    4,250.00",
                    "**  12 inch reveal",
                    "Page 1 of 2",
                ],
            ),
            page(
                2,
                &[
                    "Kitchen",
                    "KITCHEN FAUCET   OP000512   Pull-down, Brushed Nickel   1 EA   189.00",
                    "Page 2 of 2",
                ],
            ),
        ],
    )
}

fn quote_b() -> ExtractedDocument {
    pdf(
        "quote-b.pdf",
        vec![page(
            1,
            &[
                "Exterior",
                "ROOF SHINGLES    OP000080    Architectural shingles    Standard",
                "SIDING    OP000412    Vinyl lap, Almond    4,450.00",
                "Kitchen",
                "KITCHEN FAUCET   OP000512   Pull-down, Brushed Nickel   1 EA   189.00",
                "Bath",
                "MIRROR   OP000700   Framed mirror   2 EA   120.00",
            ],
        )],
    )
}

#[test]
fn parse_spec_pdf_drops_boilerplate_and_merges_continuations() {
    let vocab = factory();
    let parsed = parse_document(&quote_a(), &vocab);

    assert_eq!(parsed.lines.len(), 3);
    let siding = &parsed.lines[1];
    assert_eq!(siding.section, "Exterior");
    assert_eq!(siding.feature, "SIDING");
    assert_eq!(siding.variant.as_deref(), Some("Almond"));
    assert_eq!(siding.price.as_deref(), Some("4,250.00"));
    assert_eq!(siding.description, "Vinyl lap | 12 inch reveal");

    let faucet = &parsed.lines[2];
    assert_eq!(faucet.section, "Kitchen");
    assert_eq!(faucet.quantity.as_deref(), Some("1 EA"));

    // Title line, buyer, column header and two page footers.
    assert_eq!(parsed.skipped.len(), 5);
}

#[test]
fn compare_spec_documents_pairs_by_option_code() {
    let vocab = factory();
    let report = compare_spec_documents(&quote_a(), &quote_b(), &vocab, &MatcherConfig::default());

    assert_eq!(report.name_a.as_deref(), Some("quote-a.pdf"));
    assert_eq!(report.rows.len(), 4);
    assert_eq!(report.rows[0].line_item, "ROOF SHINGLES (OP000080)");
    assert_eq!(report.rows[0].match_status, MatchStatus::Exact);
    assert_ne!(report.rows[1].match_status, MatchStatus::Exact);
    assert!(report.rows[1].value_b.contains("4,450.00"));
    assert_eq!(report.rows[2].match_status, MatchStatus::Exact);
    assert_eq!(report.rows[3].line_item, "MIRROR (OP000700)");
    assert_eq!(report.rows[3].match_status, MatchStatus::OnlyInB);

    assert_eq!(report.summary.total, 4);
    assert_eq!(report.summary.exact, 2);
    assert_eq!(report.summary.only_in_b, 1);
    assert_eq!(report.summary.match_rate(), Some(50.0));
}

// ---------------------------------------------------------------------------
// Variable pipeline
// ---------------------------------------------------------------------------

const VARIABLES_A: &str = "\
Model: Summit 2856
Roof Pitch: Roof Pitch 4/12
Exterior Siding: Vinyl lap
Siding Color: Pebble Clay
Front Door: Six panel steel
Wind Zone: Not Found
Delivery: 6-8 weeks
";

const VARIABLES_B: &str = "\
Model: Summit 2856
Roof Pitch: 4/12
Exterior Siding: Vinyl lap siding
OP000250 Six panel steel
Warranty: 10 years
";

#[test]
fn compare_variable_documents_uses_schema_then_aliases() {
    let vocab = factory();
    let a = txt("a.txt", VARIABLES_A);
    let b = txt("b.txt", VARIABLES_B);
    let report = compare_variable_documents(&a, &b, &vocab, &MatcherConfig::default());

    let rows: Vec<(&str, MatchStatus)> = report
        .rows
        .iter()
        .map(|r| (r.line_item.as_str(), r.match_status))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Model", MatchStatus::Exact),
            ("Roof Pitch", MatchStatus::Exact),
            ("Siding", MatchStatus::Partial),
            ("Delivery", MatchStatus::OnlyInA),
            ("Warranty", MatchStatus::OnlyInB),
            ("Siding Color (OP000412)", MatchStatus::OnlyInA),
            ("Front Door (OP000250)", MatchStatus::Exact),
        ]
    );
    assert!(!report.rows.iter().any(|r| r.line_item == "Wind Zone"));
    assert_eq!(report.summary.exact, 3);
}

#[test]
fn documents_without_shared_fields_have_no_match_rate() {
    let vocab = factory();
    let a = txt("a.txt", "Wind Zone: Not Found\n");
    let b = txt("b.txt", "nothing useful here\n");
    let report = compare_variable_documents(&a, &b, &vocab, &MatcherConfig::default());
    assert_eq!(report.summary.total, 0);
    assert_eq!(report.summary.match_rate(), None);
}

#[test]
fn report_exports_to_csv() {
    let vocab = factory();
    let report = compare_spec_documents(&quote_a(), &quote_b(), &vocab, &MatcherConfig::default());
    let csv = String::from_utf8(export_report(&report, ExportFormat::Csv).unwrap()).unwrap();
    assert_eq!(csv.lines().count(), 5);
    assert!(csv.contains("MIRROR (OP000700),,"));
}

// ---------------------------------------------------------------------------
// Extraction errors
// ---------------------------------------------------------------------------

#[test]
fn oversized_and_unsupported_documents_are_rejected() {
    let none = MockExtractor { pages: vec![] };
    assert!(matches!(
        extract_document("quote.txt", &[b'x'; 64], &none, 32),
        Err(QuoteDiffError::DocumentTooLarge { size: 64, limit: 32 })
    ));
    assert!(matches!(
        extract_document("quote.rtf", b"{\\rtf1}", &none, LIMIT),
        Err(QuoteDiffError::UnsupportedFormat(_))
    ));
}

// ---------------------------------------------------------------------------
// LLM workflow
// ---------------------------------------------------------------------------

struct MockClient {
    replies: Mutex<Vec<Result<String, QuoteDiffError>>>,
}

impl MockClient {
    fn new(mut replies: Vec<Result<String, QuoteDiffError>>) -> Self {
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
        }
    }
}

impl LlmClient for MockClient {
    fn complete(&self, _request: &CompletionRequest) -> Result<String, QuoteDiffError> {
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(QuoteDiffError::Llm("no reply scripted".into())))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[test]
fn llm_comparison_survives_transient_failure_and_prose_reply() {
    let client = RetryingClient::new(
        MockClient::new(vec![
            Err(QuoteDiffError::LlmStatus {
                status: 503,
                body: "unavailable".into(),
            }),
            Ok("Quote 2 is slightly more expensive.".into()),
            Ok("```json\n{\"line_items\": [{\"description\": \"Siding\"}]}\n```".into()),
            Ok("| Item | Quote 1 | Quote 2 |".into()),
            Ok("Detailed analysis".into()),
            Ok("Terms comparison".into()),
            Ok("Go with quote 1.".into()),
        ]),
        3,
        Duration::ZERO,
    );
    let settings = LlmSettings {
        model: "claude-test".into(),
        max_tokens: 512,
    };

    let result = LlmComparison::run(&client, &settings, &quote_a(), &quote_b()).unwrap();
    let items = &result.structured.as_value().unwrap()["line_items"];
    assert_eq!(items[0]["description"], "Siding");
    assert_eq!(result.executive_summary, "Go with quote 1.");
    assert!(result.to_markdown().contains("## Executive Summary"));
}

#[test]
fn llm_comparison_reports_exhausted_retries() {
    let client = RetryingClient::new(
        MockClient::new(vec![
            Err(QuoteDiffError::Llm("connection reset".into())),
            Err(QuoteDiffError::Llm("connection reset".into())),
            Err(QuoteDiffError::Llm("connection reset".into())),
        ]),
        3,
        Duration::ZERO,
    );
    let settings = LlmSettings {
        model: "claude-test".into(),
        max_tokens: 512,
    };
    let err = LlmComparison::run(&client, &settings, &quote_a(), &quote_b()).unwrap_err();
    assert!(matches!(
        err,
        QuoteDiffError::LlmRetriesExhausted { attempts: 3, .. }
    ));
}
