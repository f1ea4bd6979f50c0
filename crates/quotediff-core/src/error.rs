use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum QuoteDiffError {
    #[error("document extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("unsupported document format: {0}. Supported: pdf, docx, txt, xlsx")]
    UnsupportedFormat(String),

    #[error("document is {size} bytes, larger than the {limit} byte limit")]
    DocumentTooLarge { size: usize, limit: usize },

    #[error("failed to parse document: {0}")]
    ParseError(String),

    #[error("failed to load vocabulary from {path}: {reason}")]
    VocabularyLoad { path: PathBuf, reason: String },

    #[error("invalid vocabulary: {0}")]
    VocabularyInvalid(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no API key configured. Set ANTHROPIC_API_KEY or add \"api_key\" to the config file")]
    MissingApiKey,

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("LLM API returned {status}: {body}")]
    LlmStatus { status: u16, body: String },

    #[error("LLM request failed after {attempts} attempt(s): {last}")]
    LlmRetriesExhausted { attempts: u32, last: String },

    #[error("LLM returned malformed output: {0}")]
    MalformedLlmOutput(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),
}

impl QuoteDiffError {
    /// Whether retrying the same LLM request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            QuoteDiffError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            QuoteDiffError::LlmStatus { status, .. } => *status == 429 || *status >= 500,
            QuoteDiffError::Llm(_) => true,
            _ => false,
        }
    }
}
