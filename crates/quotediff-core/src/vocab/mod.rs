pub mod builtin;
pub mod schema;

use crate::error::QuoteDiffError;
use crate::parsing::rules::{contains_option_code, is_option_code};
use regex::Regex;
use schema::VocabularyDef;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

static PAGE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:page\s+)?\d+(?:\s+of\s+\d+)?$").expect("page number pattern is valid")
});

/// Largest accepted forward line offset for a special-cased option code.
pub const MAX_CODE_OFFSET: usize = 100;

/// Load a vocabulary from a JSON file.
pub fn load_vocabulary(path: &Path) -> Result<VocabularyDef, QuoteDiffError> {
    let content = std::fs::read_to_string(path).map_err(|e| QuoteDiffError::VocabularyLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_vocabulary(&content, path)
}

/// Parse a vocabulary from a JSON string, reporting errors against `source`.
pub fn parse_vocabulary(json: &str, source: &Path) -> Result<VocabularyDef, QuoteDiffError> {
    let vocab: VocabularyDef =
        serde_json::from_str(json).map_err(|e| QuoteDiffError::VocabularyLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_vocabulary(&vocab)?;
    Ok(vocab)
}

/// Parse a vocabulary from a JSON string (no file path context).
pub fn parse_vocabulary_str(json: &str) -> Result<VocabularyDef, QuoteDiffError> {
    let vocab: VocabularyDef = serde_json::from_str(json).map_err(QuoteDiffError::Json)?;
    validate_vocabulary(&vocab)?;
    Ok(vocab)
}

/// Validate that a vocabulary is well-formed.
pub fn validate_vocabulary(vocab: &VocabularyDef) -> Result<(), QuoteDiffError> {
    if vocab.name.trim().is_empty() {
        return Err(QuoteDiffError::VocabularyInvalid(
            "name must not be empty".into(),
        ));
    }

    if vocab.default_section.trim().is_empty() {
        return Err(QuoteDiffError::VocabularyInvalid(
            "default_section must not be empty".into(),
        ));
    }

    if vocab.section_headers.iter().any(|h| h.trim().is_empty()) {
        return Err(QuoteDiffError::VocabularyInvalid(
            "section headers must not be empty".into(),
        ));
    }

    if vocab.variants.iter().any(|v| v.trim().is_empty()) {
        return Err(QuoteDiffError::VocabularyInvalid(
            "variant names must not be empty".into(),
        ));
    }

    if vocab.continuation_markers.is_empty()
        || vocab.continuation_markers.iter().any(|m| m.trim().is_empty())
    {
        return Err(QuoteDiffError::VocabularyInvalid(
            "continuation_markers must be a non-empty list of non-blank markers".into(),
        ));
    }

    let mut names = HashSet::new();
    for label in &vocab.labels {
        if label.label.trim().is_empty() || label.name.trim().is_empty() {
            return Err(QuoteDiffError::VocabularyInvalid(
                "label text and canonical name must not be empty".into(),
            ));
        }
        if !names.insert(label.name.as_str()) {
            return Err(QuoteDiffError::VocabularyInvalid(format!(
                "canonical name '{}' is used by more than one label",
                label.name
            )));
        }
    }

    for (code, offset) in &vocab.code_offsets {
        if !is_option_code(code) {
            return Err(QuoteDiffError::VocabularyInvalid(format!(
                "code_offsets key '{}' is not an option code (expected OP + 6 digits)",
                code
            )));
        }
        if *offset == 0 || *offset > MAX_CODE_OFFSET {
            return Err(QuoteDiffError::VocabularyInvalid(format!(
                "offset {} for '{}' is out of range (1..={})",
                offset, code, MAX_CODE_OFFSET
            )));
        }
    }

    for alias in &vocab.aliases {
        if alias.a.trim().is_empty() || alias.b.trim().is_empty() {
            return Err(QuoteDiffError::VocabularyInvalid(
                "alias field names must not be empty".into(),
            ));
        }
    }

    Ok(())
}

/// A validated vocabulary with its variant patterns compiled.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    def: VocabularyDef,
    variant_patterns: Vec<(String, Regex)>,
    embedded_labels: Vec<String>,
}

impl Vocabulary {
    pub fn compile(def: VocabularyDef) -> Result<Self, QuoteDiffError> {
        validate_vocabulary(&def)?;

        let variant_patterns = def
            .variants
            .iter()
            .map(|v| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(v.trim()));
                Regex::new(&pattern)
                    .map(|re| (v.trim().to_string(), re))
                    .map_err(|e| {
                        QuoteDiffError::VocabularyInvalid(format!("variant '{}': {}", v, e))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let embedded_labels = def
            .embedded_labels
            .iter()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();

        Ok(Self {
            def,
            variant_patterns,
            embedded_labels,
        })
    }

    pub fn def(&self) -> &VocabularyDef {
        &self.def
    }

    pub fn default_section(&self) -> &str {
        &self.def.default_section
    }

    pub fn variant_patterns(&self) -> &[(String, Regex)] {
        &self.variant_patterns
    }

    /// Lowercased labels stripped from values before fuzzy matching.
    pub fn embedded_labels(&self) -> &[String] {
        &self.embedded_labels
    }

    pub fn is_section_header(&self, trimmed: &str) -> bool {
        self.def.section_headers.iter().any(|h| h == trimmed)
    }

    /// Check a trimmed line against the footer/header filters.
    pub fn is_boilerplate(&self, trimmed: &str) -> bool {
        let bp = &self.def.boilerplate;
        if bp.prefixes.iter().any(|p| trimmed.starts_with(p.as_str())) {
            return true;
        }
        // Footer phrases never win over a line that carries an option code.
        if !contains_option_code(trimmed)
            && bp.contains.iter().any(|c| trimmed.contains(c.as_str()))
        {
            return true;
        }
        if PAGE_NUMBER.is_match(trimmed) {
            return true;
        }
        match bp.column_header.as_deref() {
            Some(header) => collapse_ws(trimmed).eq_ignore_ascii_case(&collapse_ws(header)),
            None => false,
        }
    }

    /// If the line starts with a continuation marker, return what follows it.
    pub fn continuation_remainder<'a>(&self, trimmed: &'a str) -> Option<&'a str> {
        self.def
            .continuation_markers
            .iter()
            .find_map(|m| trimmed.strip_prefix(m.as_str()))
            .map(str::trim)
    }

    /// Canonical variable names, in label order.
    pub fn label_names(&self) -> Vec<String> {
        self.def.labels.iter().map(|l| l.name.clone()).collect()
    }

    pub fn code_offset(&self, code: &str) -> Option<usize> {
        self.def.code_offsets.get(code).copied()
    }

    pub fn starts_with_label(&self, trimmed: &str) -> bool {
        self.def
            .labels
            .iter()
            .any(|l| trimmed.starts_with(l.label.as_str()))
    }
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
