use crate::model::{FieldMap, VariableSource};
use crate::parsing::rules::is_option_code;
use crate::vocab::Vocabulary;

/// Pulls a flat name -> value map out of "Label: value" style documents.
///
/// Three passes, earlier passes winning on duplicate names:
/// 1. known vocabulary labels (text after the first occurrence, to end of line)
/// 2. option-code lines (`OP123456 value...`, or a fixed line offset for
///    special-cased codes)
/// 3. generic `key: value` lines
pub struct VariableExtractor<'v> {
    vocab: &'v Vocabulary,
}

impl<'v> VariableExtractor<'v> {
    pub fn new(vocab: &'v Vocabulary) -> Self {
        Self { vocab }
    }

    pub fn extract(&self, text: &str) -> FieldMap {
        let mut map = FieldMap::new();

        for label in &self.vocab.def().labels {
            match extract_after_label(text, &label.label) {
                Some(value) => {
                    map.insert(&label.name, &value, VariableSource::Label);
                }
                None => tracing::debug!(label = %label.label, "label not found"),
            }
        }

        let lines: Vec<&str> = text.lines().collect();
        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some((code, value)) = split_code_line(trimmed) {
                match self.vocab.code_offset(code) {
                    // The value for these codes sits further down the page.
                    Some(offset) => match lines.get(i + offset).map(|l| l.trim()) {
                        Some(v) if !v.is_empty() => {
                            map.insert(code, v, VariableSource::CodeOffset);
                        }
                        _ => tracing::debug!(code, offset, "offset line missing"),
                    },
                    None if !value.is_empty() => {
                        map.insert(code, &value, VariableSource::OptionCode);
                    }
                    None => {}
                }
                continue;
            }

            if self.vocab.starts_with_label(trimmed) {
                continue;
            }

            if let Some((key, value)) = trimmed.split_once(':') {
                let (key, value) = (key.trim(), value.trim());
                if !key.is_empty() && !value.is_empty() {
                    map.insert(key, value, VariableSource::KeyValue);
                }
            }
        }

        tracing::info!(variables = map.len(), "extracted variables");
        map
    }
}

/// Text after the first occurrence of `label`, up to the end of that line.
///
/// Leading colons and whitespace are skipped. Returns None when the label
/// does not occur or nothing follows it.
pub fn extract_after_label(text: &str, label: &str) -> Option<String> {
    let idx = text.find(label)?;
    let after = &text[idx + label.len()..];
    let line = after.split(['\n', '\r']).next().unwrap_or("");
    let value = line
        .trim_start_matches(|c: char| c == ':' || c.is_whitespace())
        .trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Split a line whose first or second token is an option code into
/// `(code, rest of line)`.
fn split_code_line(line: &str) -> Option<(&str, String)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let idx = tokens.iter().take(2).position(|t| is_option_code(t))?;
    Some((tokens[idx], tokens[idx + 1..].join(" ")))
}
