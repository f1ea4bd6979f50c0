//! Ordered field-extraction rules for specification lines.
//!
//! Each rule searches the text that is still unclaimed, records its match on
//! the [`SpecLine`] and removes the matched span, so text can only be claimed
//! by the first rule that matches it. The order is option code, quantity,
//! price, variant.

use crate::model::SpecLine;
use crate::parsing::price::format_price;
use crate::vocab::Vocabulary;
use regex::Regex;
use std::sync::LazyLock;

static OPTION_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bOP\d{6}\b").expect("option code pattern is valid"));

static OPTION_CODE_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^OP\d{6}$").expect("option code pattern is valid"));

static QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d+(?:,\d{3})*\s*(?:(?:EA|LF|SF)\b|D\$)").expect("quantity pattern is valid")
});

static PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bStandard\b|[-+]?\$?(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2}\b")
        .expect("price pattern is valid")
});

/// Whether `token` is exactly an option code (`OP` followed by six digits).
pub fn is_option_code(token: &str) -> bool {
    OPTION_CODE_EXACT.is_match(token)
}

/// Whether `text` contains an option code anywhere.
pub fn contains_option_code(text: &str) -> bool {
    OPTION_CODE.is_match(text)
}

/// Find the first option code in `text`.
pub fn find_option_code(text: &str) -> Option<&str> {
    OPTION_CODE.find(text).map(|m| m.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    OptionCode,
    Quantity,
    Price,
    Variant,
}

/// One extraction step: candidate patterns tried in order, and how a match
/// is written onto the record.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    pub field: Field,
    patterns: Vec<(Option<String>, Regex)>,
}

impl ExtractionRule {
    fn single(field: Field, pattern: &Regex) -> Self {
        Self {
            field,
            patterns: vec![(None, pattern.clone())],
        }
    }

    /// Claim the first match of this rule from `remaining`, writing it to
    /// `line`. Returns true when something was claimed.
    pub fn apply(&self, remaining: &mut String, line: &mut SpecLine) -> bool {
        for (canonical, pattern) in &self.patterns {
            let Some(m) = pattern.find(remaining) else {
                continue;
            };
            let range = m.range();
            let matched = m.as_str().trim().to_string();
            let value = canonical.clone().unwrap_or(matched);
            if !self.set(line, value) {
                continue;
            }
            remaining.replace_range(range, " ");
            return true;
        }
        false
    }

    fn set(&self, line: &mut SpecLine, value: String) -> bool {
        match self.field {
            Field::OptionCode => line.option_code = Some(value),
            Field::Quantity => line.quantity = Some(collapse_ws(&value)),
            Field::Price => match format_price(&value) {
                Some(price) => line.price = Some(price),
                None => return false,
            },
            Field::Variant => line.variant = Some(value),
        }
        true
    }
}

/// The rule chain in claim order.
pub fn default_rules(vocab: &Vocabulary) -> Vec<ExtractionRule> {
    vec![
        ExtractionRule::single(Field::OptionCode, &OPTION_CODE),
        ExtractionRule::single(Field::Quantity, &QUANTITY),
        ExtractionRule::single(Field::Price, &PRICE),
        ExtractionRule {
            field: Field::Variant,
            patterns: vocab
                .variant_patterns()
                .iter()
                .map(|(name, re)| (Some(name.clone()), re.clone()))
                .collect(),
        },
    ]
}

/// Byte length of the leading feature run of a trimmed line.
///
/// The run is a sequence of whitespace-separated words made only of
/// uppercase letters, digits and `&`, each containing at least one uppercase
/// letter (a lone `&` is allowed). Option codes end the run.
pub fn feature_end(trimmed: &str) -> Option<usize> {
    let mut end = None;
    let mut pos = 0;

    for word in trimmed.split_whitespace() {
        let start = pos + trimmed[pos..].find(word)?;
        let word_end = start + word.len();
        if !is_feature_word(word) {
            break;
        }
        end = Some(word_end);
        pos = word_end;
    }

    end
}

fn is_feature_word(word: &str) -> bool {
    if word == "&" {
        return true;
    }
    if is_option_code(word) {
        return false;
    }
    word.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '&')
        && word.chars().any(|c| c.is_ascii_uppercase())
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
