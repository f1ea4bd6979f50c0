pub mod normalize;
pub mod similarity;

use crate::error::QuoteDiffError;
use crate::parsing::rules::contains_option_code;
use crate::vocab::Vocabulary;
use normalize::normalize_pair;
use serde::{Deserialize, Serialize};
use similarity::{partial_ratio, ratio, token_sort_ratio};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Plain edit ratio against `coarse_threshold`.
    Coarse,
    /// Weighted blend of ratios against `threshold`.
    #[default]
    Weighted,
}

/// Tunable weights and thresholds for the fuzzy matcher. Scores are 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub strategy: Strategy,
    pub ratio_weight: f64,
    pub partial_weight: f64,
    pub token_sort_weight: f64,
    pub threshold: f64,
    /// Used instead of `threshold` when both values contain an option code.
    pub option_code_threshold: f64,
    pub coarse_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Weighted,
            ratio_weight: 0.4,
            partial_weight: 0.3,
            token_sort_weight: 0.3,
            threshold: 75.0,
            option_code_threshold: 90.0,
            coarse_threshold: 50.0,
        }
    }
}

impl MatcherConfig {
    pub fn validate(&self) -> Result<(), QuoteDiffError> {
        let weights = [self.ratio_weight, self.partial_weight, self.token_sort_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(QuoteDiffError::Config(
                "matcher weights must be non-negative numbers".into(),
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(QuoteDiffError::Config(
                "at least one matcher weight must be positive".into(),
            ));
        }
        for (name, t) in [
            ("threshold", self.threshold),
            ("option_code_threshold", self.option_code_threshold),
            ("coarse_threshold", self.coarse_threshold),
        ] {
            if !(0.0..=100.0).contains(&t) {
                return Err(QuoteDiffError::Config(format!(
                    "{name} must be between 0 and 100, got {t}"
                )));
            }
        }
        Ok(())
    }
}

/// How two values were judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Normalized forms are equal.
    Exact,
    /// One normalized form contains the other.
    Substring,
    /// Similarity score reached the threshold.
    Fuzzy,
    NoMatch,
    /// At least one side is empty.
    Missing,
}

impl MatchKind {
    pub fn is_match(self) -> bool {
        matches!(self, MatchKind::Exact | MatchKind::Substring | MatchKind::Fuzzy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub kind: MatchKind,
    /// Similarity score (0-100) of the normalized values.
    pub score: f64,
}

/// Decides whether two extracted values describe the same thing.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    config: MatcherConfig,
    embedded_labels: Vec<String>,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(MatcherConfig::default(), Vec::new())
    }
}

impl FuzzyMatcher {
    pub fn new(config: MatcherConfig, embedded_labels: Vec<String>) -> Self {
        let embedded_labels = embedded_labels
            .into_iter()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();
        Self {
            config,
            embedded_labels,
        }
    }

    /// Matcher using the vocabulary's embedded labels.
    pub fn for_vocabulary(config: MatcherConfig, vocab: &Vocabulary) -> Self {
        Self::new(config, vocab.embedded_labels().to_vec())
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn is_match(&self, a: &str, b: &str) -> bool {
        self.evaluate(a, b).kind.is_match()
    }

    pub fn evaluate(&self, a: &str, b: &str) -> MatchOutcome {
        if a.trim().is_empty() || b.trim().is_empty() {
            return MatchOutcome {
                kind: MatchKind::Missing,
                score: 0.0,
            };
        }

        let (na, nb) = normalize_pair(a, b, &self.embedded_labels);
        if na.is_empty() || nb.is_empty() {
            return MatchOutcome {
                kind: MatchKind::Missing,
                score: 0.0,
            };
        }

        if na == nb {
            return MatchOutcome {
                kind: MatchKind::Exact,
                score: 100.0,
            };
        }

        let score = self.score_normalized(&na, &nb);
        if na.contains(nb.as_str()) || nb.contains(na.as_str()) {
            return MatchOutcome {
                kind: MatchKind::Substring,
                score,
            };
        }

        let threshold = self.threshold_for(a, b);
        let kind = if score >= threshold {
            MatchKind::Fuzzy
        } else {
            MatchKind::NoMatch
        };
        MatchOutcome { kind, score }
    }

    /// Cheap pre-check for `evaluate`: false only when the pair cannot match.
    ///
    /// Edit-distance ratios are bounded by the length ratio of the two
    /// normalized values, so the bound takes the partial ratio at its maximum
    /// and skips every edit-distance computation.
    pub fn could_match(&self, a: &str, b: &str) -> bool {
        if a.trim().is_empty() || b.trim().is_empty() {
            return false;
        }
        let (na, nb) = normalize_pair(a, b, &self.embedded_labels);
        if na.is_empty() || nb.is_empty() {
            return false;
        }
        if na.contains(nb.as_str()) || nb.contains(na.as_str()) {
            return true;
        }

        let (la, lb) = (na.chars().count() as f64, nb.chars().count() as f64);
        let length_bound = 100.0 * la.min(lb) / la.max(lb);
        let c = &self.config;
        let bound = match c.strategy {
            Strategy::Coarse => length_bound,
            Strategy::Weighted => {
                let total = c.ratio_weight + c.partial_weight + c.token_sort_weight;
                if total <= 0.0 {
                    length_bound
                } else {
                    ((c.ratio_weight + c.token_sort_weight) * length_bound
                        + c.partial_weight * 100.0)
                        / total
                }
            }
        };
        bound + 1e-9 >= self.threshold_for(a, b)
    }

    /// Similarity of two raw values under the configured strategy.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        let (na, nb) = normalize_pair(a, b, &self.embedded_labels);
        self.score_normalized(&na, &nb)
    }

    fn score_normalized(&self, a: &str, b: &str) -> f64 {
        let c = &self.config;
        match c.strategy {
            Strategy::Coarse => ratio(a, b),
            Strategy::Weighted => {
                let total = c.ratio_weight + c.partial_weight + c.token_sort_weight;
                if total <= 0.0 {
                    return ratio(a, b);
                }
                (c.ratio_weight * ratio(a, b)
                    + c.partial_weight * partial_ratio(a, b)
                    + c.token_sort_weight * token_sort_ratio(a, b))
                    / total
            }
        }
    }

    fn threshold_for(&self, a: &str, b: &str) -> f64 {
        match self.config.strategy {
            Strategy::Coarse => self.config.coarse_threshold,
            Strategy::Weighted if contains_option_code(a) && contains_option_code(b) => self
                .config
                .threshold
                .max(self.config.option_code_threshold),
            Strategy::Weighted => self.config.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> FuzzyMatcher {
        FuzzyMatcher::new(MatcherConfig::default(), vec!["Roof Pitch".into()])
    }

    #[test]
    fn test_roof_pitch_scenario() {
        let m = matcher();
        let outcome = m.evaluate("Roof Pitch 4/12", "ROOF PITCH 4/12");
        assert_eq!(outcome.kind, MatchKind::Exact);
        assert!(m.is_match("Roof Pitch 4/12", "ROOF PITCH 4/12"));
        assert!(m.is_match("Roof Pitch: 4/12", "4/12"));
    }

    #[test]
    fn test_missing_is_never_a_match() {
        let m = matcher();
        assert_eq!(m.evaluate("", "Standard").kind, MatchKind::Missing);
        assert_eq!(m.evaluate("Standard", "   ").kind, MatchKind::Missing);
        assert_eq!(m.evaluate("!!!", "Standard").kind, MatchKind::Missing);
        assert!(!m.is_match("", ""));
    }

    #[test]
    fn test_substring_shortcut() {
        let m = matcher();
        let outcome = m.evaluate("Vinyl lap siding", "Vinyl lap siding, 12 inch reveal");
        assert_eq!(outcome.kind, MatchKind::Substring);
    }

    #[test]
    fn test_misspelling_fuzzy_match() {
        let m = matcher();
        let outcome = m.evaluate("Architectural Shingles", "architectual shingle");
        assert_eq!(outcome.kind, MatchKind::Fuzzy);
        assert!(outcome.score >= 75.0);
    }

    #[test]
    fn test_reordered_words_score_above_plain_ratio() {
        let m = matcher();
        let blended = m.score("Nickel Brushed faucet", "faucet, brushed nickel");
        let plain = ratio("nickel brushed faucet", "faucet brushed nickel");
        assert!(blended > plain);
    }

    #[test]
    fn test_unrelated_values_no_match() {
        let m = matcher();
        assert_eq!(m.evaluate("Vinyl lap", "Ceramic tile").kind, MatchKind::NoMatch);
    }

    #[test]
    fn test_option_code_raises_threshold() {
        let config = MatcherConfig {
            threshold: 60.0,
            ..MatcherConfig::default()
        };
        let m = FuzzyMatcher::new(config, vec![]);
        let score = m.score("OP000080 Shingles 30yr", "OP000081 Shingles 25yr");
        assert!(score >= 60.0 && score < 90.0, "score was {score}");
        assert_eq!(
            m.evaluate("OP000080 Shingles 30yr", "OP000081 Shingles 25yr").kind,
            MatchKind::NoMatch
        );
        assert_eq!(
            m.evaluate("Shingles 30yr", "Shingles 25yr").kind,
            MatchKind::Fuzzy
        );
    }

    #[test]
    fn test_could_match_bounds_evaluate() {
        let m = matcher();
        assert!(m.could_match("Architectural Shingles", "architectual shingle"));
        assert!(m.could_match("Vinyl lap", "Vinyl lap siding, 12 inch reveal, double hung"));
        assert!(!m.could_match("Oak", "Kitchen cabinets, raised panel, soft close"));
        assert!(!m.could_match("", "Standard"));
        assert!(!m.is_match("Oak", "Kitchen cabinets, raised panel, soft close"));
    }

    #[test]
    fn test_coarse_strategy() {
        let config = MatcherConfig {
            strategy: Strategy::Coarse,
            ..MatcherConfig::default()
        };
        let m = FuzzyMatcher::new(config, vec![]);
        assert!(m.is_match("espresso cabinets", "espreso cabinet"));
        assert!(!m.is_match("oak", "maple"));
    }

    #[test]
    fn test_symmetric_outcomes() {
        let m = matcher();
        let pairs = [
            ("Roof Pitch 4/12", "4/12"),
            ("Vinyl lap", "vinyl lap siding"),
            ("Nickel Brushed faucet", "faucet, brushed nickel"),
            ("Architectural Shingles", "architectual shingle"),
            ("OP000080 Shingles", "OP000081 Shingle"),
            ("Oak", "Maple"),
        ];
        for (a, b) in pairs {
            assert_eq!(m.evaluate(a, b), m.evaluate(b, a), "{a} vs {b}");
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(MatcherConfig::default().validate().is_ok());
        let bad = MatcherConfig {
            threshold: 120.0,
            ..MatcherConfig::default()
        };
        assert!(bad.validate().is_err());
        let zero = MatcherConfig {
            ratio_weight: 0.0,
            partial_weight: 0.0,
            token_sort_weight: 0.0,
            ..MatcherConfig::default()
        };
        assert!(zero.validate().is_err());
    }
}
