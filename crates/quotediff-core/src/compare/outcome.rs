use crate::matching::{MatchKind, MatchOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Exact,
    Partial,
    OnlyInA,
    OnlyInB,
    NoMatch,
}

impl MatchStatus {
    /// Status for a row where both sides have a value.
    pub fn from_outcome(outcome: &MatchOutcome) -> MatchStatus {
        match outcome.kind {
            MatchKind::Exact => MatchStatus::Exact,
            MatchKind::Substring | MatchKind::Fuzzy => MatchStatus::Partial,
            MatchKind::NoMatch | MatchKind::Missing => MatchStatus::NoMatch,
        }
    }

    /// Short marker used in tables.
    pub fn symbol(&self) -> &'static str {
        match self {
            MatchStatus::Exact => "✓",
            MatchStatus::Partial => "~",
            MatchStatus::OnlyInA => "A",
            MatchStatus::OnlyInB => "B",
            MatchStatus::NoMatch => "✗",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Exact => write!(f, "Exact"),
            MatchStatus::Partial => write!(f, "Partial"),
            MatchStatus::OnlyInA => write!(f, "Only in A"),
            MatchStatus::OnlyInB => write!(f, "Only in B"),
            MatchStatus::NoMatch => write!(f, "No match"),
        }
    }
}

/// One compared field or line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Canonical field name or line key.
    pub line_item: String,
    pub value_a: String,
    pub value_b: String,
    pub match_status: MatchStatus,
    /// Fuzzy score (0-100) when both sides were scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl MatchResult {
    pub fn only_in_a(line_item: &str, value_a: &str) -> Self {
        Self {
            line_item: line_item.to_string(),
            value_a: value_a.to_string(),
            value_b: String::new(),
            match_status: MatchStatus::OnlyInA,
            confidence: None,
        }
    }

    pub fn only_in_b(line_item: &str, value_b: &str) -> Self {
        Self {
            line_item: line_item.to_string(),
            value_a: String::new(),
            value_b: value_b.to_string(),
            match_status: MatchStatus::OnlyInB,
            confidence: None,
        }
    }

    pub fn scored(line_item: &str, value_a: &str, value_b: &str, outcome: &MatchOutcome) -> Self {
        Self {
            line_item: line_item.to_string(),
            value_a: value_a.to_string(),
            value_b: value_b.to_string(),
            match_status: MatchStatus::from_outcome(outcome),
            confidence: Some(outcome.score),
        }
    }
}

/// Row counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub total: usize,
    pub exact: usize,
    pub partial: usize,
    pub only_in_a: usize,
    pub only_in_b: usize,
    pub no_match: usize,
}

impl ComparisonSummary {
    pub fn from_rows(rows: &[MatchResult]) -> Self {
        let mut s = ComparisonSummary {
            total: rows.len(),
            ..ComparisonSummary::default()
        };
        for row in rows {
            match row.match_status {
                MatchStatus::Exact => s.exact += 1,
                MatchStatus::Partial => s.partial += 1,
                MatchStatus::OnlyInA => s.only_in_a += 1,
                MatchStatus::OnlyInB => s.only_in_b += 1,
                MatchStatus::NoMatch => s.no_match += 1,
            }
        }
        s
    }

    /// Percentage of rows that matched exactly, or None when there are no rows.
    pub fn match_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.exact as f64 * 100.0 / self.total as f64)
        }
    }

    /// Match rate for display: "83.3%" or "N/A".
    pub fn match_rate_display(&self) -> String {
        match self.match_rate() {
            Some(rate) => format!("{rate:.1}%"),
            None => "N/A".to_string(),
        }
    }
}

/// Full comparison of two documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_a: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_b: Option<String>,
    pub rows: Vec<MatchResult>,
    pub summary: ComparisonSummary,
}

impl ComparisonReport {
    pub fn from_rows(rows: Vec<MatchResult>) -> Self {
        let summary = ComparisonSummary::from_rows(&rows);
        Self {
            name_a: None,
            name_b: None,
            rows,
            summary,
        }
    }

    pub fn with_names(mut self, name_a: &str, name_b: &str) -> Self {
        self.name_a = Some(name_a.to_string());
        self.name_b = Some(name_b.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary_has_no_rate() {
        let report = ComparisonReport::from_rows(vec![]);
        assert_eq!(report.summary.total, 0);
        assert_eq!(report.summary.match_rate(), None);
        assert_eq!(report.summary.match_rate_display(), "N/A");
    }

    #[test]
    fn test_summary_counts() {
        let exact = MatchOutcome {
            kind: MatchKind::Exact,
            score: 100.0,
        };
        let fuzzy = MatchOutcome {
            kind: MatchKind::Fuzzy,
            score: 80.0,
        };
        let rows = vec![
            MatchResult::scored("Roof Pitch", "4/12", "4/12", &exact),
            MatchResult::scored("Siding", "Vinyl lap", "Vinyl lap siding", &fuzzy),
            MatchResult::only_in_a("Shutters", "Black"),
            MatchResult::only_in_b("Skylight", "2 EA"),
        ];
        let s = ComparisonSummary::from_rows(&rows);
        assert_eq!(s.total, 4);
        assert_eq!(s.exact, 1);
        assert_eq!(s.partial, 1);
        assert_eq!(s.only_in_a, 1);
        assert_eq!(s.only_in_b, 1);
        assert_eq!(s.no_match, 0);
        assert_eq!(s.match_rate(), Some(25.0));
        assert_eq!(s.match_rate_display(), "25.0%");
    }

    #[test]
    fn test_missing_outcome_maps_to_no_match() {
        let outcome = MatchOutcome {
            kind: MatchKind::Missing,
            score: 0.0,
        };
        assert_eq!(MatchStatus::from_outcome(&outcome), MatchStatus::NoMatch);
    }
}
