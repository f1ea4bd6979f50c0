pub mod engine;
pub mod outcome;

pub use engine::{compare_fields, compare_spec_lines, ComparisonPlan};
pub use outcome::{ComparisonReport, ComparisonSummary, MatchResult, MatchStatus};
