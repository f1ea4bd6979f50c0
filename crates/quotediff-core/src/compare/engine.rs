use crate::compare::outcome::{ComparisonReport, MatchResult, MatchStatus};
use crate::matching::normalize::normalize;
use crate::matching::FuzzyMatcher;
use crate::model::{FieldMap, SpecLine};
use crate::vocab::Vocabulary;

/// Which fields to compare and which differently named fields belong together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonPlan {
    /// Canonical names compared in order by the primary pass.
    pub schema: Vec<String>,
    /// `(name in A, name in B)` pairs compared by the alias pass.
    pub aliases: Vec<(String, String)>,
}

impl ComparisonPlan {
    pub fn new(schema: Vec<String>, aliases: Vec<(String, String)>) -> Self {
        Self { schema, aliases }
    }

    /// Plan for two extracted maps: the vocabulary's label names, then any
    /// other name of A, then of B. Names that take part in an alias are left
    /// to the alias pass.
    pub fn for_maps(vocab: &Vocabulary, a: &FieldMap, b: &FieldMap) -> Self {
        let aliases: Vec<(String, String)> = vocab
            .def()
            .aliases
            .iter()
            .map(|al| (al.a.clone(), al.b.clone()))
            .collect();
        let aliased = |name: &str| aliases.iter().any(|(x, y)| x == name || y == name);

        let mut schema: Vec<String> = Vec::new();
        let candidates = vocab
            .label_names()
            .into_iter()
            .chain(a.names().map(String::from))
            .chain(b.names().map(String::from));
        for name in candidates {
            if !aliased(&name) && !schema.contains(&name) {
                schema.push(name);
            }
        }
        Self { schema, aliases }
    }
}

/// Compare two variable maps field by field.
///
/// A field whose value is empty or "Not Found" counts as absent. Fields
/// absent from both maps produce no row.
pub fn compare_fields(
    a: &FieldMap,
    b: &FieldMap,
    plan: &ComparisonPlan,
    matcher: &FuzzyMatcher,
) -> ComparisonReport {
    let mut rows = Vec::new();
    let mut covered: Vec<&str> = Vec::new();

    for name in &plan.schema {
        if covered.contains(&name.as_str()) {
            continue;
        }
        if let Some(row) = compare_pair(name, a.present(name), b.present(name), matcher) {
            covered.push(name);
            rows.push(row);
        }
    }

    for (a_name, b_name) in &plan.aliases {
        if covered.contains(&a_name.as_str()) || covered.contains(&b_name.as_str()) {
            tracing::debug!(a = %a_name, b = %b_name, "alias already covered");
            continue;
        }
        let value_a = a.present(a_name).or_else(|| a.present(b_name));
        let value_b = b.present(b_name).or_else(|| b.present(a_name));
        let item = format!("{a_name} ({b_name})");
        if let Some(row) = compare_pair(&item, value_a, value_b, matcher) {
            covered.push(a_name);
            covered.push(b_name);
            rows.push(row);
        }
    }

    let report = ComparisonReport::from_rows(rows);
    tracing::info!(
        rows = report.summary.total,
        exact = report.summary.exact,
        "compared variable maps"
    );
    report
}

fn compare_pair(
    item: &str,
    value_a: Option<&str>,
    value_b: Option<&str>,
    matcher: &FuzzyMatcher,
) -> Option<MatchResult> {
    match (value_a, value_b) {
        (Some(va), Some(vb)) => Some(MatchResult::scored(item, va, vb, &matcher.evaluate(va, vb))),
        (Some(va), None) => Some(MatchResult::only_in_a(item, va)),
        (None, Some(vb)) => Some(MatchResult::only_in_b(item, vb)),
        (None, None) => None,
    }
}

/// Compare two parsed specifications line by line.
///
/// Lines are paired by option code, then by section and feature, then by the
/// best fuzzy match of feature and description. Rows follow the order of A;
/// lines of B left unpaired are appended in their own order.
pub fn compare_spec_lines(a: &[SpecLine], b: &[SpecLine], matcher: &FuzzyMatcher) -> ComparisonReport {
    let mut pairing: Vec<Option<usize>> = vec![None; a.len()];
    let mut used = vec![false; b.len()];

    // option code
    for (i, line) in a.iter().enumerate() {
        let Some(code) = line.option_code.as_deref() else {
            continue;
        };
        if let Some(j) = (0..b.len()).find(|&j| !used[j] && b[j].option_code.as_deref() == Some(code)) {
            pairing[i] = Some(j);
            used[j] = true;
        }
    }

    // section + feature
    for (i, line) in a.iter().enumerate() {
        if pairing[i].is_some() {
            continue;
        }
        let key = line_key(line);
        if let Some(j) = (0..b.len()).find(|&j| !used[j] && line_key(&b[j]) == key) {
            pairing[i] = Some(j);
            used[j] = true;
        }
    }

    // fuzzy on feature + description
    let b_labels: Vec<String> = b.iter().map(line_label).collect();
    for (i, line) in a.iter().enumerate() {
        if pairing[i].is_some() {
            continue;
        }
        let label = line_label(line);
        let best = (0..b.len())
            .filter(|&j| !used[j] && matcher.could_match(&label, &b_labels[j]))
            .map(|j| (j, matcher.evaluate(&label, &b_labels[j])))
            .filter(|(_, outcome)| outcome.kind.is_match())
            .max_by(|x, y| x.1.score.total_cmp(&y.1.score));
        if let Some((j, outcome)) = best {
            tracing::debug!(a = %label, score = outcome.score, "paired lines by similarity");
            pairing[i] = Some(j);
            used[j] = true;
        }
    }

    let mut rows: Vec<MatchResult> = a
        .iter()
        .zip(&pairing)
        .map(|(line, paired)| match paired {
            Some(j) => compare_lines(line, &b[*j], matcher),
            None => MatchResult::only_in_a(&line.line_item(), &line.comparable_value()),
        })
        .collect();
    rows.extend(
        b.iter()
            .zip(&used)
            .filter(|(_, used)| !**used)
            .map(|(line, _)| MatchResult::only_in_b(&line.line_item(), &line.comparable_value())),
    );

    let report = ComparisonReport::from_rows(rows);
    tracing::info!(
        lines_a = a.len(),
        lines_b = b.len(),
        rows = report.summary.total,
        "compared spec lines"
    );
    report
}

fn compare_lines(a: &SpecLine, b: &SpecLine, matcher: &FuzzyMatcher) -> MatchResult {
    let (value_a, value_b) = (a.comparable_value(), b.comparable_value());
    if value_a.is_empty() && value_b.is_empty() {
        return MatchResult {
            line_item: a.line_item(),
            value_a,
            value_b,
            match_status: MatchStatus::Exact,
            confidence: Some(100.0),
        };
    }
    MatchResult::scored(&a.line_item(), &value_a, &value_b, &matcher.evaluate(&value_a, &value_b))
}

fn line_key(line: &SpecLine) -> (String, String) {
    (normalize(&line.section), normalize(&line.feature))
}

fn line_label(line: &SpecLine) -> String {
    format!("{} {}", line.feature, line.description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::MatcherConfig;
    use crate::vocab::builtin::load_preset;

    fn vocab() -> Vocabulary {
        Vocabulary::compile(load_preset("factory").unwrap()).unwrap()
    }

    fn matcher() -> FuzzyMatcher {
        FuzzyMatcher::for_vocabulary(MatcherConfig::default(), &vocab())
    }

    fn spec(section: &str, feature: &str, code: Option<&str>, description: &str) -> SpecLine {
        SpecLine {
            section: section.into(),
            feature: feature.into(),
            option_code: code.map(String::from),
            description: description.into(),
            ..SpecLine::default()
        }
    }

    #[test]
    fn test_one_sided_not_found() {
        let a: FieldMap = [("Roof Pitch", "Standard")].into_iter().collect();
        let b: FieldMap = [("Roof Pitch", "Not Found")].into_iter().collect();
        let plan = ComparisonPlan::new(vec!["Roof Pitch".into()], vec![]);
        let report = compare_fields(&a, &b, &plan, &matcher());
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].match_status, MatchStatus::OnlyInA);
        assert_eq!(report.rows[0].value_a, "Standard");
        assert_eq!(report.summary.only_in_a, 1);
    }

    #[test]
    fn test_no_overlap_has_no_rate() {
        let a: FieldMap = [("Siding", "Not Found")].into_iter().collect();
        let b = FieldMap::new();
        let plan = ComparisonPlan::for_maps(&vocab(), &a, &b);
        let report = compare_fields(&a, &b, &plan, &matcher());
        assert_eq!(report.summary.total, 0);
        assert_eq!(report.summary.match_rate_display(), "N/A");
    }

    #[test]
    fn test_absent_from_both_emits_no_row() {
        let a: FieldMap = [("Model", "Summit")].into_iter().collect();
        let b: FieldMap = [("Model", "summit")].into_iter().collect();
        let plan = ComparisonPlan::new(vec!["Model".into(), "Wind Zone".into()], vec![]);
        let report = compare_fields(&a, &b, &plan, &matcher());
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].match_status, MatchStatus::Exact);
        assert_eq!(report.summary.match_rate(), Some(100.0));
    }

    #[test]
    fn test_embedded_label_compares_exact() {
        let a: FieldMap = [("Roof Pitch", "Roof Pitch 4/12")].into_iter().collect();
        let b: FieldMap = [("Roof Pitch", "ROOF PITCH 4/12")].into_iter().collect();
        let plan = ComparisonPlan::for_maps(&vocab(), &a, &b);
        let report = compare_fields(&a, &b, &plan, &matcher());
        assert_eq!(report.rows[0].match_status, MatchStatus::Exact);
    }

    #[test]
    fn test_alias_pairs_label_with_option_code() {
        let a: FieldMap = [("Siding Color", "Pebble Clay")].into_iter().collect();
        let b: FieldMap = [("OP000412", "Pebble Clay")].into_iter().collect();
        let plan = ComparisonPlan::for_maps(&vocab(), &a, &b);
        assert!(!plan.schema.iter().any(|n| n == "Siding Color" || n == "OP000412"));

        let report = compare_fields(&a, &b, &plan, &matcher());
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].line_item, "Siding Color (OP000412)");
        assert_eq!(report.rows[0].match_status, MatchStatus::Exact);
    }

    #[test]
    fn test_alias_skipped_when_schema_covers_it() {
        let a: FieldMap = [("Trim Color", "White")].into_iter().collect();
        let b: FieldMap = [("Trim Color", "Almond"), ("OP000413", "White")].into_iter().collect();
        let plan = ComparisonPlan::new(
            vec!["Trim Color".into()],
            vec![("Trim Color".into(), "OP000413".into())],
        );
        let report = compare_fields(&a, &b, &plan, &matcher());
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].line_item, "Trim Color");
        assert_eq!(report.rows[0].match_status, MatchStatus::NoMatch);
    }

    #[test]
    fn test_default_plan_includes_unlisted_names_in_order() {
        let a: FieldMap = [("Delivery", "6 weeks"), ("Model", "Summit")].into_iter().collect();
        let b: FieldMap = [("Warranty", "10 years")].into_iter().collect();
        let plan = ComparisonPlan::for_maps(&vocab(), &a, &b);
        let tail: Vec<&str> = plan.schema.iter().rev().take(2).map(String::as_str).collect();
        assert_eq!(tail, vec!["Warranty", "Delivery"]);
        assert_eq!(plan.schema.iter().filter(|n| *n == "Model").count(), 1);

        let report = compare_fields(&a, &b, &plan, &matcher());
        let statuses: Vec<MatchStatus> = report.rows.iter().map(|r| r.match_status).collect();
        assert_eq!(
            statuses,
            vec![MatchStatus::OnlyInA, MatchStatus::OnlyInA, MatchStatus::OnlyInB]
        );
    }

    #[test]
    fn test_spec_lines_pair_by_code_section_and_similarity() {
        let a = vec![
            spec("Exterior", "ROOF SHINGLES", Some("OP000080"), "Architectural shingles"),
            spec("Kitchen", "FAUCET", None, "Pull-down faucet"),
            spec("Interior", "WALL FINISH", None, "Textured drywall"),
            spec("Exterior", "SHUTTERS", None, "Raised panel"),
        ];
        let b = vec![
            spec("Interior", "WALL FINISHES", None, "Textured drywall"),
            spec("Exterior", "ROOF", Some("OP000080"), "Architectural shingles"),
            spec("kitchen", "Faucet", None, "Single lever faucet"),
            spec("Bath", "MIRROR", None, "Framed mirror"),
        ];
        let report = compare_spec_lines(&a, &b, &matcher());
        let rows = &report.rows;
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].line_item, "ROOF SHINGLES (OP000080)");
        assert_eq!(rows[0].match_status, MatchStatus::Exact);
        assert_eq!(rows[1].value_b, "Single lever faucet");
        assert_eq!(rows[2].value_b, "Textured drywall");
        assert_eq!(rows[2].match_status, MatchStatus::Exact);
        assert_eq!(rows[3].match_status, MatchStatus::OnlyInA);
        assert_eq!(rows[4].line_item, "Bath / MIRROR");
        assert_eq!(rows[4].match_status, MatchStatus::OnlyInB);
    }

    #[test]
    fn test_fuzzy_pairing_among_many_short_lines() {
        let a = vec![spec("Interior", "WALL FINISH", None, "Textured drywall level 4")];
        let mut b: Vec<SpecLine> = (0..200)
            .map(|i| spec("Bath", &format!("TRIM {i}"), None, ""))
            .collect();
        b.push(spec("Interiors", "WALL FINISHES", None, "Textured drywall level 4"));

        let report = compare_spec_lines(&a, &b, &matcher());
        assert_eq!(report.rows.len(), 201);
        assert_eq!(report.rows[0].line_item, "Interior / WALL FINISH");
        assert_eq!(report.rows[0].value_b, "Textured drywall level 4");
        assert_eq!(report.summary.only_in_a, 0);
        assert_eq!(report.summary.only_in_b, 200);
    }

    #[test]
    fn test_spec_lines_empty_inputs() {
        let report = compare_spec_lines(&[], &[], &matcher());
        assert_eq!(report.summary.total, 0);
        assert_eq!(report.summary.match_rate(), None);
    }

    #[test]
    fn test_spec_lines_price_difference_is_partial() {
        let mut a = spec("Kitchen", "COUNTERTOPS", Some("OP000300"), "Laminate countertops");
        let mut b = a.clone();
        a.price = Some("1,200.00".into());
        b.price = Some("1,250.00".into());
        let report = compare_spec_lines(&[a], &[b], &matcher());
        assert_eq!(report.rows[0].match_status, MatchStatus::Partial);
        assert!(report.rows[0].confidence.unwrap_or(0.0) >= 75.0);
    }
}
