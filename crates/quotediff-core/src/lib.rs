pub mod compare;
pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod llm;
pub mod matching;
pub mod model;
pub mod parsing;
pub mod vocab;

use compare::{ComparisonPlan, ComparisonReport};
use matching::{FuzzyMatcher, MatcherConfig};
use model::{ExtractedDocument, FieldMap};
use parsing::variables::VariableExtractor;
use parsing::{ParsedSpec, SpecParser};
use vocab::Vocabulary;

/// Parse an extracted document into specification lines.
pub fn parse_document(doc: &ExtractedDocument, vocab: &Vocabulary) -> ParsedSpec {
    let parsed = SpecParser::new(vocab).parse(&doc.text);
    tracing::info!(
        document = %doc.name,
        lines = parsed.lines.len(),
        skipped = parsed.skipped.len(),
        "parsed document"
    );
    parsed
}

/// Pull the variable map out of an extracted document.
pub fn extract_variables(doc: &ExtractedDocument, vocab: &Vocabulary) -> FieldMap {
    VariableExtractor::new(vocab).extract(&doc.text)
}

/// Main API entry point for structured quotes: parse both documents and
/// compare them line by line.
pub fn compare_spec_documents(
    a: &ExtractedDocument,
    b: &ExtractedDocument,
    vocab: &Vocabulary,
    config: &MatcherConfig,
) -> ComparisonReport {
    let matcher = FuzzyMatcher::for_vocabulary(config.clone(), vocab);
    let lines_a = parse_document(a, vocab).lines;
    let lines_b = parse_document(b, vocab).lines;
    compare::compare_spec_lines(&lines_a, &lines_b, &matcher).with_names(&a.name, &b.name)
}

/// Compare the variable maps of two "Label: value" style documents.
pub fn compare_variable_documents(
    a: &ExtractedDocument,
    b: &ExtractedDocument,
    vocab: &Vocabulary,
    config: &MatcherConfig,
) -> ComparisonReport {
    let matcher = FuzzyMatcher::for_vocabulary(config.clone(), vocab);
    let map_a = extract_variables(a, vocab);
    let map_b = extract_variables(b, vocab);
    let plan = ComparisonPlan::for_maps(vocab, &map_a, &map_b);
    compare::compare_fields(&map_a, &map_b, &plan, &matcher).with_names(&a.name, &b.name)
}
