use crate::error::QuoteDiffError;
use crate::llm::json::{request_json, LlmJson};
use crate::llm::{LlmClient, LlmSettings, Message};
use crate::model::ExtractedDocument;
use serde::Serialize;

fn initial_prompt(a: &ExtractedDocument, b: &ExtractedDocument) -> String {
    format!(
        r#"Compare these two sales quotes line by line and answer with a single JSON object.

Include:
1. "line_items": every item from either quote, each with
   "description", "price_1", "price_2", "quantity_1", "quantity_2",
   "spec_1", "spec_2", "in_both" (bool), "price_match" (bool),
   "spec_match" (bool) and "price_difference_pct" (number or null).
   Use "Not Present" for values missing from one quote.
2. "terms": differences in terms and conditions, delivery, warranty,
   payment terms and any special offers or discounts.

Quote 1 ({name_a}):
{text_a}

Quote 2 ({name_b}):
{text_b}
"#,
        name_a = a.name,
        text_a = a.text,
        name_b = b.name,
        text_b = b.text,
    )
}

const TABLE_PROMPT: &str = r#"Using the comparison above, produce a markdown table with the columns:
Item Description | Quote 1 Price | Quote 2 Price | Price Difference % | Match (✓ or ✗) | Notes"#;

const ANALYSIS_PROMPT: &str = r#"Using the comparison above, write a detailed analysis covering:
1. The largest price differences and their impact
2. Specification differences and whether they matter
3. Value for money of each quote
4. Points worth negotiating
5. Technical advantages and disadvantages"#;

const TERMS_PROMPT: &str = r#"Compare the terms and conditions of the two quotes in a structured format:
1. Payment terms
2. Delivery conditions
3. Warranty terms
4. Support and maintenance
5. Legal and compliance requirements"#;

const SUMMARY_PROMPT: &str = r#"Write a short executive summary of the comparison for decision makers:
1. Total cost comparison
2. Key differentiators
3. Best value
4. Recommended choice and why"#;

/// Result of the model-driven quote comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmComparison {
    /// Answer to the initial structured-comparison request.
    pub structured: LlmJson,
    /// Markdown comparison table.
    pub comparison_table: String,
    pub detailed_analysis: String,
    pub terms: String,
    pub executive_summary: String,
}

impl LlmComparison {
    /// Ask for a structured comparison, then for four follow-up views seeded
    /// with that answer.
    pub fn run(
        client: &dyn LlmClient,
        settings: &LlmSettings,
        a: &ExtractedDocument,
        b: &ExtractedDocument,
    ) -> Result<Self, QuoteDiffError> {
        let opening = initial_prompt(a, b);
        let structured = request_json(client, settings, vec![Message::user(opening.clone())])?;
        let seed = structured.to_text();

        let follow_up = |prompt: &str| -> Result<String, QuoteDiffError> {
            let messages = vec![
                Message::user(opening.clone()),
                Message::assistant(seed.clone()),
                Message::user(prompt),
            ];
            client.complete(&settings.request(messages))
        };

        let comparison_table = follow_up(TABLE_PROMPT)?;
        let detailed_analysis = follow_up(ANALYSIS_PROMPT)?;
        let terms = follow_up(TERMS_PROMPT)?;
        let executive_summary = follow_up(SUMMARY_PROMPT)?;

        tracing::info!(
            backend = client.name(),
            parsed = structured.as_value().is_some(),
            "LLM comparison finished"
        );
        Ok(Self {
            structured,
            comparison_table,
            detailed_analysis,
            terms,
            executive_summary,
        })
    }

    /// All sections as one markdown document.
    pub fn to_markdown(&self) -> String {
        let structured = match &self.structured {
            LlmJson::Parsed(_) => format!("```json\n{}\n```", self.structured.to_text()),
            LlmJson::Raw(text) => text.clone(),
        };
        format!(
            "## Line Item Comparison\n\n{}\n\n## Detailed Analysis\n\n{}\n\n\
             ## Terms & Conditions\n\n{}\n\n## Executive Summary\n\n{}\n\n\
             ## Structured Comparison\n\n{}\n",
            self.comparison_table.trim(),
            self.detailed_analysis.trim(),
            self.terms.trim(),
            self.executive_summary.trim(),
            structured,
        )
    }
}
