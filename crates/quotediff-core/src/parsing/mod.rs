pub mod price;
pub mod rules;
pub mod variables;

use crate::model::SpecLine;
use crate::vocab::Vocabulary;
use rules::{default_rules, feature_end, ExtractionRule};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between a record's description and its continuation lines.
pub const CONTINUATION_SEPARATOR: &str = " | ";

/// Why the parser dropped a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Boilerplate,
    NoFeature,
    OrphanContinuation,
    /// A record with a feature but neither option code nor description.
    Noise,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Boilerplate => write!(f, "boilerplate"),
            SkipReason::NoFeature => write!(f, "no leading feature"),
            SkipReason::OrphanContinuation => write!(f, "continuation without a record"),
            SkipReason::Noise => write!(f, "no option code or description"),
        }
    }
}

/// A line that produced no record, kept for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedLine {
    /// 1-based line number in the parsed text.
    pub line_number: usize,
    pub line_text: String,
    pub reason: SkipReason,
}

/// Parser output: emitted records plus the lines that were dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedSpec {
    pub lines: Vec<SpecLine>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedLine>,
}

/// Line-oriented parser turning specification text into [`SpecLine`]s.
pub struct SpecParser<'v> {
    vocab: &'v Vocabulary,
    rules: Vec<ExtractionRule>,
}

impl<'v> SpecParser<'v> {
    pub fn new(vocab: &'v Vocabulary) -> Self {
        Self {
            vocab,
            rules: default_rules(vocab),
        }
    }

    /// Parse a whole document.
    pub fn parse(&self, text: &str) -> ParsedSpec {
        let ctx = text
            .lines()
            .enumerate()
            .fold(ParserContext::new(self.vocab), |mut ctx, (i, line)| {
                self.feed(&mut ctx, i + 1, line);
                ctx
            });
        let parsed = ctx.finish();
        tracing::info!(
            records = parsed.lines.len(),
            skipped = parsed.skipped.len(),
            "parsed specification lines"
        );
        parsed
    }

    fn feed(&self, ctx: &mut ParserContext, line_number: usize, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        if self.vocab.is_boilerplate(line) {
            ctx.skip(line_number, line, SkipReason::Boilerplate);
            return;
        }

        if self.vocab.is_section_header(line) {
            ctx.flush();
            ctx.section = line.to_string();
            tracing::debug!(section = line, "entered section");
            return;
        }

        if let Some(rest) = self.vocab.continuation_remainder(line) {
            match ctx.pending.as_mut() {
                Some(pending) => pending.continuations.push(rest.to_string()),
                None => ctx.skip(line_number, line, SkipReason::OrphanContinuation),
            }
            return;
        }

        let Some(end) = feature_end(line) else {
            ctx.skip(line_number, line, SkipReason::NoFeature);
            return;
        };

        ctx.flush();
        let record = self.parse_record(&ctx.section, &line[..end], &line[end..]);
        ctx.pending = Some(PendingLine {
            record,
            continuations: Vec::new(),
            line_number,
            line_text: line.to_string(),
        });
    }

    /// Apply the rule chain to what follows the feature.
    fn parse_record(&self, section: &str, feature: &str, rest: &str) -> SpecLine {
        let mut line = SpecLine {
            section: section.to_string(),
            feature: feature.trim().to_string(),
            ..SpecLine::default()
        };
        let mut remaining = format!(" {rest} ");
        for rule in &self.rules {
            if rule.apply(&mut remaining, &mut line) {
                tracing::debug!(field = ?rule.field, feature, "field extracted");
            }
        }
        line.description = clean_description(&remaining);
        line
    }
}

/// Parse specification text with a one-off parser.
pub fn parse_spec_lines(text: &str, vocab: &Vocabulary) -> Vec<SpecLine> {
    SpecParser::new(vocab).parse(text).lines
}

/// Collapse whitespace and trim non-alphanumeric characters from both ends.
pub fn clean_description(s: &str) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

struct PendingLine {
    record: SpecLine,
    continuations: Vec<String>,
    line_number: usize,
    line_text: String,
}

/// State threaded through the line fold.
struct ParserContext {
    section: String,
    pending: Option<PendingLine>,
    out: ParsedSpec,
}

impl ParserContext {
    fn new(vocab: &Vocabulary) -> Self {
        Self {
            section: vocab.default_section().to_string(),
            pending: None,
            out: ParsedSpec::default(),
        }
    }

    fn skip(&mut self, line_number: usize, line: &str, reason: SkipReason) {
        tracing::debug!(line_number, %reason, line, "skipped line");
        self.out.skipped.push(SkippedLine {
            line_number,
            line_text: line.to_string(),
            reason,
        });
    }

    /// Finalize the open record, joining its continuation lines.
    fn flush(&mut self) {
        let Some(PendingLine {
            mut record,
            continuations,
            line_number,
            line_text,
        }) = self.pending.take()
        else {
            return;
        };

        let parts: Vec<String> = std::iter::once(record.description.clone())
            .chain(continuations.iter().map(|c| clean_description(c)))
            .filter(|p| !p.is_empty())
            .collect();
        record.description = parts.join(CONTINUATION_SEPARATOR);

        if record.is_meaningful() {
            self.out.lines.push(record);
        } else {
            self.skip(line_number, &line_text, SkipReason::Noise);
        }
    }

    fn finish(mut self) -> ParsedSpec {
        self.flush();
        self.out
    }
}
