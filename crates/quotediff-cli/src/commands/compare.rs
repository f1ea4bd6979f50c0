use quotediff_core::error::QuoteDiffError;
use quotediff_core::export::{export_report, ExportFormat};
use quotediff_core::matching::{MatcherConfig, Strategy};
use std::path::PathBuf;

use super::Context;
use crate::output;

pub struct CompareArgs {
    pub file_a: PathBuf,
    pub file_b: PathBuf,
    pub mode: String,
    pub vocab_file: Option<PathBuf>,
    pub preset: Option<String>,
    pub threshold: Option<f64>,
    pub strategy: Option<String>,
    pub output: String,
    pub export: Option<PathBuf>,
}

pub fn run(ctx: &Context, args: CompareArgs) -> Result<(), QuoteDiffError> {
    let matcher = matcher_config(&ctx.config.matcher, args.strategy.as_deref(), args.threshold)?;
    // Fail on a bad export path before doing any work.
    let export_format = args
        .export
        .as_deref()
        .map(ExportFormat::from_path)
        .transpose()?;

    let vocab = ctx.vocabulary(args.vocab_file.as_deref(), args.preset.as_deref())?;
    let a = ctx.load_document(&args.file_a)?;
    let b = ctx.load_document(&args.file_b)?;

    let report = match args.mode.as_str() {
        "lines" => quotediff_core::compare_spec_documents(&a, &b, &vocab, &matcher),
        "variables" => quotediff_core::compare_variable_documents(&a, &b, &vocab, &matcher),
        other => {
            return Err(QuoteDiffError::Config(format!(
                "unknown comparison mode '{other}'. Use 'lines' or 'variables'"
            )))
        }
    };

    match args.output.as_str() {
        "json" => output::json::print(&report)?,
        _ => print!("{}", output::table::format_report(&report)),
    }

    if let (Some(path), Some(format)) = (args.export, export_format) {
        std::fs::write(&path, export_report(&report, format)?)?;
        eprintln!("Report written to {}", path.display());
    }

    Ok(())
}

/// Apply `--strategy` and `--threshold` on top of the configured matcher.
fn matcher_config(
    base: &MatcherConfig,
    strategy: Option<&str>,
    threshold: Option<f64>,
) -> Result<MatcherConfig, QuoteDiffError> {
    let mut config = base.clone();
    if let Some(name) = strategy {
        config.strategy = match name {
            "weighted" => Strategy::Weighted,
            "coarse" => Strategy::Coarse,
            other => {
                return Err(QuoteDiffError::Config(format!(
                    "unknown strategy '{other}'. Use 'weighted' or 'coarse'"
                )))
            }
        };
    }
    if let Some(t) = threshold {
        match config.strategy {
            Strategy::Weighted => config.threshold = t,
            Strategy::Coarse => config.coarse_threshold = t,
        }
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_follows_strategy() {
        let base = MatcherConfig::default();
        let weighted = matcher_config(&base, None, Some(80.0)).unwrap();
        assert_eq!(weighted.threshold, 80.0);

        let coarse = matcher_config(&base, Some("coarse"), Some(60.0)).unwrap();
        assert_eq!(coarse.strategy, Strategy::Coarse);
        assert_eq!(coarse.coarse_threshold, 60.0);
        assert_eq!(coarse.threshold, 75.0);
    }

    #[test]
    fn test_bad_overrides_rejected() {
        let base = MatcherConfig::default();
        assert!(matcher_config(&base, Some("exact"), None).is_err());
        assert!(matcher_config(&base, None, Some(120.0)).is_err());
    }
}
