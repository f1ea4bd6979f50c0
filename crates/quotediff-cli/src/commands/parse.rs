use quotediff_core::error::QuoteDiffError;
use quotediff_core::export::{export_spec_lines, ExportFormat};
use std::path::{Path, PathBuf};

use super::Context;
use crate::output;

pub fn run(
    ctx: &Context,
    input_file: &Path,
    vocab_file: Option<&Path>,
    preset: Option<&str>,
    output_format: &str,
    output_file: Option<PathBuf>,
    show_skipped: bool,
) -> Result<(), QuoteDiffError> {
    let vocab = ctx.vocabulary(vocab_file, preset)?;
    let doc = ctx.load_document(input_file)?;
    let parsed = quotediff_core::parse_document(&doc, &vocab);

    match output_file {
        Some(path) => {
            let format = ExportFormat::from_path(&path)?;
            std::fs::write(&path, export_spec_lines(&parsed.lines, format)?)?;
            eprintln!(
                "Parsed {} line(s), written to {}",
                parsed.lines.len(),
                path.display()
            );
            if !parsed.skipped.is_empty() {
                eprintln!("  {} line(s) skipped during parsing", parsed.skipped.len());
            }
        }
        None => match output_format {
            "json" => output::json::print(&parsed)?,
            _ => print!("{}", output::table::format_parsed(&parsed, show_skipped)),
        },
    }

    Ok(())
}

pub fn variables(
    ctx: &Context,
    input_file: &Path,
    vocab_file: Option<&Path>,
    preset: Option<&str>,
    output_format: &str,
) -> Result<(), QuoteDiffError> {
    let vocab = ctx.vocabulary(vocab_file, preset)?;
    let doc = ctx.load_document(input_file)?;
    let map = quotediff_core::extract_variables(&doc, &vocab);

    match output_format {
        "json" => output::json::print(&map)?,
        _ => print!("{}", output::table::format_variables(&map)),
    }
    Ok(())
}
