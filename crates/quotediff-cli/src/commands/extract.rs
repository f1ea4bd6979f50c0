use quotediff_core::error::QuoteDiffError;
use std::path::Path;

use super::Context;
use crate::output;

pub fn run(ctx: &Context, input_file: &Path, raw: bool, output_format: &str) -> Result<(), QuoteDiffError> {
    let doc = ctx.load_document(input_file)?;

    match output_format {
        "json" => output::json::print(&doc)?,
        _ => print!("{}", output::table::format_extracted(&doc, raw)),
    }
    Ok(())
}
