use quotediff_core::error::QuoteDiffError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), QuoteDiffError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
