use quotediff_core::error::QuoteDiffError;
use quotediff_core::llm::{AnthropicClient, LlmComparison, RetryingClient};
use std::path::Path;

use super::Context;
use crate::output;

pub fn run(ctx: &Context, file_a: &Path, file_b: &Path, json: bool) -> Result<(), QuoteDiffError> {
    let config = &ctx.config;
    let api_key = config.api_key()?;

    let a = ctx.load_document(file_a)?;
    let b = ctx.load_document(file_b)?;

    let mut client = AnthropicClient::new(api_key, config.timeout())?;
    if let Some(url) = &config.base_url {
        client = client.with_base_url(url.clone());
    }
    let client = RetryingClient::new(client, config.retry_attempts, config.retry_base_delay());

    eprintln!("Comparing {} and {} with {}...", a.name, b.name, config.model);
    let result = LlmComparison::run(&client, &config.llm_settings(), &a, &b)?;

    if json {
        output::json::print(&result)?;
    } else {
        println!("{}", result.to_markdown());
    }
    Ok(())
}
