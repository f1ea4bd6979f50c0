mod commands;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "quotediff",
    version,
    about = "Compare home specification and dealer quote documents"
)]
struct Cli {
    /// JSON config file (defaults to $QUOTEDIFF_CONFIG, then built-in defaults)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log more: -v for info, -vv for debug (RUST_LOG overrides)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct VocabArgs {
    /// Custom JSON vocabulary file
    #[arg(long = "vocab", value_name = "FILE", conflicts_with = "preset")]
    vocab: Option<PathBuf>,

    /// Predefined vocabulary (default: factory)
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text and tables from a document (PDF, DOCX, TXT or XLSX)
    Extract {
        input_file: PathBuf,

        /// Show the text exactly as extracted instead of the cleaned text
        #[arg(long)]
        raw: bool,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Parse a specification document into structured lines
    Parse {
        input_file: PathBuf,

        #[command(flatten)]
        vocab: VocabArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write parsed lines to a file (format from extension: json, csv, xlsx, md)
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// List the lines the parser dropped and why
        #[arg(long)]
        show_skipped: bool,
    },
    /// Extract the "Label: value" variables of a document
    Variables {
        input_file: PathBuf,

        #[command(flatten)]
        vocab: VocabArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Compare two documents field by field
    Compare {
        file_a: PathBuf,
        file_b: PathBuf,

        /// lines: parsed specification lines; variables: label/value maps
        #[arg(long, default_value = "lines")]
        mode: String,

        #[command(flatten)]
        vocab: VocabArgs,

        /// Match threshold (0-100) for the selected strategy
        #[arg(long)]
        threshold: Option<f64>,

        /// Matching strategy: weighted or coarse
        #[arg(long)]
        strategy: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Also write the report to a file (format from extension: csv, xlsx, json, md)
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
    },
    /// Ask the LLM for a narrative comparison of two quotes
    LlmCompare {
        file_a: PathBuf,
        file_b: PathBuf,

        /// Print the full result as JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
    /// Manage and inspect vocabularies
    Vocab {
        #[command(subcommand)]
        action: VocabAction,
    },
}

#[derive(Subcommand)]
enum VocabAction {
    /// List predefined vocabularies
    List,
    /// Explain a vocabulary in plain language
    Explain {
        /// Preset name (e.g., "factory")
        preset: String,
    },
    /// Print the JSON schema with field descriptions and example
    Schema,
    /// Validate a custom vocabulary file
    Validate {
        /// Path to JSON vocabulary file
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = commands::Context::load(cli.config.as_deref()).and_then(|ctx| match cli.command {
        Commands::Extract {
            input_file,
            raw,
            output,
        } => commands::extract::run(&ctx, &input_file, raw, &output),
        Commands::Parse {
            input_file,
            vocab,
            output,
            out,
            show_skipped,
        } => commands::parse::run(
            &ctx,
            &input_file,
            vocab.vocab.as_deref(),
            vocab.preset.as_deref(),
            &output,
            out,
            show_skipped,
        ),
        Commands::Variables {
            input_file,
            vocab,
            output,
        } => commands::parse::variables(
            &ctx,
            &input_file,
            vocab.vocab.as_deref(),
            vocab.preset.as_deref(),
            &output,
        ),
        Commands::Compare {
            file_a,
            file_b,
            mode,
            vocab,
            threshold,
            strategy,
            output,
            export,
        } => commands::compare::run(
            &ctx,
            commands::compare::CompareArgs {
                file_a,
                file_b,
                mode,
                vocab_file: vocab.vocab,
                preset: vocab.preset,
                threshold,
                strategy,
                output,
                export,
            },
        ),
        Commands::LlmCompare {
            file_a,
            file_b,
            json,
        } => commands::llm::run(&ctx, &file_a, &file_b, json),
        Commands::Vocab { action } => match action {
            VocabAction::List => commands::vocab::list(),
            VocabAction::Explain { preset } => commands::vocab::explain(&preset),
            VocabAction::Schema => commands::vocab::schema(),
            VocabAction::Validate { file } => commands::vocab::validate(&file),
        },
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
