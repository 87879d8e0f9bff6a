//! CLI binary for pdf2report.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ReportConfig` and prints run status.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2report::{summarize_to_files, ReportConfig, ReportError};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarize a local PDF into reports/{stem}.json and reports/{stem}.md
  pdf2report paper.pdf

  # JSON only, custom output directory
  pdf2report paper.pdf --out summaries --no-markdown

  # Smaller chunks for dense documents
  pdf2report paper.pdf --target-tokens 800

  # Summarize straight from a URL
  pdf2report https://arxiv.org/pdf/1706.03762 --out reports

  # Use a specific model and prompt
  pdf2report --model gpt-4o --system-prompt prompts/legal.md contract.pdf

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY    API key (required)
  OPENAI_MODEL      Completion model (default: gpt-4o-mini)
  OPENAI_BASE_URL   Chat-completions API base (default: https://api.openai.com/v1)
  MAX_TOKENS        Max completion tokens (default: 3000)
  TEMPERATURE       Sampling temperature (default: 0.1)

  A .env file in the working directory is loaded automatically.

OUTPUT:
  {stem}.json       Canonical report (pretty-printed JSON)
  {stem}.md         Human-readable Markdown rendering (unless --no-markdown)
"#;

/// Summarize PDF files and URLs into structured JSON and Markdown reports.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2report",
    version,
    about = "Summarize PDF files and URLs into structured JSON and Markdown reports",
    long_about = "Extract text from a PDF page by page, pack pages into token-budgeted chunks, \
and summarize them with an LLM into a structured report: title, key findings, methodology, \
limitations, quotes, entities, and topics.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Output directory for the report files.
    #[arg(short, long, default_value = "reports")]
    out: PathBuf,

    /// Skip the Markdown report (the JSON file is always written).
    #[arg(long)]
    no_markdown: bool,

    /// Chunk size target in tokens.
    #[arg(long, default_value_t = 1400,
          value_parser = clap::value_parser!(u32).range(1..))]
    target_tokens: u32,

    /// Completion model ID (overrides OPENAI_MODEL).
    #[arg(long)]
    model: Option<String>,

    /// Max completion tokens (overrides MAX_TOKENS).
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Sampling temperature, 0.0–2.0 (overrides TEMPERATURE).
    #[arg(long)]
    temperature: Option<f32>,

    /// Path to the system-instruction file.
    #[arg(long, default_value = "prompts/system.md")]
    system_prompt: PathBuf,

    /// HTTP download timeout in seconds (URL inputs).
    #[arg(long, default_value_t = 120)]
    download_timeout: u64,

    /// Completion call timeout in seconds.
    #[arg(long, default_value_t = 60)]
    api_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so OPENAI_API_KEY etc. are visible to from_env().
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli).await?;

    // ── Run ──────────────────────────────────────────────────────────────
    if !cli.quiet {
        eprintln!("{} {}", cyan("◆"), bold(&format!("Reading {}", cli.input)));
    }

    let (json_path, stats) = summarize_to_files(&cli.input, &cli.out, !cli.no_markdown, &config)
        .await
        .context("Summarization failed")?;

    if !cli.quiet {
        eprintln!(
            "{} {} pages packed into {} chunks",
            green("✔"),
            stats.page_count,
            stats.chunk_count,
        );
        eprintln!(
            "{} Wrote {}{}",
            green("✔"),
            bold(&json_path.display().to_string()),
            if cli.no_markdown {
                String::new()
            } else {
                dim(&format!(" (+ {})", json_path.with_extension("md").display()))
            },
        );
    }

    Ok(())
}

/// Map CLI args and environment to `ReportConfig`.
async fn build_config(cli: &Cli) -> Result<ReportConfig> {
    let mut config = ReportConfig::from_env()?;

    if let Some(ref model) = cli.model {
        config.model = model.clone();
    }
    if let Some(max_tokens) = cli.max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(temperature) = cli.temperature {
        config.temperature = temperature.clamp(0.0, 2.0);
    }
    config.target_tokens = cli.target_tokens as usize;
    config.download_timeout_secs = cli.download_timeout;
    config.api_timeout_secs = cli.api_timeout;

    config.system_prompt = tokio::fs::read_to_string(&cli.system_prompt)
        .await
        .map_err(|_| ReportError::SystemPromptMissing {
            path: cli.system_prompt.clone(),
        })?;

    Ok(config)
}
