//! CLI binary for sitegrade.
//!
//! A thin shim over the library crate that maps CLI flags to `AuditConfig`,
//! runs the audit, and prints the grade summary.

use anyhow::{Context, Result};
use clap::Parser;
use sitegrade::{audit_to_file, AuditConfig, Grade, DEFAULT_API_BASE, DEFAULT_MODEL};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

fn coloured_grade(grade: Grade) -> String {
    let letter = grade.letter();
    match grade {
        Grade::A => green(letter),
        Grade::B | Grade::C => yellow(letter),
        Grade::D | Grade::F => red(letter),
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic audit
  sitegrade https://example.com

  # Choose the output file and a logo for the report header
  sitegrade https://example.com -o acme-audit.pdf --logo acme.png

  # Use a specific model and a larger text budget
  sitegrade --model gpt-4o --max-chars 20000 https://example.com

  # Also print the structured report as JSON
  sitegrade --json https://example.com

RUBRIC:
  Four fixed categories, each graded A–F with a rationale and quick wins:
  Brand, Content, Website, Marketing.

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY       API key (required; also read from a .env file)
  OPENAI_BASE_URL      Override the chat-completions endpoint base
  SITEGRADE_MODEL      Override the model ID

SETUP:
  1. Set API key:   export OPENAI_API_KEY=sk-...
  2. Audit:         sitegrade https://example.com -o audit.pdf
"#;

/// Grade a website against a marketing rubric and write a PDF report.
#[derive(Parser, Debug)]
#[command(
    name = "sitegrade",
    version,
    about = "Grade a website against a marketing rubric and write a PDF report",
    long_about = "Fetch a company's public website, grade its visible text against a fixed \
four-category marketing rubric (Brand, Content, Website, Marketing) using a language model, \
and render the grades, rationale, and quick wins into a PDF report.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Website URL to audit (http:// or https://).
    url: String,

    /// Output PDF path.
    #[arg(short, long, env = "SITEGRADE_OUTPUT", default_value = "audit.pdf")]
    output: PathBuf,

    /// Maximum characters of extracted page text sent to the model.
    #[arg(long, env = "SITEGRADE_MAX_CHARS", default_value_t = 12_000)]
    max_chars: usize,

    /// Model ID (e.g. gpt-4o-mini, gpt-4o).
    #[arg(long, env = "SITEGRADE_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Logo image placed in the report header (PNG or JPEG).
    #[arg(long, env = "SITEGRADE_LOGO")]
    logo: Option<PathBuf>,

    /// Max model output tokens.
    #[arg(long, env = "SITEGRADE_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "SITEGRADE_TEMPERATURE", default_value_t = 0.4)]
    temperature: f32,

    /// Website fetch timeout in seconds.
    #[arg(long, env = "SITEGRADE_FETCH_TIMEOUT", default_value_t = 30)]
    fetch_timeout: u64,

    /// Model call timeout in seconds.
    #[arg(long, env = "SITEGRADE_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Chat-completions endpoint base (proxies, compatible servers).
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "SITEGRADE_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Also print the structured report as JSON on stdout.
    #[arg(long, env = "SITEGRADE_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SITEGRADE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SITEGRADE_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first, so OPENAI_API_KEY etc. are visible to clap's env defaults
    // already resolved below and to the library.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli).await?;

    // ── Run the audit ────────────────────────────────────────────────────
    let report = audit_to_file(&cli.url, &cli.output, &config)
        .await
        .context("Audit failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    }

    // ── Summary ──────────────────────────────────────────────────────────
    if !cli.quiet {
        eprintln!(
            "{} Audit of {} complete",
            green("✔"),
            bold(&report.url)
        );
        for result in &report.results {
            eprintln!(
                "   {:<10} {}   {}",
                result.category,
                coloured_grade(result.grade),
                dim(&format!("{} quick wins", result.quick_wins.len())),
            );
        }
        eprintln!(
            "   {} tokens in / {} out  —  {}ms total  →  {}",
            dim(&report.stats.prompt_tokens.to_string()),
            dim(&report.stats.completion_tokens.to_string()),
            report.stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `AuditConfig`.
async fn build_config(cli: &Cli) -> Result<AuditConfig> {
    let mut builder = AuditConfig::builder()
        .max_chars(cli.max_chars)
        .model(cli.model.clone())
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .fetch_timeout_secs(cli.fetch_timeout)
        .api_timeout_secs(cli.api_timeout)
        .api_base(cli.api_base.clone());

    if let Some(ref logo) = cli.logo {
        builder = builder.logo(logo.clone());
    }

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {path:?}"))?;
        builder = builder.system_prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}
