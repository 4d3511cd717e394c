//! CLI binary for complibot.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AuditConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use complibot::{audit_to_file, inspect, AuditConfig, Framework};
use std::io::{self, Write};
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

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generic Scope 1 & 2 audit (stdout)
  complibot report_excerpt.pdf

  # CSRD / ESRS E1 audit, saved to the conventional artifact name
  complibot --framework csrd report_excerpt.pdf -o

  # GRI 305 audit against a self-hosted OpenAI-compatible endpoint
  complibot --framework gri305 --base-url http://localhost:8080 report.pdf

  # Inspect extraction only (no API key needed)
  complibot --inspect-only report.pdf

  # Structured JSON output with stats
  complibot --framework sasb --json report.pdf > audit.json

FRAMEWORKS:
  generic   Scope 1 & 2 against any standard               (default)
  csrd      EU CSRD — ESRS E1, market-based Scope 2
  gri305    GRI 305-1 (Direct) and 305-2 (Energy Indirect)
  sasb      SASB industry accounting metrics

ENVIRONMENT VARIABLES:
  PERPLEXITY_API_KEY      Completion service credential
  COMPLIBOT_MODEL         Override model ID (default: sonar-pro)
  COMPLIBOT_BASE_URL      Override endpoint (default: https://api.perplexity.ai)
  COMPLIBOT_MAX_PAGES     Override the extraction page cap (default: 2)

SETUP:
  1. Set API key:     export PERPLEXITY_API_KEY=pplx-...
  2. Audit:           complibot --framework csrd report_excerpt.pdf -o
"#;

/// Audit a sustainability report excerpt for GHG disclosure compliance.
#[derive(Parser, Debug)]
#[command(
    name = "complibot",
    version,
    about = "Audit report excerpts for Scope 1/2 disclosure compliance using LLMs",
    long_about = "Extract GHG Scope 1/2 emissions data from a PDF report excerpt and audit it \
against a reporting framework (Generic, CSRD, GRI 305, SASB), producing a markdown \
compliance table via an OpenAI-compatible completion service.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF report excerpt to audit.
    input: PathBuf,

    /// Write the markdown report to a file instead of stdout.
    /// `-o` without a value uses the conventional name `audit_report.md`.
    #[arg(
        short,
        long,
        env = "COMPLIBOT_OUTPUT",
        num_args = 0..=1,
        default_missing_value = "audit_report.md"
    )]
    output: Option<PathBuf>,

    /// Reporting framework to audit against.
    #[arg(short, long, env = "COMPLIBOT_FRAMEWORK", value_enum, default_value = "generic")]
    framework: FrameworkArg,

    /// Completion service credential.
    #[arg(long, env = "PERPLEXITY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Completion model ID.
    #[arg(long, env = "COMPLIBOT_MODEL", default_value = complibot::DEFAULT_MODEL)]
    model: String,

    /// OpenAI-compatible completion endpoint.
    #[arg(long, env = "COMPLIBOT_BASE_URL", default_value = complibot::DEFAULT_BASE_URL)]
    base_url: String,

    /// Maximum pages to extract from the document.
    #[arg(long, env = "COMPLIBOT_MAX_PAGES", default_value_t = complibot::DEFAULT_PAGE_CAP,
          value_parser = clap::value_parser!(usize))]
    max_pages: usize,

    /// Max completion tokens.
    #[arg(long, env = "COMPLIBOT_MAX_TOKENS", default_value_t = 1024)]
    max_tokens: usize,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "COMPLIBOT_TEMPERATURE", default_value_t = 0.1)]
    temperature: f32,

    /// Completion call timeout in seconds.
    #[arg(long, env = "COMPLIBOT_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Skip the warn-only check of the returned table header.
    #[arg(long, env = "COMPLIBOT_NO_VALIDATE")]
    no_validate: bool,

    /// Output structured JSON (AuditOutput) instead of markdown.
    #[arg(long, env = "COMPLIBOT_JSON")]
    json: bool,

    /// Report extraction stats only; no credential or network call.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "COMPLIBOT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "COMPLIBOT_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FrameworkArg {
    Generic,
    Csrd,
    Gri305,
    Sasb,
}

impl From<FrameworkArg> for Framework {
    fn from(v: FrameworkArg) -> Self {
        match v {
            FrameworkArg::Generic => Framework::Generic,
            FrameworkArg::Csrd => Framework::Csrd,
            FrameworkArg::Gri305 => Framework::Gri305,
            FrameworkArg::Sasb => Framework::Sasb,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
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

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let info = inspect(&cli.input, cli.max_pages)
            .await
            .context("Failed to inspect report")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info).context("Failed to serialise info")?
            );
        } else {
            println!("File:            {}", cli.input.display());
            println!("Pages:           {}", info.page_count);
            println!("Pages decoded:   {}", info.pages_used);
            println!("Characters:      {}", info.extracted_chars);
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let framework: Framework = cli.framework.into();
    let mut builder = AuditConfig::builder()
        .framework(framework)
        .max_pages(cli.max_pages)
        .model(cli.model.as_str())
        .base_url(cli.base_url.as_str())
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .api_timeout_secs(cli.api_timeout)
        .validate_columns(!cli.no_validate);
    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.as_str());
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run audit ────────────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let output = audit_to_file(&cli.input, output_path, &config)
            .await
            .context("Audit failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} audit  {}ms  →  {}",
                green("✔"),
                bold(framework.profile().display_name),
                output.stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
            eprintln!(
                "   {} chars from {}/{} pages  /  {} tokens in, {} tokens out",
                dim(&output.stats.extracted_chars.to_string()),
                output.stats.pages_used,
                output.stats.page_count,
                dim(&output.stats.prompt_tokens.to_string()),
                dim(&output.stats.completion_tokens.to_string()),
            );
        }
    } else {
        let output = complibot::audit(&cli.input, &config)
            .await
            .context("Audit failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(output.markdown.as_bytes())
                .context("Failed to write to stdout")?;
            if !output.markdown.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }

        if !cli.quiet && !cli.json {
            eprintln!(
                "   {} chars from {}/{} pages  —  {}ms total",
                dim(&output.stats.extracted_chars.to_string()),
                output.stats.pages_used,
                output.stats.page_count,
                output.stats.total_duration_ms,
            );
        }
    }

    Ok(())
}
