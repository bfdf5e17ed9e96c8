//! # landed
//!
//! Recalculates the landed cost of a customs Policy document.
//!
//! ## Usage
//! ```text
//! landed policy.json                          # recalculate everything, print JSON
//! landed policy.json --script edits.json      # replay an edit script
//! cat policy.json | landed --format summary   # read stdin, print a table
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse arguments (clap)                                              │
//! │  2. Load configuration (defaults → landed.toml → LANDED_* env)          │
//! │  3. Initialize tracing (RUST_LOG, else config log_filter) on stderr     │
//! │  4. Read and validate the Policy document                               │
//! │  5. Apply the edit script, or recalculate everything                    │
//! │  6. Write JSON or the summary to stdout / --output                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod summary;

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use landed_core::PolicyDoc;
use landed_form::{parse_script, PolicyForm, TracingSink};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{CliConfig, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "landed", version, about = "Landed cost recalculation for customs Policy documents")]
struct Cli {
    /// Policy JSON document (default: stdin)
    input: Option<PathBuf>,

    /// JSON edit script to apply instead of a full recalculation
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Config file (default: landed.toml in the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Skip input validation
    #[arg(long)]
    no_validate: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_tracing(&config.log_filter);
    debug!(?config, "configuration loaded");

    let input: Box<dyn Read> = match &cli.input {
        Some(path) => {
            debug!(?path, "reading policy");
            let file =
                File::open(path).with_context(|| format!("Failed to read {}", path.display()))?;
            Box::new(file)
        }
        None => {
            debug!("reading policy from stdin");
            Box::new(io::stdin().lock())
        }
    };

    // Rendered in memory first so a failed run never truncates --output.
    let mut rendered = Vec::new();
    run(&cli, &config, input, &mut rendered)?;

    let mut output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    output.write_all(&rendered)?;
    output.flush().context("Failed to write output")
}

/// Loads the config file and lets command-line flags override it.
fn resolve_config(cli: &Cli) -> Result<CliConfig> {
    let mut config =
        CliConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(format) = cli.format {
        config.format = format;
    }
    if cli.pretty {
        config.pretty = true;
    }
    Ok(config)
}

/// Reads a Policy from `input`, applies the script or a full
/// recalculation, and writes the result to `output`.
fn run(cli: &Cli, config: &CliConfig, input: impl Read, output: impl Write) -> Result<()> {
    let doc = read_policy(input)?;
    let mut form = if cli.no_validate {
        PolicyForm::new(doc, TracingSink)
    } else {
        PolicyForm::load(doc, TracingSink).context("Invalid policy document")?
    };

    match &cli.script {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read script {}", path.display()))?;
            let commands = parse_script(&json)
                .with_context(|| format!("Failed to parse script {}", path.display()))?;
            let applied = form
                .apply_all(commands)
                .with_context(|| format!("Script {} failed", path.display()))?;
            info!(applied, "edit script applied");
        }
        None => {
            let refreshed = form.recalculate_all();
            info!(refreshed = refreshed.len(), "policy recalculated");
        }
    }

    write_output(output, config, form.doc())
}

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_policy(mut input: impl Read) -> Result<PolicyDoc> {
    let mut json = String::new();
    input
        .read_to_string(&mut json)
        .context("Failed to read policy")?;

    serde_json::from_str(&json).context("Failed to parse policy JSON")
}

fn write_output(mut writer: impl Write, config: &CliConfig, doc: &PolicyDoc) -> Result<()> {
    match config.format {
        OutputFormat::Json if config.pretty => serde_json::to_writer_pretty(&mut writer, doc)?,
        OutputFormat::Json => serde_json::to_writer(&mut writer, doc)?,
        OutputFormat::Summary => summary::write_summary(&mut writer, doc, config.precision)?,
    }
    if config.format == OutputFormat::Json {
        writeln!(writer)?;
    }

    writer.flush().context("Failed to write output")
}
