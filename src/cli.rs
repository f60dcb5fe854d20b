///
/// This module implements the CLI interface for metal-json: command parsing,
/// reading pasted tables, writing documents and invoking uploads.
///
/// All conversion and publishing logic lives in the [`metal-json-core`] crate.
/// This module is strictly CLI glue.
///
/// ## How To Use
/// - `metal-json convert --mode gold --input prices.txt` writes `gold_prices.json`.
/// - `metal-json publish --mode silver --repo owner/name` converts stdin and uploads it.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`metal-json-core`]: ../../metal-json-core/
use crate::load_config::{env_only, load_config, CliConfig, TOKEN_ENV};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use metal_json_core::filename::{dated_filename, default_remote_path, download_filename};
use metal_json_core::github::{GitHubClient, DEFAULT_API_BASE};
use metal_json_core::publish::{PublishError, PublishOutcome};
use metal_json_core::session::{Session, SessionError};
use metal_json_core::{Conversion, ConvertError, Mode};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI for metal-json: convert pasted price tables to JSON and publish them.
#[derive(Parser)]
#[clap(
    name = "metal-json",
    version,
    about = "Convert pasted gold/silver price tables to JSON and upload them to a GitHub repository"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a pasted price table into a JSON document
    Convert {
        /// Table kind: gold or silver
        #[clap(long)]
        mode: Mode,
        /// File holding the pasted text (stdin when omitted)
        #[clap(long)]
        input: Option<PathBuf>,
        /// Where to write the JSON (defaults to `{mode}_prices.json`)
        #[clap(long, conflicts_with = "stdout")]
        output: Option<PathBuf>,
        /// Print the JSON to stdout instead of writing a file
        #[clap(long)]
        stdout: bool,
    },
    /// Convert a pasted price table and upload it to a repository
    Publish {
        /// Table kind: gold or silver
        #[clap(long)]
        mode: Mode,
        /// File holding the pasted text (stdin when omitted)
        #[clap(long)]
        input: Option<PathBuf>,
        /// Repository as owner/name
        #[clap(long)]
        repo: Option<String>,
        /// File path inside the repository (defaults to `Folder/{L}_{today}.json`)
        #[clap(long)]
        path: Option<String>,
        /// Commit message
        #[clap(long)]
        message: Option<String>,
        /// Path to the YAML config file with publish defaults
        #[clap(long)]
        config: Option<PathBuf>,
    },
    /// Print the dated filename for a mode
    Filename {
        #[clap(long)]
        mode: Mode,
        /// Date to use instead of today (YYYY-MM-DD)
        #[clap(long)]
        date: Option<NaiveDate>,
    },
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read input from stdin")?;
            Ok(text)
        }
    }
}

fn report_warnings(conversion: &Conversion) {
    for warning in &conversion.warnings {
        eprintln!("[WARN] {warning}");
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Convert {
            mode,
            input,
            output,
            stdout,
        } => {
            tracing::info!(command = "convert", %mode, "Starting conversion");
            let text = read_input(input.as_deref())?;
            let mut session = Session::new();
            let conversion = match session.convert(&text, mode) {
                Err(SessionError::Convert(ConvertError::EmptyInput)) => {
                    eprintln!("[WARN] Please paste some data before converting.");
                    return Ok(());
                }
                other => other?,
            };
            report_warnings(conversion);
            let records = conversion.document.len();
            let json = session.json().unwrap_or_default();

            if stdout {
                println!("{json}");
            } else {
                let output = output.unwrap_or_else(|| PathBuf::from(download_filename(mode)));
                std::fs::write(&output, json)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                println!("Converted {records} records to {}", output.display());
            }
            tracing::info!(command = "convert", records, "Conversion complete");
            Ok(())
        }
        Commands::Publish {
            mode,
            input,
            repo,
            path,
            message,
            config,
        } => {
            tracing::info!(command = "publish", %mode, "Starting publish");
            let config: CliConfig = match config {
                Some(path) => load_config(path)?,
                None => env_only(),
            };
            let settings = config.publish;

            let repo = repo.or(settings.repo).unwrap_or_default();
            let path = path
                .or(settings.path)
                .unwrap_or_else(|| default_remote_path(mode, Local::now().date_naive()));
            let token = config.token.unwrap_or_default();
            if token.is_empty() {
                eprintln!("[WARN] {TOKEN_ENV} is not set");
            }

            let api_base = settings
                .api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
            let store = match settings.timeout_secs {
                Some(secs) => GitHubClient::with_timeout(api_base, Duration::from_secs(secs))?,
                None => GitHubClient::new(api_base),
            };

            let text = read_input(input.as_deref())?;
            let mut session = Session::new();
            session.commit_message = message.or(settings.commit_message);
            let conversion = match session.convert(&text, mode) {
                Err(SessionError::Convert(ConvertError::EmptyInput)) => {
                    eprintln!("[WARN] Please paste some data before uploading.");
                    return Ok(());
                }
                other => other?,
            };
            report_warnings(conversion);

            match session.publish(&store, &repo, &path, &token).await {
                Ok(receipt) => {
                    let verb = match receipt.outcome {
                        PublishOutcome::Created => "created",
                        PublishOutcome::Updated => "updated",
                    };
                    println!("File uploaded successfully! ({verb} {path} in {repo})");
                    if let Some(url) = &receipt.html_url {
                        println!("{url}");
                    }
                    tracing::info!(command = "publish", ?receipt, "Publish complete");
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] {e}");
                    if let PublishError::Rejected { body, .. } = &e {
                        eprintln!("Full response: {body}");
                    }
                    if e.is_conflict() {
                        eprintln!("The file changed remotely while uploading; run the command again to retry.");
                    }
                    tracing::error!(command = "publish", error = %e, "Publish failed");
                    Err(e.into())
                }
            }
        }
        Commands::Filename { mode, date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            println!("{}", dated_filename(mode.label(), date)?);
            Ok(())
        }
    }
}
