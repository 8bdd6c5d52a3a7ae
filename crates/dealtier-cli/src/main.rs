//! Dealtier command-line interface.

mod display;
mod input;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dealtier_ai::{CategoryClassifier, LlmClassifier, NullClassifier};
use dealtier_core::Denylist;
use dealtier_engine::{ProgressReporter, ProgressUpdate, RankOptions, run_pipeline};
use serde::Serialize;
use tracing::warn;

#[derive(Parser)]
#[command(name = "dealtier", version, about = "Tier and rank company records for deal-sourcing review")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank a record set against a tiering configuration.
    Rank {
        /// JSON array of company records (spreadsheet export).
        records: PathBuf,
        /// Tiering configuration JSON.
        config: PathBuf,
        /// OpenAI-compatible API root for the category classifier.
        #[arg(long, default_value = "https://api.openai.com")]
        endpoint: String,
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Override the classifier model.
        #[arg(long)]
        model: Option<String>,
        /// Companies per classifier call.
        #[arg(long, default_value_t = 15)]
        batch_size: usize,
        /// Classifier batches in flight at once.
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
        /// Skip the classifier entirely; rank from rule-based tiers alone.
        #[arg(long)]
        offline: bool,
        /// Also print the per-dimension audit table.
        #[arg(long)]
        diagnostics: bool,
        /// Emit both output sets as JSON instead of tables.
        #[arg(long)]
        json: bool,
    },
    /// Parse and validate a tiering configuration file.
    CheckConfig {
        config: PathBuf,
    },
}

/// Single-line progress display on stderr.
struct StderrReporter;

impl ProgressReporter for StderrReporter {
    fn report(&self, update: ProgressUpdate) {
        eprint!(
            "\r  Ranking {}/{} ({:.1}%)",
            update.completed, update.total, update.percent
        );
        let _ = std::io::stderr().flush();
        if update.completed == update.total {
            eprintln!();
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    presentation: &'a [dealtier_engine::PresentationRow],
    diagnostics: &'a [dealtier_engine::DiagnosticRow],
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Rank {
            records,
            config,
            endpoint,
            api_key,
            model,
            batch_size,
            concurrency,
            offline,
            diagnostics,
            json,
        } => {
            let record_set = input::load_records(&records)?;
            let tiering = input::load_config(&config)?;

            let classifier: Box<dyn CategoryClassifier> = if offline {
                Box::new(NullClassifier)
            } else if let Some(key) = api_key {
                let mut llm = LlmClassifier::new(endpoint, key);
                if let Some(model) = model {
                    llm = llm.with_model(model);
                }
                Box::new(llm)
            } else {
                warn!("no API key configured; ranking without the category classifier");
                Box::new(NullClassifier)
            };

            let options = RankOptions {
                batch_size,
                concurrency,
                denylist: Denylist::default(),
            };
            let outcome = run_pipeline(
                record_set,
                &tiering,
                classifier.as_ref(),
                &StderrReporter,
                &options,
            )
            .await;

            if json {
                let out = JsonOutput {
                    presentation: &outcome.presentation,
                    diagnostics: &outcome.diagnostics,
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                display::print_presentation(&outcome.presentation);
                if diagnostics {
                    println!();
                    display::print_diagnostics(&outcome.diagnostics);
                }
            }
        }
        Command::CheckConfig { config } => {
            let tiering = input::load_config(&config)?;
            println!("Configuration is valid.");
            println!("  countries        {}", tiering.country.len());
            println!("  ownership types  {}", tiering.ownership.len());
            println!("  founding bounds  {}", tiering.founding_year.len());
            println!("  fundraise bounds {}", tiering.fundraise_year.len());
            println!("  raised rows      {}", tiering.total_raised.rows().len());
            println!("  headcount rows   {}", tiering.fte_count.len());
        }
    }

    Ok(())
}
