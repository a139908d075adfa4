use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod analysis;
mod charts;
mod config;
mod fetch;
mod insights;
mod loader;
mod models;
mod persona;
mod pipeline;
mod recommend;
mod report;
mod validate;

use config::{PipelineConfig, DEFAULT_ENDPOINT};
use pipeline::Outcome;

#[derive(Parser)]
#[command(name = "quiz-insights")]
#[command(about = "Topic statistics, trends and recommendations from quiz history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Current submissions: URL, .json or .csv file
    #[arg(long, env = "QUIZ_CURRENT_SOURCE", default_value = DEFAULT_ENDPOINT)]
    current: String,
    /// Historical submissions: URL, .json or .csv file
    #[arg(long, env = "QUIZ_HISTORY_SOURCE", default_value = DEFAULT_ENDPOINT)]
    history: String,
    /// Accept invalid TLS certificates (trusted test hosts only)
    #[arg(long)]
    insecure: bool,
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl SourceArgs {
    fn into_config(self) -> PipelineConfig {
        let mut config = PipelineConfig::new(&self.current, &self.history);
        config.accept_invalid_certs = self.insecure;
        config.timeout = Duration::from_secs(self.timeout_secs.max(1));
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print recommendations and show the accuracy charts
    Analyze {
        #[command(flatten)]
        sources: SourceArgs,
        /// Skip the interactive chart screen
        #[arg(long)]
        no_charts: bool,
        /// Print the full insight report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        sources: SourceArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quiz_insights=warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            sources,
            no_charts,
            json,
        } => {
            let report = pipeline::run(&sources.into_config()).await?;

            if json {
                let value = report::render_json(&report)?;
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }

            print!("{}", report::render_console(&report));

            match &report.outcome {
                Outcome::Completed(_) if no_charts => {}
                Outcome::Completed(insights) if std::io::stdout().is_terminal() => {
                    charts::show(insights).context("failed to display charts")?;
                }
                Outcome::Completed(_) => warn!("stdout is not a terminal, skipping charts"),
                Outcome::Halted(_) => {}
            }
        }
        Commands::Report { sources, out } => {
            let report = pipeline::run(&sources.into_config()).await?;
            match &report.outcome {
                Outcome::Completed(insights) => {
                    std::fs::write(&out, report::build_report(insights))
                        .with_context(|| format!("failed to write {}", out.display()))?;
                    println!("Report written to {}.", out.display());
                }
                Outcome::Halted(_) => print!("{}", report::render_console(&report)),
            }
        }
    }

    Ok(())
}
