use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use crate::catalog::{OutputFormat, ReportKind};
use crate::config::{AnalyticsConfig, LogFormat, Settings, DEFAULT_RISK_THRESHOLD, DEFAULT_TOP_N};

mod breakdown;
mod catalog;
mod config;
mod correlation;
mod dataset;
mod db;
mod difficulty;
mod error;
mod export;
mod gpa;
mod models;
mod report;
mod risk;
mod stats;
#[cfg(test)]
mod testutil;
mod trend;

#[derive(Parser)]
#[command(name = "student-performance-analytics")]
#[command(about = "Derives GPA, risk, difficulty and trend metrics from student records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Compute one report from the current data
    Report {
        /// Report name, e.g. summary, gpa, at-risk, trends
        kind: ReportKind,
        #[command(flatten)]
        tuning: Tuning,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write every tabular report as CSV into a directory
    Export {
        #[arg(long, default_value = "exports")]
        dir: PathBuf,
        #[command(flatten)]
        tuning: Tuning,
    },
}

#[derive(Args)]
struct Tuning {
    /// Course averages below this value are flagged as at risk
    #[arg(long, default_value_t = DEFAULT_RISK_THRESHOLD)]
    threshold: f64,
    /// Row limit for the top-performers view
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    limit: usize,
}

impl From<&Tuning> for AnalyticsConfig {
    fn from(tuning: &Tuning) -> Self {
        Self {
            risk_threshold: tuning.threshold,
            top_n: tuning.limit,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env().context("invalid environment configuration")?;
    init_tracing(&settings);

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await
        .context("failed to connect to Postgres")?;

    let outcome = run(cli.command, &pool).await;
    pool.close().await;
    tracing::debug!("Connection pool closed");

    outcome
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match settings.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn run(command: Commands, pool: &PgPool) -> anyhow::Result<()> {
    match command {
        Commands::InitDb => {
            db::init_db(pool).await.context("failed to apply migrations")?;
            println!("Schema ready.");
        }
        Commands::Report {
            kind,
            tuning,
            format,
            out,
        } => {
            let config = AnalyticsConfig::from(&tuning);
            config.validate()?;
            let dataset = db::fetch_dataset(pool).await.context("failed to load data")?;
            let output = catalog::run(kind, &dataset, &config, Utc::now())?;
            let rendered = output.render(format)?;
            tracing::info!(report = %kind, rows = output.row_count(), "Report computed");

            match out {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Report written to {}.", path.display());
                }
                None => println!("{}", rendered.trim_end()),
            }
        }
        Commands::Export { dir, tuning } => {
            let config = AnalyticsConfig::from(&tuning);
            config.validate()?;
            let dataset = db::fetch_dataset(pool).await.context("failed to load data")?;
            let written = export::export_all(&dataset, &config, Utc::now(), &dir)?;
            println!("Exported {} reports to {}.", written.len(), dir.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_kind_parses_by_name() {
        let cli = Cli::try_parse_from(["student-performance-analytics", "report", "at-risk"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Report {
                kind: ReportKind::AtRisk,
                ..
            }
        ));
    }

    #[test]
    fn unknown_report_kind_is_rejected() {
        let err = Cli::try_parse_from(["student-performance-analytics", "report", "leaderboard"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("unknown report"));
    }
}
