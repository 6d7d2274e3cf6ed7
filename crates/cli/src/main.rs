//! Telecom pitch command-line entry point
//!
//! Runs the pipeline on the built-in sample customer or on a request file
//! and prints the sales-rep brief (or the raw outcome as JSON).

mod demo;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use telecom_pitch_agent::{
    format_sales_brief, ExportRecord, PipelineOutcome, PipelineRequest, SalesPipeline,
};
use telecom_pitch_config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "telecom-pitch", version, about = "Personalized telecom sales pitches")]
struct Cli {
    /// Config environment (loads config/{env}.yaml); defaults to $TELECOM_PITCH_ENV
    #[arg(long, global = true)]
    env: Option<String>,

    /// Print the full outcome as JSON instead of the sales brief
    #[arg(long, global = true)]
    json: bool,

    /// Write an export record to this file after a successful run
    #[arg(long, global = true, value_name = "FILE")]
    export: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the built-in sample customer
    Demo,
    /// Run a request read from a JSON file
    Run {
        #[arg(short, long, value_name = "FILE")]
        request: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env = cli
        .env
        .clone()
        .or_else(|| std::env::var("TELECOM_PITCH_ENV").ok());
    let (settings, load_error) = match load_settings(env.as_deref()) {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    init_tracing(&settings);
    if let Some(e) = load_error {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
    }
    tracing::debug!(env = env.as_deref().unwrap_or("default"), "Configuration loaded");

    let pipeline =
        SalesPipeline::from_settings(&settings).context("failed to build pipeline from settings")?;

    let request = match &cli.command {
        Command::Demo => demo::sample_request(),
        Command::Run { request } => read_request(request)?,
    };

    let outcome = pipeline.run_async(request).await;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("failed to serialize outcome")?
        );
    } else {
        print_outcome(&outcome);
    }

    if !outcome.success {
        bail!("pipeline run failed: {}", outcome.error);
    }

    if let Some(path) = &cli.export {
        ExportRecord::from_outcome(&outcome, &settings.agent)
            .and_then(|record| record.write_json(path))
            .with_context(|| format!("failed to write export record to {}", path.display()))?;
    }

    Ok(())
}

fn read_request(path: &Path) -> anyhow::Result<PipelineRequest> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse request file {}", path.display()))
}

fn print_outcome(outcome: &PipelineOutcome) {
    if let Some(profile) = &outcome.customer_profile {
        println!("CUSTOMER PROFILE");
        println!("• Segment: {}", profile.segment);
        println!("• Usage Pattern: {}", profile.usage_pattern);
        println!("• Cost Sensitivity: {}", profile.needs.cost_sensitivity);
        println!("• Data Priority: {}", profile.needs.data_priority);
        println!("• Network Quality Priority: {}", profile.needs.network_quality);
        if !profile.pain_points.is_empty() {
            let points: Vec<&str> = profile.pain_points.iter().map(|p| p.as_str()).collect();
            println!("• Pain Points: {}", points.join(", "));
        }
        println!();
    }

    println!("{}", format_sales_brief(outcome));
}

fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("telecom_pitch={},warn", level).into()
    });

    // Logs go to stderr so stdout stays clean for the brief or JSON
    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}
