//! File report tool.
//!
//! Walks a directory, runs every file through a pipeline equipped with
//! reporter middleware, then runs the summary report and prints it.
//!
//! Usage:
//!   cargo run -p file-report -- ./docs --option title=Docs --option limit=20

mod config;
mod summary;
mod walk;

use anyhow::{Context, Result};
use base_app::{App, Pipeline};
use base_reporter::{ReporterAppExt, reporter};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Args, Config};
use crate::summary::{SUMMARY, extension_counter, render_text, summary_report};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_args(Args::parse()).context("failed to load configuration")?;
    info!(root = %config.root.display(), property = %config.property, "configuration loaded");

    let app = App::new();
    app.use_plugin(&reporter(config.base_options.clone()))
        .context("failed to install reporter")?;
    let reporter = app.reporter().context("reporter was not attached to the app")?;

    let files = walk::collect_files(&config.root, config.include_hidden)?;
    info!(files = files.len(), "collected files");

    let mut pipeline = Pipeline::new();
    pipeline.push(reporter.middleware(config.property.as_str())?);
    pipeline.push(reporter.middleware(extension_counter())?);
    let run = pipeline.run(files);
    info!(processed = run.processed, halted = run.halted, "pipeline finished");

    reporter
        .add("summary", summary_report(config.property.clone()))?
        .report("summary", Some(&config.run_options))?;

    let summary = reporter
        .cache()
        .get(SUMMARY)
        .context("summary report produced no output")?;

    if config.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("failed to serialize summary")?
        );
    } else {
        print!("{}", render_text(&summary));
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
