//! Configuration from command-line flags and environment variables.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use base_reporter::{DEFAULT_PROPERTY, Options, into_options, property_path};
use clap::Parser;
use serde_json::Value;

/// Walk a directory and report on the files found.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to walk.
    #[arg(env = "REPORT_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Property file paths are recorded under; `a.b` records into a nested
    /// object.
    #[arg(long, env = "REPORT_PROPERTY", default_value = DEFAULT_PROPERTY)]
    pub property: String,

    /// Base report options as a JSON object.
    #[arg(long, env = "REPORT_OPTIONS")]
    pub base_options: Option<String>,

    /// Per-run report option, `key=value`. Values are parsed as JSON when
    /// possible and kept as strings otherwise. Repeatable.
    #[arg(long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Include hidden files and directories.
    #[arg(long)]
    pub include_hidden: bool,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory to walk.
    pub root: PathBuf,
    /// Property file paths are recorded under.
    pub property: String,
    /// Options the reporter is installed with.
    pub base_options: Options,
    /// Options passed to this run's report.
    pub run_options: Options,
    /// Include hidden entries.
    pub include_hidden: bool,
    /// JSON output.
    pub json: bool,
}

impl Config {
    /// Validate and resolve parsed arguments.
    pub fn from_args(args: Args) -> Result<Self> {
        property_path(&args.property)?;

        let base_options = match args.base_options.as_deref() {
            Some(raw) => {
                let value: Value =
                    serde_json::from_str(raw).context("REPORT_OPTIONS must be valid JSON")?;
                into_options(value)?
            }
            None => Options::new(),
        };

        let mut run_options = Options::new();
        for raw in &args.options {
            let (key, value) = parse_option(raw)?;
            run_options.insert(key, value);
        }

        Ok(Self {
            root: args.root,
            property: args.property,
            base_options,
            run_options,
            include_hidden: args.include_hidden,
            json: args.json,
        })
    }
}

/// Parse a `key=value` option.
fn parse_option(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("option '{raw}' must be in key=value form");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("option '{raw}' has an empty key");
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
