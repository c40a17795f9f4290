//! Forensic Lab CLI
//!
//! Headless access to the analysis pipeline:
//! - `analyze` runs one file through the pipeline and prints the report
//! - `check` verifies the configured exiftool and ffmpeg binaries

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use forensic_lab_lib::core::tools::{configured_tools, detect_tool, ToolInfo};
use forensic_lab_lib::{AnalysisCoordinator, AnalysisRequest, ForensicsConfig};

#[derive(Parser, Debug)]
#[command(name = "forensic-lab-cli", version, about = "Headless media forensics")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a media file and print the JSON report
    Analyze {
        /// File to analyze
        file: PathBuf,

        /// Seconds between sampled keyframes
        #[arg(long)]
        interval: Option<u32>,

        /// Number of keyframes passed to the match search
        #[arg(long)]
        limit: Option<usize>,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },
    /// Check that the external tools are installed
    Check {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolCheck {
    name: String,
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<ToolInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Analyze {
            file,
            interval,
            limit,
            pretty,
        } => analyze(config, &file, interval, limit, pretty).await,
        Command::Check { json } => check(&config, json).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<ForensicsConfig> {
    match path {
        // An explicit file must be valid.
        Some(path) => ForensicsConfig::try_load(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Invalid config {}", path.display())),
        None => Ok(ForensicsConfig::default_path()
            .map(|path| ForensicsConfig::load(&path))
            .unwrap_or_default()),
    }
}

async fn analyze(
    mut config: ForensicsConfig,
    file: &Path,
    interval: Option<u32>,
    limit: Option<usize>,
    pretty: bool,
) -> Result<()> {
    if let Some(interval) = interval {
        config.keyframe_interval_secs = interval;
    }
    if let Some(limit) = limit {
        config.match_limit = limit;
    }
    config.normalize();

    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());

    let coordinator = AnalysisCoordinator::new(&config);
    let report = coordinator
        .analyze(&AnalysisRequest::new(filename, data))
        .await?;

    let output = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);
    Ok(())
}

async fn check(config: &ForensicsConfig, json: bool) -> Result<()> {
    let tools = configured_tools(config);

    let mut checks = Vec::with_capacity(tools.len());
    for tool in &tools {
        let runner = &tool.runner;
        let check = match detect_tool(runner, tool.version_arg).await {
            Ok(info) => ToolCheck {
                name: runner.name().to_string(),
                available: true,
                info: Some(info),
                error: None,
            },
            Err(e) => ToolCheck {
                name: runner.name().to_string(),
                available: false,
                info: None,
                error: Some(e.to_string()),
            },
        };
        checks.push(check);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&checks)?);
    } else {
        for check in &checks {
            match (&check.info, &check.error) {
                (Some(info), _) => println!(
                    "{:<10} ok       {} ({})",
                    check.name,
                    info.version,
                    info.program.display()
                ),
                (None, Some(error)) => println!("{:<10} missing  {}", check.name, error),
                (None, None) => println!("{:<10} missing", check.name),
            }
        }
    }

    let missing: Vec<&str> = checks
        .iter()
        .filter(|c| !c.available)
        .map(|c| c.name.as_str())
        .collect();
    if !missing.is_empty() {
        bail!("Missing tools: {}", missing.join(", "));
    }
    Ok(())
}
