//! Emotion report CLI
//!
//! Runs the report pipeline against a saved tracker dump, without the
//! action server.
//!
//! # Usage
//!
//! ```bash
//! # Render a PDF into the configured output directory
//! emotion-report --tracker conversation.json
//!
//! # Print the HTML instead of exporting it
//! emotion-report --tracker conversation.json --html-only
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use emotion_actions::emotion::InferenceClassifier;
use emotion_actions::report::{ReportPipeline, WkhtmltopdfRenderer};
use emotion_actions::{ActionServerConfig, SelectionStrategy, Tracker};

#[derive(Parser)]
#[command(name = "emotion-report")]
#[command(version = "0.1.0")]
#[command(about = "Generate an emotional wellness report from a tracker dump")]
#[command(long_about = None)]
struct Cli {
    /// Tracker JSON file, as sent by the host in an action call
    #[arg(short, long)]
    tracker: PathBuf,

    /// Override the output directory
    #[arg(long, env = "EMOTION_REPORT_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Which classification feeds the report: first, latest or mean
    #[arg(long, env = "EMOTION_REPORT_SELECTION")]
    selection: Option<SelectionStrategy>,

    /// Print the HTML to stdout instead of exporting a PDF
    #[arg(long)]
    html_only: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,emotion_actions=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ActionServerConfig::from_env()?;
    if let Some(dir) = cli.output_dir {
        config.report.output_dir = dir;
    }
    if let Some(selection) = cli.selection {
        config.report.selection = selection;
    }

    let raw = std::fs::read_to_string(&cli.tracker)
        .with_context(|| format!("reading {}", cli.tracker.display()))?;
    let tracker: Tracker = serde_json::from_str(&raw)
        .with_context(|| format!("parsing tracker {}", cli.tracker.display()))?;

    let pipeline = ReportPipeline::new(
        Arc::new(InferenceClassifier::new(&config.classifier)?),
        Arc::new(WkhtmltopdfRenderer::new(config.report.engine_path.clone())),
        config.report,
    )?;

    if cli.html_only {
        let rendered = pipeline.render_html(&tracker, &Local::now()).await?;
        println!("{}", rendered.html);
    } else {
        let generated = pipeline.generate(&tracker).await?;
        println!("{}", generated.path.display());
    }
    Ok(())
}
