//! Command-line interface for brief-rs
//!
//! Runs one daily-brief pipeline pass: fetch insider filings and creator
//! posts for the window, summarize and score them, then write the rendered
//! report and run log under the output directory.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use brief_core::{ReportStatus, ReportWindow};
use brief_llm::providers::GroqProvider;
use brief_pipeline::{PipelineConfig, PipelineOrchestrator};
use brief_sources::{CreatorPostsSource, EdgarSource};
use clap::Parser;
use tracing::{info, warn};

mod render;

#[derive(Parser, Debug)]
#[command(name = "brief")]
#[command(about = "Daily insider-filings and creator-sentiment brief", long_about = None)]
struct Args {
    /// Hours the report window reaches back
    #[arg(long)]
    window_hours: Option<i64>,

    /// Creator-post dataset file (JSON lines); repeat for multiple files
    #[arg(long = "posts", value_name = "PATH")]
    posts: Vec<PathBuf>,

    /// Directory for the rendered report and run log
    #[arg(long, default_value = "reports")]
    out_dir: PathBuf,

    /// Wall-clock budget for the whole run, in seconds
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Attempt ceiling per step
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Concurrent sentiment steps allowed in flight
    #[arg(long)]
    pool_size: Option<usize>,

    /// Primary model identifier
    #[arg(long)]
    model: Option<String>,

    /// Skip the EDGAR fetch (useful without network access)
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    brief_utils::init_tracing();

    let args = Args::parse();
    let config = build_config(&args)?;

    info!(
        model = %config.model,
        window_hours = config.window_hours,
        "Starting daily brief run"
    );

    let provider = Arc::new(GroqProvider::from_env().context("model provider setup failed")?);

    let mut builder = PipelineOrchestrator::builder()
        .provider(provider)
        .config(config.clone());

    if args.offline {
        info!("Offline mode, skipping EDGAR fetch");
    } else {
        let edgar = EdgarSource::from_env()
            .context("EDGAR source setup failed")?
            .with_max_filings(config.max_filings);
        builder = builder.insider_source(Arc::new(edgar));
    }

    if args.posts.is_empty() {
        warn!("No --posts files given, the report will have no sentiment sections");
    } else {
        let posts = CreatorPostsSource::new(args.posts.clone())
            .with_posts_per_creator(config.posts_per_creator);
        builder = builder.posts_source(Arc::new(posts));
    }

    let orchestrator = builder.build()?;
    let window = ReportWindow::last_hours(config.window_hours);
    let report = orchestrator.run(window).await;

    let path = render::write_report(&report, &args.out_dir)?;
    render::append_run_log(&report, &args.out_dir)?;

    info!(
        status = report.status.as_str(),
        report = %path.display(),
        "Run finished"
    );
    println!("Report written to {}", path.display());

    if report.status == ReportStatus::Failed {
        std::process::exit(1);
    }
    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<PipelineConfig> {
    let mut builder = PipelineConfig::builder();
    if let Some(hours) = args.window_hours {
        builder = builder.window_hours(hours);
    }
    if let Some(seconds) = args.deadline_secs {
        builder = builder.run_deadline_seconds(seconds);
    }
    if let Some(attempts) = args.max_attempts {
        builder = builder.max_attempts(attempts);
    }
    if let Some(size) = args.pool_size {
        builder = builder.pool_size(size);
    }
    if let Some(model) = &args.model {
        builder = builder.model(model.clone());
    }
    Ok(builder.build()?)
}
