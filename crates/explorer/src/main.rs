//! Citemap Explorer
//!
//! Loads the paper catalog, builds the acyclic citation graph, lays it out
//! and runs an interactive session:
//! - Hover/click focus with upstream/downstream highlighting every frame
//! - Title search and semantic lookup by free-text description
//! - Follow-up suggestions and paper comparison
//! - JSON export of the positioned graph

mod commands;
mod export;
mod lookup;
mod panels;
mod session;
mod surface;

use crate::lookup::Services;
use crate::session::Session;
use crate::surface::TerminalSurface;
use anyhow::Context;
use citemap_common::{
    config::{AppConfig, ObservabilityConfig},
    embeddings::create_embedder,
    generation::{create_generator, ResearchAssistant},
    metrics, PaperCatalog, VERSION,
};
use citemap_graph::{build, BuildOutcome, LayeredPlanner, Palette};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration; APP_CONFIG names an explicit file
    let config = match std::env::var("APP_CONFIG") {
        Ok(path) => AppConfig::from_file(&path),
        Err(_) => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    init_tracing(&config.observability);
    info!(service = %config.observability.service_name, "Starting Citemap Explorer v{}", VERSION);

    // Metrics
    metrics::register_metrics();
    if let Err(e) = metrics::install_exporter(&config.observability) {
        warn!(error = %e, "Metrics exporter disabled");
    }

    // Papers and graph
    let mut papers = PaperCatalog::load(&config.data.papers_path)?;
    let BuildOutcome { mut graph, report } = build(&mut papers);
    if !report.rejected.is_empty() {
        info!(rejected = report.rejected.len(), "Citations dropped to keep the graph acyclic");
    }

    let layout = LayeredPlanner::from_config(&config.layout).plan(&mut graph);
    info!(generations = layout.generations.len(), "Layout ready");

    // AI collaborators
    let embedder = create_embedder(&config.embedding)?;
    let generator = create_generator(&config.generation)?;
    info!(
        embedding_model = %embedder.model_name(),
        generation_model = %generator.model_name(),
        "AI services initialized"
    );

    let services = Services {
        embedder,
        assistant: ResearchAssistant::new(generator),
        papers: Arc::new(papers),
    };

    let palette = Palette::from_config(&config.highlight.palette)?;
    let surface = TerminalSurface::new(std::io::stdout());

    let mut session = Session::new(graph, services, palette, surface, config.frame_interval())
        .with_export_path(config.data.export_path.clone());

    println!("{}", commands::HELP);
    session
        .run(BufReader::new(tokio::io::stdin()), shutdown_signal())
        .await?;

    info!("Explorer shutdown complete");
    Ok(())
}

/// Plain or JSON logs; `RUST_LOG` overrides the configured level
fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // Logs go to stderr so they never interleave with the session output
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Ctrl+C handler
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down..."),
        Err(e) => {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
