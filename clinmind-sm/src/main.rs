//! clinmind-sm (Sample Measurement) - measurement log service
//!
//! Persists classified sample measurements in a single JSON slot under the
//! data root and estimates dimensions from photos via the configured
//! analyzer (remote Gemini model, or a local deterministic stand-in when no
//! credential is set).

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use clinmind_common::config::{self, AnalysisCredential};
use clinmind_common::records::JsonFileStore;
use clinmind_sm::analysis::Analyzer;
use clinmind_sm::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "clinmind-sm", about = "ClinMind sample measurement service")]
struct Args {
    /// Data root folder holding the measurement slot
    #[arg(long)]
    root: Option<String>,

    /// TCP port to listen on
    #[arg(long, env = "CLINMIND_SM_PORT", default_value_t = 5730)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber before anything that can log
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Build identification first, so startup problems are attributable
    info!(
        "Starting ClinMind Sample Measurement (clinmind-sm) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root = config::resolve_root_folder(args.root.as_deref());
    std::fs::create_dir_all(&root)?;
    let slot = config::slot_path(&root);
    info!("Measurement slot: {}", slot.display());

    let store = Arc::new(JsonFileStore::new(slot));

    let analyzer = match config::analysis_credential() {
        AnalysisCredential::Remote(key) => {
            info!("✓ Remote image analysis enabled (Gemini)");
            Analyzer::gemini(key)
        }
        AnalysisCredential::LocalMode => {
            info!("No analysis credential configured, using local deterministic analyzer");
            Analyzer::local()
        }
    };

    let state = AppState::new(store, Arc::new(analyzer));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("clinmind-sm listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
