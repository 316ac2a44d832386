//! action_server — webhook server for the custom conversation actions.
//!
//! Configuration is read from env vars (and a `.env` file when present);
//! see `emotion_actions::config` for the full list.

use std::sync::Arc;

use anyhow::Context;
use emotion_actions::emotion::InferenceClassifier;
use emotion_actions::report::{ensure_output_dir, ReportPipeline, WkhtmltopdfRenderer};
use emotion_actions::server::build_router;
use emotion_actions::{ActionRegistry, ActionServerConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,emotion_actions=debug".into()),
        )
        .init();

    let config = ActionServerConfig::from_env().context("invalid configuration")?;

    let classifier = InferenceClassifier::new(&config.classifier)?;
    tracing::info!(
        model = %config.classifier.model,
        endpoint = %classifier.endpoint(),
        "Classifier configured"
    );

    // Existence checks up front; the report action repeats them per call
    // and answers with a failure message, so other actions keep working.
    let renderer = WkhtmltopdfRenderer::new(config.report.engine_path.clone());
    match renderer.check() {
        Ok(engine) => tracing::info!(engine = %engine.display(), "Rendering engine found"),
        Err(e) => tracing::warn!("{e}; reports will fail until it is installed"),
    }
    if let Err(e) = ensure_output_dir(&config.report.output_dir) {
        tracing::warn!("{e}; reports will fail until it is writable");
    }

    let pipeline = ReportPipeline::new(
        Arc::new(classifier),
        Arc::new(renderer),
        config.report.clone(),
    )?;
    let registry = Arc::new(ActionRegistry::with_defaults(pipeline));
    tracing::info!(actions = ?registry.names(), "Registered actions");

    let app = build_router(registry);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("action_server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
