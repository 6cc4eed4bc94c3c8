//! Sentiserve Server
//!
//! Serves sentiment classification over HTTP: JSON text on `/classify`,
//! multipart uploads on `/classify-file`.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use sentiserve_classifiers::ClassifierLoader;
use sentiserve_server::{create_router, AppState, Cli, ServerConfig};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting Sentiserve server");

    let config = ServerConfig::load(&cli)?;
    info!("Configuration loaded successfully");
    info!("Backend: {:?}", config.model.backend);
    info!("Model: {}", config.model.model_id);
    info!("Cache dir: {}", config.model.resolved_cache_dir().display());

    let metrics_handle = init_metrics()?;

    // Load the model before binding so the first request never waits on it
    let loader = ClassifierLoader::new(config.model.clone());
    let classifier = loader.load_classifier().await.map_err(|e| {
        error!("Failed to load classifier: {}", e);
        e
    })?;

    let state = AppState::new(classifier).with_metrics(metrics_handle);
    let app = create_router(state, config.max_body_bytes);

    let listener = tokio::net::TcpListener::bind((config.listen.as_str(), config.port)).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("sentiserve=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sentiserve=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the Prometheus recorder and return the handle `/metrics` renders from
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "sentiserve_requests_total",
        "Total number of classification requests by endpoint"
    );
    metrics::describe_counter!(
        "sentiserve_errors_total",
        "Total number of failed classifications by error kind"
    );
    metrics::describe_histogram!(
        "sentiserve_inference_latency_us",
        metrics::Unit::Microseconds,
        "Classification latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
