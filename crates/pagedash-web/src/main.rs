mod access_log;
mod background;
mod handlers;
mod openapi;
mod page;
mod source;
mod state;

use std::net::SocketAddr;
use std::process;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use clap::Parser;
use tokio::sync::broadcast;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use access_log::AccessLogLayer;
use openapi::ApiDoc;
use source::HttpSource;
use state::{SharedState, WebAppInner};

// ============================================================
// CLI
// ============================================================

#[derive(Parser)]
#[command(name = "pagedash-web", about = "Persistence service dashboard", version = pagedash_core::VERSION)]
struct Args {
    /// Listen address.
    #[arg(long, default_value = "0.0.0.0:8080", env = "PAGEDASH_LISTEN")]
    listen: String,

    /// Base URL of the persistence service (its `/api/status` is polled).
    #[arg(long, env = "PAGEDASH_BACKEND")]
    backend: String,

    /// Poll interval in seconds.
    #[arg(long, default_value = "1", env = "PAGEDASH_INTERVAL",
          value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// Status request timeout in seconds.
    #[arg(long, default_value = "5", env = "PAGEDASH_TIMEOUT",
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,
}

// ============================================================
// Main
// ============================================================

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagedash_web=info,pagedash_core=info".into()),
        )
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            process::exit(1);
        }
    };
    runtime.block_on(async_main(args));
}

async fn async_main(args: Args) {
    let addr: SocketAddr = match args.listen.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(listen = %args.listen, error = %e, "invalid listen address");
            process::exit(1);
        }
    };

    let source = HttpSource::new(&args.backend, Duration::from_secs(args.timeout));
    info!(
        version = pagedash_core::VERSION,
        status_url = source.url(),
        interval_s = args.interval,
        "starting"
    );

    let (tx, _rx) = broadcast::channel(16);
    let state: SharedState = Arc::new(Mutex::new(WebAppInner::new(args.backend.clone())));

    let poll_task = {
        let state_clone = state.clone();
        let tx_clone = tx.clone();
        let interval = Duration::from_secs(args.interval);
        tokio::spawn(async move {
            background::poll_loop(state_clone, tx_clone, source, interval).await;
        })
    };

    let app = Router::new()
        .route("/", get(handlers::serve_index))
        .route("/assets/{*path}", get(handlers::serve_asset))
        .route("/api/v1/health", get(handlers::handle_health))
        .route("/api/v1/regions", get(handlers::handle_regions))
        .route("/api/v1/regions/{id}", get(handlers::handle_region))
        .route("/api/v1/stream", get(handlers::handle_stream))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::not_found)
        .with_state((state, tx))
        .layer(AccessLogLayer)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new());

    let app = app.into_make_service_with_connect_info::<SocketAddr>();

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            process::exit(1);
        }
    };
    info!(%addr, "listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
    }

    // An in-flight fetch is abandoned with the task.
    poll_task.abort();
    info!("stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
