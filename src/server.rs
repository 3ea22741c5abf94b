use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::Extension, routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    handlers,
    store::{MySqlStore, Store},
};

const DEFAULT_LOG_FILTER: &str = "food_waste_api=info,tower_http=info";

/// Shared by every handler. Holds no per-request state.
pub(crate) struct State {
    pub(crate) store: Box<dyn Store>,
}

impl State {
    pub(crate) fn new(store: Box<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a new State instance from configuration. No connection is made until a request
    /// needs one.
    pub(crate) fn from_config(config: &Config) -> Self {
        Self::new(Box::new(MySqlStore::new(
            config.database.connect_options(),
        )))
    }
}

/// Build the router over `state`.
pub(crate) fn router(state: State) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/food_items",
            get(handlers::list_food_items).post(handlers::create_food_item),
        )
        .route(
            "/donations",
            get(handlers::list_donations).post(handlers::create_donation),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Run the server.
pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        host = %config.database.host,
        port = config.database.port,
        database = %config.database.name,
        "using database"
    );

    let app = router(State::from_config(&config));

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    info!("Server running on {}", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("failed to install terminate handler: {e}");
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
