use std::path::PathBuf;

use registre::config::{load_config_or_default, Config};
use registre::{cors_layer, router, ConfigError, Registry, RegistreError};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

mod logging;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] logging::LoggingError),

    #[error("Could not determine database path")]
    NoDatabasePath,

    #[error("Failed to open registry: {0}")]
    Registry(#[from] RegistreError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Config path from the first argument or `REGISTRE_CONFIG`.
fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("REGISTRE_CONFIG").map(PathBuf::from))
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("registre-server: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config_path = config_path();
    let config: Config = load_config_or_default(config_path.as_deref())?;

    logging::init(&config.logging)?;
    match &config_path {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("No configuration file, using defaults"),
    }

    let db_path = config
        .database
        .resolve_path()
        .ok_or(StartupError::NoDatabasePath)?;
    let registry = Registry::open(&db_path)?;

    let app = router(registry)
        .layer(cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http());

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    info!(%address, database = %db_path.display(), "Registry API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
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
    info!("Shutdown signal received");
}
