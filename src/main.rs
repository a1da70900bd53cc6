//! Ferrum Server: OAuth2 / OpenID Connect authorization server
//!
//! Main entry point that wires the identity store, the session table and
//! the token codec into an authorization engine.

use tracing_subscriber::{EnvFilter, fmt};

use ferrum_core::config::AppConfig;
use ferrum_core::error::AppError;
use ferrum_service::AuthorizationEngine;
use ferrum_store::StoreManager;

#[tokio::main]
async fn main() {
    let env = std::env::var("FERRUM_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Ferrum v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Signing key ──────────────────────────────────────
    let signing_key = config.auth.resolve_signing_key()?;

    // ── Step 2: Identity store ───────────────────────────────────
    tracing::info!(data_source = ?config.data_source.kind, "Initializing identity store...");
    let store = StoreManager::new(&config.data_source).await?.store();
    if !store.is_available().await {
        return Err(AppError::new(
            ferrum_core::ErrorKind::ProviderUnavailable,
            format!("identity store {:?} did not answer", config.data_source.kind),
        ));
    }
    tracing::info!("Identity store initialized");

    // ── Step 3: Authorization engine ─────────────────────────────
    let _engine = AuthorizationEngine::new(store, config.server.clone(), &signing_key);
    tracing::info!(
        issuer_base = %config.server.base_url(),
        "Ferrum is ready"
    );

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
