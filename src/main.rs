use dotenvy::dotenv;
use sales_ledger::{
    api::{AppState, create_router},
    config::{self, database},
    core::seed::build_http_client,
    errors::{Error, Result},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!("Configuration loaded");

    // 4. Initialize database
    let db = Arc::new(
        database::init_db(&app_config.database_url)
            .await
            .inspect(|_| info!("Database initialized successfully."))
            .inspect_err(|e| error!("Failed to initialize database: {}", e))?,
    );

    // 5. Build shared state and router
    let http_client = build_http_client(Duration::from_secs(app_config.fetch_timeout_secs))?;
    let state = AppState::new(Arc::clone(&db), http_client, &app_config.seed_source_url);
    let app = create_router(state, &app_config.cors_origins);

    // 6. Serve until Ctrl+C / SIGTERM
    let addr = app_config.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", addr, e))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 7. Release the pool once the router has dropped its handles
    match Arc::try_unwrap(db) {
        Ok(db) => db.close().await.map_err(Error::from)?,
        Err(_) => warn!("Database handle still shared at shutdown; pool left to drop"),
    }
    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
