use incident_server::config::ServerConfig;
use incident_server::{dashboard_router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(
        api = %config.api_base_url,
        ui_dir = %config.ui_dir.display(),
        "starting incident dashboard"
    );

    let app = dashboard_router(AppState::new(&config), &config.ui_dir);
    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {}: {e}", config.listen_addr);
            std::process::exit(1);
        }
    };

    tracing::info!("incident dashboard listening on {}", config.listen_addr);
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
