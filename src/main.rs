use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use visitor_map::api;
use visitor_map::config::Config;
use visitor_map::storage::{MemoryVisitLog, VisitStore};
use visitor_map::visitor::GeoIpService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize visit log
    let memory_log = MemoryVisitLog::with_capacity(config.visit_log.capacity);
    match memory_log.capacity() {
        Some(capacity) => info!("Visit log keeps the newest {} visits", capacity),
        None => info!("Visit log is unbounded"),
    }
    let visit_log: Arc<dyn VisitStore> = Arc::new(memory_log);

    // Initialize GeoIP fallback
    let geoip = match config.geoip.country_db_path.as_deref() {
        Some(path) => {
            let service = GeoIpService::new(Some(path))?;
            info!("🌍 GeoIP country fallback enabled: {}", path);
            Some(Arc::new(service))
        }
        None => {
            info!("GeoIP country fallback disabled");
            None
        }
    };

    // Log frontend configuration
    if let Some(ref static_dir) = config.frontend.static_dir {
        info!("🎨 Serving frontend from directory: {}", static_dir);
    } else {
        info!("🎨 Serving embedded frontend");
    }

    let router = api::create_api_router(visit_log, geoip, config.frontend.clone());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🚀 Server listening on http://{}", addr);
    info!("   - Visitor API available at http://{}/api/visitor-ip", addr);
    info!("   - Frontend UI available at http://{}/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
