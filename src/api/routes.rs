use axum::{http::Method, http::Uri, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::FrontendConfig;
use crate::storage::VisitStore;
use crate::visitor::GeoIpService;

use super::handlers::{health_check, visitor_ip, visitor_markers, AppState};
use super::static_files::serve_static;

pub fn create_api_router(
    visit_log: Arc<dyn VisitStore>,
    geoip: Option<Arc<GeoIpService>>,
    frontend: FrontendConfig,
) -> Router {
    let state = Arc::new(AppState { visit_log, geoip });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    let api_routes = Router::new()
        .route("/visitor-ip", get(visitor_ip))
        .route("/visitor-markers", get(visitor_markers))
        .layer(cors);

    let static_dir = frontend.static_dir;

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .fallback(move |uri: Uri| serve_static(uri, static_dir.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
