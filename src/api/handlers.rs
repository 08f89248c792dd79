use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::storage::VisitStore;
use crate::visitor::{markers, resolve_visitor, GeoIpService, VisitMarker, VisitRecord};

pub struct AppState {
    pub visit_log: Arc<dyn VisitStore>,
    pub geoip: Option<Arc<GeoIpService>>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub visits: usize,
}

/// Record the caller's visit and return every visit, newest first
pub async fn visitor_ip(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<Vec<VisitRecord>> {
    let visitor = resolve_visitor(&headers, state.geoip.as_deref());
    let record = state.visit_log.record(visitor.ip, visitor.country);
    debug!(ip = %record.ip, country = %record.country, "recorded visit");

    Json(state.visit_log.list_newest_first())
}

/// Map markers for every recorded visit, without recording a new one
pub async fn visitor_markers(State(state): State<Arc<AppState>>) -> Json<Vec<VisitMarker>> {
    Json(markers(&state.visit_log.list_newest_first()))
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        visits: state.visit_log.len(),
    })
}
