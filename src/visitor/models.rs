//! Data models for visitor tracking

use serde::{Deserialize, Serialize};

/// Placeholder IP when no client address header was present
pub const UNKNOWN_IP: &str = "unknown";

/// Placeholder country when no country signal was available
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Country assigned to loopback visitors
pub const LOCAL_COUNTRY: &str = "Local";

/// A single recorded visit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    /// Resolved client address, or `"unknown"`
    pub ip: String,

    /// ISO alpha-2 code, `"Local"` or `"Unknown"`
    pub country: String,

    /// RFC 3339 UTC timestamp assigned by the server
    pub time: String,
}

/// Client address and country resolved from request headers,
/// before a timestamp is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVisitor {
    pub ip: String,
    pub country: String,
}

/// A visit placed on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitMarker {
    #[serde(flatten)]
    pub record: VisitRecord,

    pub lat: f64,

    pub lng: f64,
}
