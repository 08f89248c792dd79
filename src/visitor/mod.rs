//! Visitor resolution
//!
//! Turns request headers into a visitor's address and country, and maps
//! countries onto the world map. Optional GeoIP lookups fill in the country
//! when the edge proxy did not.

pub mod coordinates;
pub mod geoip;
pub mod ip_extractor;
pub mod models;

pub use coordinates::{coordinates_for, markers, Coordinates};
pub use geoip::GeoIpService;
pub use ip_extractor::resolve_visitor;
pub use models::{ResolvedVisitor, VisitMarker, VisitRecord};
