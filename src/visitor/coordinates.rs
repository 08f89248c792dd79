//! Country-to-coordinate lookup for the visitor map
//!
//! Each supported country maps to a single representative point near its
//! geographic centre. Codes are normalized (trimmed, uppercased) before
//! lookup. Local visitors have no position and are left off the map;
//! everything else without an entry lands on the world-centre placeholder.

use crate::visitor::models::{VisitMarker, VisitRecord};

/// A point on the map in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Placeholder used for unknown or unmapped countries
pub const WORLD_CENTER: Coordinates = Coordinates { lat: 20.0, lng: 0.0 };

const LOCAL: &str = "LOCAL";

#[rustfmt::skip]
const COUNTRY_COORDINATES: &[(&str, f64, f64)] = &[
    ("US", 39.8283, -98.5795),
    ("GB", 54.7024, -3.2766),
    ("CA", 56.1304, -106.3468),
    ("AU", -25.2744, 133.7751),
    ("DE", 51.1657, 10.4515),
    ("FR", 46.2276, 2.2137),
    ("IT", 41.8719, 12.5674),
    ("ES", 40.4637, -3.7492),
    ("NL", 52.1326, 5.2913),
    ("BE", 50.5039, 4.4699),
    ("CH", 46.8182, 8.2275),
    ("AT", 47.5162, 14.5501),
    ("SE", 60.1282, 18.6435),
    ("NO", 60.4720, 8.4689),
    ("DK", 56.2639, 9.5018),
    ("FI", 61.9241, 25.7482),
    ("PL", 51.9194, 19.1451),
    ("JP", 36.2048, 138.2529),
    ("CN", 35.8617, 104.1954),
    ("IN", 20.5937, 78.9629),
    ("BR", -14.2350, -51.9253),
    ("MX", 23.6345, -102.5528),
    ("AR", -38.4161, -63.6167),
    ("ZA", -30.5595, 22.9375),
    ("EG", 26.8206, 30.8025),
    ("NG", 9.0820, 8.6753),
    ("KE", 0.0236, 37.9062),
    ("SG", 1.3521, 103.8198),
    ("MY", 4.2105, 101.9758),
    ("TH", 15.8700, 100.9925),
    ("ID", -0.7893, 113.9213),
    ("PH", 12.8797, 121.7740),
    ("VN", 14.0583, 108.2772),
    ("KR", 35.9078, 127.7669),
    ("NZ", -40.9006, 174.8860),
    ("IE", 53.4129, -8.2439),
    ("PT", 39.3999, -8.2245),
    ("GR", 39.0742, 21.8243),
    ("TR", 38.9637, 35.2433),
    ("RU", 61.5240, 105.3188),
    ("SA", 23.8859, 45.0792),
    ("AE", 23.4241, 53.8478),
    ("IL", 31.0461, 34.8516),
];

/// Trim and uppercase a country code
pub fn normalize_country(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Map position for a country code
///
/// Returns `None` for local visitors, the country's point when known, and
/// [`WORLD_CENTER`] otherwise.
pub fn coordinates_for(code: &str) -> Option<Coordinates> {
    let code = normalize_country(code);
    if code == LOCAL {
        return None;
    }

    let coordinates = COUNTRY_COORDINATES
        .iter()
        .find(|(iso, _, _)| *iso == code)
        .map(|&(_, lat, lng)| Coordinates { lat, lng })
        .unwrap_or(WORLD_CENTER);

    Some(coordinates)
}

/// Place records on the map, keeping their order and skipping local visits
pub fn markers(records: &[VisitRecord]) -> Vec<VisitMarker> {
    records
        .iter()
        .filter_map(|record| {
            coordinates_for(&record.country).map(|Coordinates { lat, lng }| VisitMarker {
                record: record.clone(),
                lat,
                lng,
            })
        })
        .collect()
}
