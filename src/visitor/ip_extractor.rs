//! Client IP and country extraction from HTTP headers
//!
//! Headers are consulted in a fixed priority order and the first non-empty
//! value wins:
//! - IP: `cf-connecting-ip`, then the first `x-forwarded-for` hop, then `x-real-ip`
//! - Country: `cf-ipcountry`, then `x-vercel-ip-country`, then GeoIP (if configured)
//!
//! Header contents are not validated. Loopback visitors are always reported
//! with the `"Local"` country.

use axum::http::HeaderMap;
use tracing::debug;

use crate::visitor::geoip::GeoIpService;
use crate::visitor::models::{ResolvedVisitor, LOCAL_COUNTRY, UNKNOWN_COUNTRY, UNKNOWN_IP};

const CF_CONNECTING_IP: &str = "cf-connecting-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";
const CF_IPCOUNTRY: &str = "cf-ipcountry";
const X_VERCEL_IP_COUNTRY: &str = "x-vercel-ip-country";

const LOOPBACK_ADDRS: [&str; 2] = ["::1", "127.0.0.1"];

/// Resolve the visitor's address and country from request headers
///
/// # Arguments
/// * `headers` - HTTP request headers
/// * `geoip` - Optional country database consulted when no country header is set
pub fn resolve_visitor(headers: &HeaderMap, geoip: Option<&GeoIpService>) -> ResolvedVisitor {
    let ip = extract_client_ip(headers);

    let country = if is_loopback(&ip) {
        LOCAL_COUNTRY.to_string()
    } else {
        extract_country(headers)
            .or_else(|| {
                let country = geoip.and_then(|service| service.lookup_country(&ip));
                if let Some(ref code) = country {
                    debug!(ip = %ip, country = %code, "country resolved via GeoIP");
                }
                country
            })
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string())
    };

    ResolvedVisitor { ip, country }
}

/// Extract the client IP address, or `"unknown"` if no header carries one
pub fn extract_client_ip(headers: &HeaderMap) -> String {
    header_value(headers, CF_CONNECTING_IP)
        .map(str::to_string)
        .or_else(|| extract_from_x_forwarded_for(headers))
        .or_else(|| header_value(headers, X_REAL_IP).map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

/// Extract the country code from edge-injected headers
pub fn extract_country(headers: &HeaderMap) -> Option<String> {
    header_value(headers, CF_IPCOUNTRY)
        .or_else(|| header_value(headers, X_VERCEL_IP_COUNTRY))
        .map(str::to_string)
}

/// Whether the address is one of the loopback literals
pub fn is_loopback(ip: &str) -> bool {
    LOOPBACK_ADDRS.contains(&ip)
}

/// The leftmost X-Forwarded-For hop is the originating client
fn extract_from_x_forwarded_for(headers: &HeaderMap) -> Option<String> {
    let xff = header_value(headers, X_FORWARDED_FOR)?;
    let first = xff.split(',').next()?.trim();

    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

/// First value of a header, treating empty and non-ASCII values as absent
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
}
