//! Country lookup using a MaxMind GeoLite2/GeoIP2 MMDB
//!
//! Only consulted when the request carries no country header. Any database
//! with country data works (Country or City editions).

use anyhow::{Context, Result};
use maxminddb::{geoip2, Mmap, Reader};
use std::net::IpAddr;
use std::sync::Arc;

/// GeoIP country lookup service
#[derive(Clone)]
pub struct GeoIpService {
    country_reader: Option<Arc<Reader<Mmap>>>,
}

impl GeoIpService {
    /// Create a new GeoIP service from an MMDB file path
    ///
    /// # Arguments
    /// * `country_path` - Optional path to a GeoLite2-Country or GeoLite2-City .mmdb file
    pub fn new(country_path: Option<&str>) -> Result<Self> {
        let country_reader = if let Some(path) = country_path {
            let reader = unsafe { Reader::open_mmap(path) }
                .with_context(|| format!("Failed to open GeoIP database at {}", path))?;
            Some(Arc::new(reader))
        } else {
            None
        };

        Ok(Self { country_reader })
    }

    /// Lookup the ISO country code for an address
    ///
    /// Returns `None` if the address does not parse, the database has no
    /// entry for it, or no database is loaded.
    pub fn lookup_country(&self, ip: &str) -> Option<String> {
        let reader = self.country_reader.as_ref()?;
        let ip = ip.parse::<IpAddr>().ok()?;

        let result = reader.lookup(ip).ok()?;
        let country = result.decode::<geoip2::Country>().ok()??;

        country.country.iso_code.map(|s| s.to_string())
    }
}
