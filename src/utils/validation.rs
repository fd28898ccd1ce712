// Validation utilities
use crate::error::{Error, Result};
use std::net::IpAddr;
use tracing::warn;
use url::Url;

// Ports that never serve recipe pages
const BLOCKED_PORTS: &[u16] = &[
    22,    // SSH
    23,    // Telnet
    25,    // SMTP
    3306,  // MySQL
    5432,  // PostgreSQL
    6379,  // Redis
    27017, // MongoDB
];

/// Check if an IP address is in a private range
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            ipv4.is_private() || ipv4.is_link_local() || ipv4.is_loopback()
        }
        IpAddr::V6(ipv6) => {
            ipv6.is_loopback()
                // fe80::/10
                || (ipv6.segments()[0] & 0xffc0) == 0xfe80
                // fc00::/7
                || (ipv6.segments()[0] & 0xfe00) == 0xfc00
        }
    }
}

/// Parse a recipe source URL, requiring an http(s) scheme and a host
pub fn parse_source_url(url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(Error::Validation(format!(
                "URL must use http or https scheme, got {other}"
            )));
        }
    }

    if url.host_str().is_none() {
        return Err(Error::Validation("URL must have a valid host".to_string()));
    }

    Ok(url)
}

/// Validate a recipe source URL that will be fetched on behalf of a client.
///
/// On top of [`parse_source_url`], rejects localhost, loopback, private and
/// link-local addresses and well-known service ports.
pub fn validate_import_url(url_str: &str) -> Result<Url> {
    let url = parse_source_url(url_str)?;
    let host = url
        .host_str()
        .ok_or_else(|| Error::Validation("URL must have a valid host".to_string()))?;

    if host == "localhost" || host == "0.0.0.0" {
        warn!("Security: Blocked localhost import URL: {}", url_str);
        return Err(Error::Validation(
            "Localhost URLs are not allowed".to_string(),
        ));
    }

    let host_for_ip = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = host_for_ip.parse::<IpAddr>() {
        if ip.is_unspecified() || is_private_ip(&ip) {
            warn!("Security: Blocked private import address {} in {}", ip, url_str);
            return Err(Error::Validation(
                "Private and loopback addresses are not allowed".to_string(),
            ));
        }
    }

    if let Some(port) = url.port() {
        if BLOCKED_PORTS.contains(&port) {
            warn!("Security: Blocked restricted port {} in {}", port, url_str);
            return Err(Error::Validation(format!(
                "Port {port} is not allowed for security reasons"
            )));
        }
    }

    Ok(url)
}
