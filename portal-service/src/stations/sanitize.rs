use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use url::Url;

const BLOCKED_HOSTNAMES: &[&str] = &["localhost", "localhost.", "127.0.0.1", "::1"];
const BLOCKED_SUFFIXES: &[&str] = &[
    ".localhost",
    ".local",
    ".localdomain",
    ".home.arpa",
    ".internal",
    ".intranet",
];

/// Normalizes a station stream endpoint. Streams must be absolute http(s)
/// URLs on a public host; plain `http` is upgraded unless insecure
/// transports are allowed.
pub fn sanitize_stream_url(raw_url: &str, allow_insecure: bool) -> Option<String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = if trimmed.starts_with("//") {
        format!("https:{trimmed}")
    } else {
        trimmed.to_string()
    };

    let mut parsed = Url::parse(&normalized).ok()?;
    if parsed.host_str().is_none_or(is_blocked_hostname) {
        return None;
    }

    match parsed.scheme() {
        "https" => Some(parsed.to_string()),
        "http" if allow_insecure => Some(parsed.to_string()),
        "http" => {
            parsed.set_scheme("https").ok()?;
            Some(parsed.to_string())
        }
        _ => None,
    }
}

/// Images are either site-relative paths (`/radios/lima.png`, served by the
/// frontend) or absolute http(s) URLs.
pub fn sanitize_asset_url(raw_url: &str) -> Option<String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('/') && !trimmed.starts_with("//") {
        if trimmed.contains("..") || trimmed.chars().any(char::is_whitespace) {
            return None;
        }
        return Some(trimmed.to_string());
    }
    let parsed = Url::parse(trimmed).ok()?;
    match parsed.scheme() {
        "https" | "http" if parsed.host_str().is_some() => Some(parsed.to_string()),
        _ => None,
    }
}

fn is_blocked_hostname(hostname: &str) -> bool {
    let normalized = hostname
        .trim_matches(|c| c == '[' || c == ']')
        .to_ascii_lowercase();
    if normalized.is_empty() || BLOCKED_HOSTNAMES.contains(&normalized.as_str()) {
        return true;
    }
    if BLOCKED_SUFFIXES
        .iter()
        .any(|suffix| normalized.ends_with(suffix))
    {
        return true;
    }

    match normalized.parse::<IpAddr>() {
        Ok(IpAddr::V4(addr)) => is_private_v4(&addr),
        Ok(IpAddr::V6(addr)) => is_private_v6(&addr),
        // single-label names only resolve on a local network
        Err(_) => !normalized.contains('.'),
    }
}

fn is_private_v4(addr: &Ipv4Addr) -> bool {
    addr.is_private()
        || addr.is_loopback()
        || addr.is_link_local()
        || addr.is_unspecified()
        || addr.is_broadcast()
        || addr.is_multicast()
        || addr.is_documentation()
        // carrier-grade NAT 100.64.0.0/10
        || (addr.octets()[0] == 100 && (addr.octets()[1] & 0xc0) == 64)
}

fn is_private_v6(addr: &Ipv6Addr) -> bool {
    if addr.is_loopback() || addr.is_unspecified() || addr.is_multicast() {
        return true;
    }
    if let Some(mapped) = addr.to_ipv4_mapped() {
        return is_private_v4(&mapped);
    }
    let first = addr.segments()[0];
    // unique local fc00::/7 and link local fe80::/10
    (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80
}
