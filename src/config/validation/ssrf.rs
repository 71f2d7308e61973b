//! SSRF checks for caller-supplied upstream URLs
//!
//! When enabled, a URL that arrives in the credential header may not point at
//! loopback, private, link-local or metadata hosts.

use std::net::{IpAddr, Ipv4Addr};
use url::{Host, Url};

const BLOCKED_HOSTNAMES: &[&str] = &[
    "localhost",
    "metadata",
    "metadata.google.internal",
    "internal",
    "local",
];

/// Reject URLs whose host is private or internal
pub fn check_upstream_host(url: &Url) -> Result<(), String> {
    match url.host() {
        None => Err("upstream URL has no host".to_string()),
        Some(Host::Ipv4(ip)) => check_ip(IpAddr::V4(ip)),
        Some(Host::Ipv6(ip)) => check_ip(IpAddr::V6(ip)),
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            for blocked in BLOCKED_HOSTNAMES {
                if domain == *blocked || domain.ends_with(&format!(".{}", blocked)) {
                    return Err(format!("upstream host '{}' is not allowed", domain));
                }
            }
            // Integer-encoded IPv4, e.g. 2130706433 or 0x7f000001
            if let Some(ip) = parse_encoded_ipv4(&domain) {
                return check_ip(IpAddr::V4(ip));
            }
            Ok(())
        }
    }
}

fn parse_encoded_ipv4(host: &str) -> Option<Ipv4Addr> {
    if let Some(hex) = host.strip_prefix("0x") {
        return u32::from_str_radix(hex, 16).ok().map(Ipv4Addr::from);
    }
    if !host.is_empty() && host.chars().all(|c| c.is_ascii_digit()) {
        return host.parse::<u32>().ok().map(Ipv4Addr::from);
    }
    None
}

fn check_ip(ip: IpAddr) -> Result<(), String> {
    if is_private_or_internal_ip(&ip) {
        Err(format!("upstream address '{}' is private or internal", ip))
    } else {
        Ok(())
    }
}

fn is_private_or_internal_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            ipv4.is_loopback()
                || ipv4.is_private()
                || ipv4.is_link_local()
                || ipv4.is_broadcast()
                || ipv4.is_documentation()
                || ipv4.is_unspecified()
                // 100.64.0.0/10, RFC 6598
                || (ipv4.octets()[0] == 100 && (ipv4.octets()[1] & 0xC0) == 64)
                || ipv4.octets()[0] >= 240
        }
        IpAddr::V6(ipv6) => {
            ipv6.is_loopback()
                || ipv6.is_unspecified()
                || ((ipv6.segments()[0] & 0xfe00) == 0xfc00)
                || ((ipv6.segments()[0] & 0xffc0) == 0xfe80)
                || ipv6
                    .to_ipv4_mapped()
                    .is_some_and(|ipv4| is_private_or_internal_ip(&IpAddr::V4(ipv4)))
        }
    }
}
