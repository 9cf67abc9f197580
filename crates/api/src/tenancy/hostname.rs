//! Hostname parsing
//!
//! Pulls the tenant subdomain label out of a raw `Host` value. Pure string
//! work, no I/O, always produces a definite answer.

/// Extract the subdomain label from a host, if it has one.
///
/// The host may carry a `:port` suffix, which is stripped first. Rules:
/// - one label, or the literal "localhost": no subdomain (root domain)
/// - `tenant.localhost`: "tenant" (local subdomain-style development)
/// - three or more labels: the leftmost label
pub fn subdomain_from_host(host: &str) -> Option<String> {
    let host = normalize_host(host);
    let labels: Vec<&str> = host.split('.').collect();

    match labels.as_slice() {
        [] | [_] => None,
        [sub, "localhost"] => Some((*sub).to_string()),
        [sub, _, _, ..] => Some((*sub).to_string()),
        _ => None,
    }
}

/// Normalize a host header value: strip the port, lowercase.
fn normalize_host(host: &str) -> String {
    let host = host.split(':').next().unwrap_or(host);
    host.to_lowercase()
}
