//! Client identity for rate-limit bucketing
//!
//! Best-effort only: the key is a bucket identifier, never a security
//! identity. Honest clients behind one proxy may share a bucket; that
//! imprecision is accepted rather than hidden.

use axum::http::HeaderMap;

/// Extract the rate-limit bucket key for a request.
///
/// Prefers the first `x-forwarded-for` entry (the original client in a proxy
/// chain), then `x-real-ip`, then a shared "unknown" bucket.
pub fn client_key(headers: &HeaderMap) -> String {
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|h| h.to_str().ok()) {
        if let Some(ip) = xff.split(',').next().map(str::trim) {
            if !ip.is_empty() {
                return ip.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|h| h.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    "unknown".to_string()
}
