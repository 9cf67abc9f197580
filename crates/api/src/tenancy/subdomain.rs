//! Subdomain validation and the reserved-name denylist
//!
//! One implementation gates both tenant resolution and self-service signup,
//! so the two can never drift apart on what counts as a claimable label.

/// Reserved subdomains that can never be claimed by a church
pub const RESERVED_SUBDOMAINS: &[&str] = &[
    "www",
    "api",
    "admin",
    "app",
    "mail",
    "signup",
    "login",
    "auth",
    "stripe",
    "webhooks",
    "help",
    "support",
    "status",
    "docs",
    "cdn",
    "static",
    "staging",
    "demo",
];

/// Minimum subdomain label length
pub const SUBDOMAIN_MIN_LEN: usize = 3;

/// Maximum subdomain label length
pub const SUBDOMAIN_MAX_LEN: usize = 30;

/// Whether a label is usable as a church subdomain.
///
/// Usable means: after lowercasing, 3-30 characters from `[a-z0-9-]`, and
/// not on the reserved list. Case-insensitive by construction ("Admin" is
/// rejected exactly like "admin").
pub fn is_valid_subdomain(label: &str) -> bool {
    let label = label.to_lowercase();

    if label.len() < SUBDOMAIN_MIN_LEN || label.len() > SUBDOMAIN_MAX_LEN {
        return false;
    }
    if !label
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return false;
    }

    !RESERVED_SUBDOMAINS.contains(&label.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_subdomains() {
        assert!(is_valid_subdomain("grace"));
        assert!(is_valid_subdomain("first-baptist"));
        assert!(is_valid_subdomain("stmarys2"));
        assert!(is_valid_subdomain("abc")); // exactly 3
        assert!(is_valid_subdomain(&"a".repeat(30))); // exactly 30
    }

    #[test]
    fn test_length_bounds() {
        assert!(!is_valid_subdomain(""));
        assert!(!is_valid_subdomain("ab")); // 2 chars
        assert!(!is_valid_subdomain(&"a".repeat(31))); // 31 chars
    }

    #[test]
    fn test_invalid_characters() {
        assert!(!is_valid_subdomain("first_baptist"));
        assert!(!is_valid_subdomain("grace.church"));
        assert!(!is_valid_subdomain("grace church"));
        assert!(!is_valid_subdomain("héllo"));
    }

    #[test]
    fn test_uppercase_is_folded_not_rejected() {
        assert!(is_valid_subdomain("Grace"));
        assert!(is_valid_subdomain("FIRST-BAPTIST"));
    }

    #[test]
    fn test_reserved_names_rejected_any_case() {
        for name in RESERVED_SUBDOMAINS {
            assert!(!is_valid_subdomain(name), "{name} should be reserved");
        }
        assert!(!is_valid_subdomain("Admin"));
        assert!(!is_valid_subdomain("WWW"));
        assert!(!is_valid_subdomain("Stripe"));
    }
}
