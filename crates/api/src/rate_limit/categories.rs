//! Abuse categories and their window configurations
//!
//! One named fixed window per category. The table is immutable for the
//! process lifetime; limits are deliberately asymmetric (credential guessing
//! gets a much tighter budget than ordinary API traffic).

use std::time::Duration;

/// A named abuse category guarded by its own rate-limit window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateCategory {
    /// Sign-in attempts
    Auth,
    /// Password reset requests
    PasswordReset,
    /// Generic API traffic
    Api,
    /// Bulk member/giving imports
    BulkImport,
    /// Church self-service signup
    Signup,
    /// Public contact form submissions
    ContactForm,
    /// Support ticket creation
    SupportTicket,
}

/// A fixed-window configuration: at most `max_requests` per `window`
#[derive(Debug, Clone, Copy)]
pub struct WindowConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateCategory {
    /// The category's window configuration.
    pub fn config(self) -> WindowConfig {
        let (max_requests, window) = match self {
            RateCategory::Auth => (5, Duration::from_secs(15 * 60)),
            RateCategory::PasswordReset => (3, Duration::from_secs(60 * 60)),
            RateCategory::Api => (100, Duration::from_secs(60)),
            RateCategory::BulkImport => (10, Duration::from_secs(60 * 60)),
            RateCategory::Signup => (5, Duration::from_secs(60 * 60)),
            RateCategory::ContactForm => (5, Duration::from_secs(15 * 60)),
            RateCategory::SupportTicket => (10, Duration::from_secs(15 * 60)),
        };
        WindowConfig {
            max_requests,
            window,
        }
    }

    /// Stable key segment for store keys and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            RateCategory::Auth => "auth",
            RateCategory::PasswordReset => "password_reset",
            RateCategory::Api => "api",
            RateCategory::BulkImport => "bulk_import",
            RateCategory::Signup => "signup",
            RateCategory::ContactForm => "contact_form",
            RateCategory::SupportTicket => "support_ticket",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_limits() {
        assert_eq!(RateCategory::Auth.config().max_requests, 5);
        assert_eq!(
            RateCategory::Auth.config().window,
            Duration::from_secs(900)
        );
        assert_eq!(RateCategory::PasswordReset.config().max_requests, 3);
        assert_eq!(
            RateCategory::PasswordReset.config().window,
            Duration::from_secs(3600)
        );
        assert_eq!(RateCategory::Api.config().max_requests, 100);
        assert_eq!(RateCategory::Api.config().window, Duration::from_secs(60));
        assert_eq!(RateCategory::BulkImport.config().max_requests, 10);
        assert_eq!(RateCategory::Signup.config().max_requests, 5);
        assert_eq!(RateCategory::ContactForm.config().max_requests, 5);
        assert_eq!(RateCategory::SupportTicket.config().max_requests, 10);
    }

    #[test]
    fn test_key_segments_are_distinct() {
        let all = [
            RateCategory::Auth,
            RateCategory::PasswordReset,
            RateCategory::Api,
            RateCategory::BulkImport,
            RateCategory::Signup,
            RateCategory::ContactForm,
            RateCategory::SupportTicket,
        ];
        let mut seen = std::collections::HashSet::new();
        for category in all {
            assert!(seen.insert(category.as_str()));
        }
    }
}
