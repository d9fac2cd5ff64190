//! Origin Firewall
//!
//! Decides whether a request's declared origin may proceed. Requests
//! without an origin (curl, server-to-server) are always allowed; a
//! browser origin must be on the allow-list.
//!
//! This is a plain predicate: no state, no directory access.

/// Reason attached to every denial
pub const ACCESS_DENIED: &str = "Access denied!";

/// Origins allowed when none are configured
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "https://back-end-phonebook.onrender.com",
    "http://localhost:5173",
    "http://localhost:3001",
];

/// Outcome of an origin check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { reason: String },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Fixed allow-list of origins
#[derive(Debug, Clone)]
pub struct OriginFirewall {
    allowed: Vec<String>,
}

impl OriginFirewall {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Decide for a request's `Origin` value
    ///
    /// Matching is exact: scheme, host and port must all agree.
    pub fn decide(&self, origin: Option<&str>) -> Decision {
        let Some(origin) = origin else {
            return Decision::Allow;
        };

        if self.allowed.iter().any(|allowed| allowed == origin) {
            Decision::Allow
        } else {
            Decision::Deny {
                reason: ACCESS_DENIED.to_string(),
            }
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}

impl Default for OriginFirewall {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_ORIGINS)
    }
}
