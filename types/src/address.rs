//! Opaque caller/owner identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An identity as seen by the custody core: an owner, a recipient, or the
/// wallet itself.
///
/// Identities arrive already authenticated by the host environment; the core
/// never inspects them beyond equality and emptiness. The empty string is the
/// "null" identity and is rejected wherever an operation requires a real one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create an address from a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The null identity.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the null identity.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
