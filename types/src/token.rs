//! Identifier of an external fungible-token contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The identity of the external token contract a spend request draws from.
///
/// Like [`crate::Address`], this is opaque to the core: it is handed to the
/// external value-transfer primitive unchanged. Empty means "no token" and is
/// rejected at initiation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TokenId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
