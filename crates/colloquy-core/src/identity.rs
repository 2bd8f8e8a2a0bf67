//! Opaque session identity supplied by the external identity provider.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ColloquyError, Result};

/// Identifier scoping which conversation and history belong to whom.
///
/// Colloquy never interprets the value. It is only passed along to history
/// retrieval and request construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionIdentity(String);

impl SessionIdentity {
    /// Wrap a provider-issued identifier. Blank values are rejected.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ColloquyError::Identity(
                "session identity must not be empty".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionIdentity {
    type Error = ColloquyError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SessionIdentity> for String {
    fn from(identity: SessionIdentity) -> Self {
        identity.0
    }
}

impl fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
