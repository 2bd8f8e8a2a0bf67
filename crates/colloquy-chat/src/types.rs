//! Shared message-model types for the conversation log.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a turn.
///
/// The question-answering backend spells the assistant role `"ai"`, so that
/// is what goes over the wire. `"assistant"` is still accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(rename = "ai", alias = "assistant")]
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// 0-100, only on assistant turns that came back successfully.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    /// The user query this assistant turn answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_query: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// A user turn stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            confidence: None,
            source_query: None,
            created_at: Utc::now(),
        }
    }

    /// An assistant turn stamped with the current time.
    pub fn assistant(
        content: impl Into<String>,
        confidence: Option<u8>,
        source_query: Option<String>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            confidence,
            source_query,
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Reduce to the shape forwarded upstream.
    pub fn to_window_entry(&self) -> WindowEntry {
        WindowEntry {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// Role/content view of a turn, as sent to the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowEntry {
    pub role: Role,
    pub content: String,
}

impl WindowEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}
