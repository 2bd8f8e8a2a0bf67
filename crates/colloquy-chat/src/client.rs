//! Assistant service seam and its wire shapes.
//!
//! Transport is left to the embedding application: anything that can turn a
//! query plus context window into an [`AskReply`] implements
//! [`AssistantClient`].

use async_trait::async_trait;
use colloquy_core::SessionIdentity;
use serde::{Deserialize, Serialize};

use crate::error::AssistantError;
use crate::types::WindowEntry;

/// Remote question-answering service.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Ask `query` with the recent conversation as context.
    ///
    /// `Err` means no reply was obtained at all. A service that answered but
    /// declined reports that through [`AskReply::error`].
    async fn ask(
        &self,
        query: &str,
        history: &[WindowEntry],
    ) -> Result<AskReply, AssistantError>;
}

/// Request body accepted by the `/ask` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskRequest {
    pub topic: String,
    #[serde(rename = "userId")]
    pub user_id: SessionIdentity,
    #[serde(default)]
    pub history: Vec<WindowEntry>,
}

impl AskRequest {
    pub fn new(identity: &SessionIdentity, query: &str, history: &[WindowEntry]) -> Self {
        Self {
            topic: query.to_string(),
            user_id: identity.clone(),
            history: history.to_vec(),
        }
    }
}

/// Reply from the assistant service.
///
/// Either `answer` (with an optional confidence) or `error` is normally set;
/// neither is guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AskReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Echo of the query, when the service includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Set when the service answered as a follow-up using the history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followup_used_history: Option<bool>,
}

impl AskReply {
    pub fn answer(text: impl Into<String>, confidence: Option<i64>) -> Self {
        Self {
            answer: Some(text.into()),
            confidence,
            ..Self::default()
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            error: Some(text.into()),
            ..Self::default()
        }
    }

    /// Text to show as the assistant turn.
    ///
    /// A non-empty answer wins, then a non-empty error, then `fallback`.
    pub fn content_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.answer
            .as_deref()
            .filter(|a| !a.is_empty())
            .or_else(|| self.error.as_deref().filter(|e| !e.is_empty()))
            .unwrap_or(fallback)
    }

    /// Confidence as a 0-100 score. Out-of-range values are dropped.
    pub fn score(&self) -> Option<u8> {
        self.confidence
            .filter(|c| (0..=100).contains(c))
            .and_then(|c| u8::try_from(c).ok())
    }
}
