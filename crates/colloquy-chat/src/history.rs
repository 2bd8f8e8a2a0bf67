//! Server-side query history, read-only from the session's point of view.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use colloquy_core::SessionIdentity;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::export::ExportRecord;

/// Server-assigned classification of a historical query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Allowed,
    Blocked,
    /// The service failed while answering.
    Error,
    /// Any verdict this client does not know about.
    #[serde(other)]
    Unknown,
}

/// One past query as stored by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub query: String,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub confidence: Option<u8>,
    pub verdict: Verdict,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Response text. Only allowed entries show one, even if the field is
    /// populated.
    pub fn visible_response(&self) -> Option<&str> {
        match self.verdict {
            Verdict::Allowed => self.response.as_deref(),
            Verdict::Blocked | Verdict::Error | Verdict::Unknown => None,
        }
    }

    /// Confidence, hidden unless allowed.
    pub fn visible_confidence(&self) -> Option<u8> {
        match self.verdict {
            Verdict::Allowed => self.confidence,
            Verdict::Blocked | Verdict::Error | Verdict::Unknown => None,
        }
    }

    /// Export is only permitted for allowed entries that have a response.
    pub fn export_record(&self) -> Option<ExportRecord> {
        let response = self.visible_response()?;
        Some(ExportRecord {
            query: Some(self.query.clone()),
            response: response.to_string(),
            confidence: self.visible_confidence(),
        })
    }
}

/// Source of past queries for one identity.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// All entries belonging to `identity`, newest first.
    async fn fetch(&self, identity: &SessionIdentity) -> Result<Vec<HistoryEntry>, ChatError>;
}

/// In-process [`HistoryStore`], keyed by identity.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    entries: Mutex<HashMap<SessionIdentity, Vec<HistoryEntry>>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a finished query for `identity`.
    pub fn record(
        &self,
        identity: &SessionIdentity,
        entry: HistoryEntry,
    ) -> Result<(), ChatError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ChatError::History(format!("history lock poisoned: {}", e)))?;
        entries.entry(identity.clone()).or_default().push(entry);
        tracing::debug!(identity = %identity, "History entry recorded");
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn fetch(&self, identity: &SessionIdentity) -> Result<Vec<HistoryEntry>, ChatError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| ChatError::History(format!("history lock poisoned: {}", e)))?;
        let mut found = entries.get(identity).cloned().unwrap_or_default();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}
