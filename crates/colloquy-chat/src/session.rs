//! A chat session: one conversation bound to one identity.

use chrono::{DateTime, Utc};
use colloquy_core::config::ChatConfig;
use colloquy_core::SessionIdentity;
use uuid::Uuid;

use crate::client::AskRequest;
use crate::controller::{EditResendController, PendingRequest};
use crate::error::ChatError;
use crate::history::{HistoryEntry, HistoryStore};

/// Session-scoped state. Discarded when the session ends.
#[derive(Debug)]
pub struct ChatSession {
    pub id: Uuid,
    pub identity: SessionIdentity,
    pub started_at: DateTime<Utc>,
    pub controller: EditResendController,
}

impl ChatSession {
    /// Open a fresh session with an empty conversation.
    pub fn new(identity: SessionIdentity, config: ChatConfig) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            identity,
            started_at: Utc::now(),
            controller: EditResendController::new(config),
        };
        tracing::info!(
            session_id = %session.id,
            identity = %session.identity,
            "Chat session opened"
        );
        session
    }

    /// Past queries belonging to this session's identity, newest first.
    pub async fn history(
        &self,
        store: &dyn HistoryStore,
    ) -> Result<Vec<HistoryEntry>, ChatError> {
        store.fetch(&self.identity).await
    }

    /// Wire body for a dispatched request, scoped to this session's identity.
    pub fn ask_request(&self, pending: &PendingRequest) -> AskRequest {
        AskRequest::new(&self.identity, &pending.query, &pending.window)
    }
}
