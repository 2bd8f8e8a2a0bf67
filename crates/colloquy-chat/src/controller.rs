//! Edit-and-resend controller: the session state machine.
//!
//! Owns the message log and serializes every mutation through one of three
//! states:
//! - Idle -> Editing (start_edit)
//! - Editing -> Idle (cancel_edit)
//! - Idle -> Sending (submit_query)
//! - Editing -> Sending (submit_edit)
//! - Sending -> Idle (resolve, abandon)
//!
//! A request dropped before its reply arrives is resolved as a connectivity
//! failure, so the session never stays stuck in Sending.
//!
//! Submissions that arrive in the wrong state, or with blank text, are
//! refused without touching the log and yield `None`.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use colloquy_core::config::ChatConfig;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::{AskReply, AssistantClient};
use crate::error::{AssistantError, ChatError};
use crate::export::ExportRecord;
use crate::log::MessageLog;
use crate::types::{Turn, WindowEntry};
use crate::window::window;

/// Where the session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Ready for a new query or an edit.
    Idle,
    /// Revising the user turn at `index`; `draft` holds the working text.
    Editing { index: usize, draft: String },
    /// One assistant request is outstanding.
    Sending { request_id: Uuid },
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Editing { .. } => "editing",
            SessionState::Sending { .. } => "sending",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Editing { index, .. } => write!(f, "Editing({})", index),
            SessionState::Sending { .. } => write!(f, "Sending"),
        }
    }
}

/// A dispatched request waiting for the assistant's reply.
///
/// The answer's log position is fixed when the request is issued.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub id: Uuid,
    pub query: String,
    pub window: Vec<WindowEntry>,
    /// Index the assistant turn will occupy once resolved.
    pub anchor: usize,
    pub issued_at: DateTime<Utc>,
}

/// Drives normal sends and edit-resends over a single conversation.
#[derive(Debug)]
pub struct EditResendController {
    log: MessageLog,
    state: SessionState,
    config: ChatConfig,
}

impl EditResendController {
    /// A controller over an empty conversation.
    pub fn new(config: ChatConfig) -> Self {
        Self::with_log(config, MessageLog::new())
    }

    /// A controller resuming an existing conversation.
    pub fn with_log(config: ChatConfig, log: MessageLog) -> Self {
        Self {
            log,
            state: SessionState::Idle,
            config,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Whether a request is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.state, SessionState::Sending { .. })
    }

    /// The context window over the current log.
    pub fn window(&self) -> Vec<WindowEntry> {
        window(self.log.all(), self.config.context_limit)
    }

    /// The edit draft, when editing.
    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            SessionState::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Replace the edit draft. Returns `false` when not editing.
    pub fn set_draft(&mut self, text: impl Into<String>) -> bool {
        match &mut self.state {
            SessionState::Editing { draft, .. } => {
                *draft = text.into();
                true
            }
            _ => false,
        }
    }

    /// Begin revising the user turn at `index`, returning its current content.
    pub fn start_edit(&mut self, index: usize) -> Result<&str, ChatError> {
        if self.state != SessionState::Idle {
            return Err(ChatError::InvalidTransition {
                state: self.state.name(),
                action: "start an edit",
            });
        }
        let turn = self.log.get(index).ok_or(ChatError::OutOfRange {
            index,
            len: self.log.len(),
        })?;
        if !turn.is_user() {
            return Err(ChatError::InvalidRole {
                index,
                role: turn.role,
            });
        }

        let draft = turn.content.clone();
        debug!(index, "Session state: Idle -> Editing");
        self.state = SessionState::Editing { index, draft };
        Ok(self.draft().unwrap_or_default())
    }

    /// Abandon the current edit. The log is left as it was.
    pub fn cancel_edit(&mut self) -> Result<(), ChatError> {
        match self.state {
            SessionState::Editing { index, .. } => {
                debug!(index, "Edit cancelled, session state: Editing -> Idle");
                self.state = SessionState::Idle;
                Ok(())
            }
            _ => Err(ChatError::InvalidTransition {
                state: self.state.name(),
                action: "cancel an edit",
            }),
        }
    }

    /// Append a new user query and dispatch it.
    pub fn submit_query(&mut self, text: &str) -> Option<PendingRequest> {
        if self.state != SessionState::Idle {
            debug!(state = %self.state, "Query refused: session not idle");
            return None;
        }
        let text = text.trim();
        if text.is_empty() {
            debug!("Query refused: empty text");
            return None;
        }

        self.log.append(Turn::user(text));
        Some(self.dispatch_request(text))
    }

    /// Replace the edited user turn with `text`, drop everything after it,
    /// and dispatch the revised query.
    pub fn submit_edit(&mut self, text: &str) -> Result<Option<PendingRequest>, ChatError> {
        let index = match self.state {
            SessionState::Editing { index, .. } => index,
            _ => {
                debug!(state = %self.state, "Edit refused: session not editing");
                return Ok(None);
            }
        };
        let text = text.trim();
        if text.is_empty() {
            debug!(index, "Edit refused: empty text");
            return Ok(None);
        }

        self.log.replace_at(index, text)?;
        if self.log.get(index + 1).is_some_and(Turn::is_assistant) {
            debug!(index = index + 1, "Dropping stale answer to edited query");
        }
        let dropped = self.log.len() - (index + 1);
        self.log.truncate_from(index + 1)?;
        info!(index, dropped, "Edited query, downstream turns removed");

        Ok(Some(self.dispatch_request(text)))
    }

    /// Submit the current draft as the edit.
    pub fn submit_draft(&mut self) -> Result<Option<PendingRequest>, ChatError> {
        let Some(draft) = self.draft().map(str::to_string) else {
            debug!(state = %self.state, "Draft refused: session not editing");
            return Ok(None);
        };
        self.submit_edit(&draft)
    }

    /// Reconcile the outcome of the in-flight request into the log.
    ///
    /// Returns the index of the appended assistant turn.
    pub fn resolve(
        &mut self,
        pending: PendingRequest,
        outcome: Result<AskReply, AssistantError>,
    ) -> Result<usize, ChatError> {
        self.settle(&pending, outcome)
    }

    /// Give up on the in-flight request.
    ///
    /// The answer slot is filled with the connectivity-failure text and the
    /// session returns to Idle.
    pub fn abandon(&mut self, pending: PendingRequest) -> Result<usize, ChatError> {
        self.settle(&pending, Err(AssistantError::Abandoned))
    }

    fn settle(
        &mut self,
        pending: &PendingRequest,
        outcome: Result<AskReply, AssistantError>,
    ) -> Result<usize, ChatError> {
        match self.state {
            SessionState::Sending { request_id } if request_id == pending.id => {}
            _ => return Err(ChatError::StaleRequest(pending.id)),
        }
        debug_assert_eq!(self.log.len(), pending.anchor);

        let turn = match outcome {
            Ok(reply) => {
                let content = reply.content_or(&self.config.no_response_message);
                Turn::assistant(content, reply.score(), Some(pending.query.clone()))
            }
            Err(e) => {
                warn!(request_id = %pending.id, error = %e, "Assistant unreachable");
                Turn::assistant(self.config.connectivity_failure_message.as_str(), None, None)
            }
        };

        let index = self.log.append(turn);
        self.state = SessionState::Idle;
        info!(
            request_id = %pending.id,
            index,
            elapsed_ms = (Utc::now() - pending.issued_at).num_milliseconds(),
            "Request resolved, session state: Sending -> Idle"
        );
        Ok(index)
    }

    /// Send a dispatched request to `client` and resolve it.
    ///
    /// Dropping the returned future before it completes abandons the request.
    pub async fn dispatch(
        &mut self,
        client: &dyn AssistantClient,
        pending: PendingRequest,
    ) -> Result<usize, ChatError> {
        let timeout_secs = self.config.request_timeout_secs;
        let mut in_flight = InFlight {
            controller: self,
            pending,
            settled: false,
        };

        let call = client.ask(&in_flight.pending.query, &in_flight.pending.window);
        let outcome = match timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), call)
                .await
                .unwrap_or(Err(AssistantError::Timeout(secs))),
            None => call.await,
        };

        in_flight.settled = true;
        in_flight.controller.settle(&in_flight.pending, outcome)
    }

    /// Submit a new query and wait for its answer.
    ///
    /// `Ok(None)` means the submission was refused.
    pub async fn send_query(
        &mut self,
        client: &dyn AssistantClient,
        text: &str,
    ) -> Result<Option<usize>, ChatError> {
        match self.submit_query(text) {
            Some(pending) => self.dispatch(client, pending).await.map(Some),
            None => Ok(None),
        }
    }

    /// Submit an edit and wait for the regenerated answer.
    pub async fn send_edit(
        &mut self,
        client: &dyn AssistantClient,
        text: &str,
    ) -> Result<Option<usize>, ChatError> {
        match self.submit_edit(text)? {
            Some(pending) => self.dispatch(client, pending).await.map(Some),
            None => Ok(None),
        }
    }

    /// Export record for the assistant turn at `index`.
    pub fn export_record(&self, index: usize) -> Result<ExportRecord, ChatError> {
        let turn = self.log.get(index).ok_or(ChatError::OutOfRange {
            index,
            len: self.log.len(),
        })?;
        ExportRecord::from_turn(index, turn)
    }

    fn dispatch_request(&mut self, query: &str) -> PendingRequest {
        let pending = PendingRequest {
            id: Uuid::new_v4(),
            query: query.to_string(),
            window: self.window(),
            anchor: self.log.len(),
            issued_at: Utc::now(),
        };
        info!(
            request_id = %pending.id,
            window_len = pending.window.len(),
            "Session state: {} -> Sending",
            self.state
        );
        self.state = SessionState::Sending {
            request_id: pending.id,
        };
        pending
    }
}

/// Abandons its request on drop unless `settled` was set.
struct InFlight<'a> {
    controller: &'a mut EditResendController,
    pending: PendingRequest,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(request_id = %self.pending.id, "Dispatch dropped before reply");
        if let Err(e) = self
            .controller
            .settle(&self.pending, Err(AssistantError::Abandoned))
        {
            debug!(error = %e, "Dropped request already settled");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
