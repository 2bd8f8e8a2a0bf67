//! Conversation session manager for Colloquy.
//!
//! Keeps the ordered message log, derives the bounded context window sent to
//! the assistant, and runs the edit-and-resend state machine that lets a user
//! revise an earlier query and regenerate everything after it.

pub mod client;
pub mod controller;
pub mod error;
pub mod export;
pub mod history;
pub mod log;
pub mod session;
pub mod types;
pub mod window;

pub use client::{AskReply, AskRequest, AssistantClient};
pub use controller::{EditResendController, PendingRequest, SessionState};
pub use error::{AssistantError, ChatError};
pub use export::{ExportAdapter, ExportRecord};
pub use history::{HistoryEntry, HistoryStore, InMemoryHistoryStore, Verdict};
pub use log::MessageLog;
pub use session::ChatSession;
pub use types::{Role, Turn, WindowEntry};
pub use window::{window, DEFAULT_CONTEXT_LIMIT};
