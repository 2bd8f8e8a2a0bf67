//! Export seam for finished answers.
//!
//! Rendering (PDF, text, ...) belongs to an external [`ExportAdapter`]; this
//! module only guarantees a well-formed record for any assistant turn.

use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::types::Turn;

/// Everything an exporter needs to render one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Query that produced the answer. Absent for connectivity fallbacks.
    pub query: Option<String>,
    pub response: String,
    pub confidence: Option<u8>,
}

impl ExportRecord {
    /// Build the record for an assistant turn at `index`.
    pub fn from_turn(index: usize, turn: &Turn) -> Result<Self, ChatError> {
        if !turn.is_assistant() {
            return Err(ChatError::InvalidRole {
                index,
                role: turn.role,
            });
        }
        Ok(Self {
            query: turn.source_query.clone(),
            response: turn.content.clone(),
            confidence: turn.confidence,
        })
    }

    /// Suggested artifact name for the turn at `index` (1-based in the name).
    pub fn file_stem(index: usize) -> String {
        format!("ai-response-{}", index + 1)
    }

    /// Artifact name for the history entry at `index` of a fetched listing.
    pub fn history_file_stem(index: usize) -> String {
        format!("history-response-{}", index + 1)
    }
}

/// Turns an [`ExportRecord`] into a downloadable artifact.
pub trait ExportAdapter {
    type Artifact;

    fn render(&self, record: &ExportRecord) -> Result<Self::Artifact, ChatError>;
}
