//! Bounded context window sent upstream with every assistant call.

use crate::types::{Turn, WindowEntry};

pub use colloquy_core::config::DEFAULT_CONTEXT_LIMIT;

/// The last `limit` turns, oldest first, reduced to role and content.
///
/// Pure: calling it never touches the conversation.
pub fn window(conversation: &[Turn], limit: usize) -> Vec<WindowEntry> {
    let start = conversation.len().saturating_sub(limit);
    conversation[start..]
        .iter()
        .map(Turn::to_window_entry)
        .collect()
}
