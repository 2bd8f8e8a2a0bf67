//! Ordered message log for a single conversation.
//!
//! Append-only, except for `truncate_from` which edit-resend uses to drop
//! everything after a revised query.

use chrono::Utc;

use crate::error::ChatError;
use crate::types::Turn;

/// The ordered sequence of turns owned by one session.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    turns: Vec<Turn>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a turn at the end and return its index.
    pub fn append(&mut self, turn: Turn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    /// Remove every turn at or after `index`.
    ///
    /// `index == len()` is a no-op. Anything beyond fails with `OutOfRange`
    /// and leaves the log untouched.
    pub fn truncate_from(&mut self, index: usize) -> Result<(), ChatError> {
        if index > self.turns.len() {
            return Err(ChatError::OutOfRange {
                index,
                len: self.turns.len(),
            });
        }
        self.turns.truncate(index);
        Ok(())
    }

    /// Replace the content of the user turn at `index`, refreshing its timestamp.
    pub fn replace_at(
        &mut self,
        index: usize,
        new_content: impl Into<String>,
    ) -> Result<(), ChatError> {
        let len = self.turns.len();
        let turn = self
            .turns
            .get_mut(index)
            .ok_or(ChatError::OutOfRange { index, len })?;
        if !turn.is_user() {
            return Err(ChatError::InvalidRole {
                index,
                role: turn.role,
            });
        }
        turn.content = new_content.into();
        turn.created_at = Utc::now();
        Ok(())
    }

    /// Read-only view of the whole conversation in order.
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    pub fn get(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index)
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn make_log(contents: &[(Role, &str)]) -> MessageLog {
        let mut log = MessageLog::new();
        for (role, content) in contents {
            let turn = match role {
                Role::User => Turn::user(*content),
                Role::Assistant => Turn::assistant(*content, None, None),
            };
            log.append(turn);
        }
        log
    }

    fn contents(log: &MessageLog) -> Vec<&str> {
        log.all().iter().map(|t| t.content.as_str()).collect()
    }

    // ---- append ----

    #[test]
    fn test_append_returns_sequential_indices() {
        let mut log = MessageLog::new();
        assert_eq!(log.append(Turn::user("a")), 0);
        assert_eq!(log.append(Turn::assistant("b", None, None)), 1);
        assert_eq!(log.append(Turn::user("c")), 2);
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut log = MessageLog::new();
        for i in 0..25 {
            log.append(Turn::user(format!("q{}", i)));
        }
        assert_eq!(log.len(), 25);
        for (i, turn) in log.all().iter().enumerate() {
            assert_eq!(turn.content, format!("q{}", i));
        }
    }

    #[test]
    fn test_new_log_is_empty() {
        let log = MessageLog::new();
        assert!(log.is_empty());
        assert!(log.all().is_empty());
        assert!(log.last().is_none());
    }

    // ---- truncate_from ----

    #[test]
    fn test_truncate_from_middle() {
        let mut log = make_log(&[
            (Role::User, "a"),
            (Role::Assistant, "b"),
            (Role::User, "c"),
            (Role::Assistant, "d"),
        ]);
        log.truncate_from(1).unwrap();
        assert_eq!(contents(&log), vec!["a"]);
    }

    #[test]
    fn test_truncate_from_zero_clears() {
        let mut log = make_log(&[(Role::User, "a"), (Role::Assistant, "b")]);
        log.truncate_from(0).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_truncate_at_length_is_noop() {
        let mut log = make_log(&[(Role::User, "a"), (Role::Assistant, "b")]);
        log.truncate_from(2).unwrap();
        assert_eq!(contents(&log), vec!["a", "b"]);
    }

    #[test]
    fn test_truncate_beyond_length_leaves_log_unchanged() {
        let mut log = make_log(&[(Role::User, "a")]);
        let err = log.truncate_from(5).unwrap_err();
        assert!(matches!(err, ChatError::OutOfRange { index: 5, len: 1 }));
        assert_eq!(contents(&log), vec!["a"]);
    }

    #[test]
    fn test_truncate_length_is_min_of_index_and_len() {
        for i in 0..=4 {
            let mut log = make_log(&[
                (Role::User, "a"),
                (Role::Assistant, "b"),
                (Role::User, "c"),
                (Role::Assistant, "d"),
            ]);
            let _ = log.truncate_from(i);
            assert_eq!(log.len(), i.min(4));
        }
    }

    // ---- replace_at ----

    #[test]
    fn test_replace_at_user_turn() {
        let mut log = make_log(&[(Role::User, "Hi"), (Role::Assistant, "Hello")]);
        let before = log.get(0).unwrap().created_at;
        log.replace_at(0, "Hi there").unwrap();
        let turn = log.get(0).unwrap();
        assert_eq!(turn.content, "Hi there");
        assert_eq!(turn.role, Role::User);
        assert!(turn.created_at >= before);
        // Neighbour untouched
        assert_eq!(log.get(1).unwrap().content, "Hello");
    }

    #[test]
    fn test_replace_at_assistant_turn_is_invalid_role() {
        let mut log = make_log(&[(Role::User, "Hi"), (Role::Assistant, "Hello")]);
        let err = log.replace_at(1, "nope").unwrap_err();
        assert!(matches!(
            err,
            ChatError::InvalidRole {
                index: 1,
                role: Role::Assistant
            }
        ));
        assert_eq!(log.get(1).unwrap().content, "Hello");
    }

    #[test]
    fn test_replace_at_out_of_range() {
        let mut log = make_log(&[(Role::User, "Hi")]);
        let err = log.replace_at(1, "nope").unwrap_err();
        assert!(matches!(err, ChatError::OutOfRange { index: 1, len: 1 }));
    }

    #[test]
    fn test_replace_at_keeps_answer_metadata_fields() {
        let mut log = MessageLog::new();
        log.append(Turn::user("q"));
        log.replace_at(0, "q2").unwrap();
        let turn = log.get(0).unwrap();
        assert!(turn.confidence.is_none());
        assert!(turn.source_query.is_none());
    }
}
