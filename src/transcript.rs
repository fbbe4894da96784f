//! Session transcript — the in-process record of one conversation.

use serde::{Deserialize, Serialize};

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One utterance. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Append-only sequence of turns.
///
/// Roles alternate user/assistant by convention; nothing enforces it. The
/// transcript lives in memory only and is cleared wholesale on user command.
/// Durable memory stores are a separate concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn.
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(Turn {
            role,
            content: content.into(),
        });
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Drop every turn.
    pub fn clear(&mut self) {
        self.turns.clear();
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

    #[test]
    fn appends_in_order() {
        let mut transcript = Transcript::new();
        transcript.push(Role::User, "hello");
        transcript.push(Role::Assistant, "hi there");

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.turns()[0].role, Role::User);
        assert_eq!(transcript.last().unwrap().content, "hi there");
    }

    #[test]
    fn clear_is_wholesale() {
        let mut transcript = Transcript::new();
        transcript.push(Role::User, "hello");
        transcript.clear();
        assert!(transcript.is_empty());
    }

    #[test]
    fn roles_serialize_lowercase() {
        let turn = Turn {
            role: Role::Assistant,
            content: "ok".to_string(),
        };
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains("\"assistant\""));
    }
}
