//! Per-user memory: scored history plus chat-buffer state.

use crate::chat::ChatState;
use crate::tone::ToneCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scored entry in a user's history. Immutable once appended;
/// insertion order is chronological.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub ts: DateTime<Utc>,
    pub message: String,
    pub qscore: i64,
    pub tone: ToneCategory,
}

/// Durable per-user state. Owned exclusively by one user id; created on
/// first interaction, mutated on every subsequent one, never deleted here.
///
/// Serializes to the on-disk JSON document, so every field is explicit and
/// optional fields default; no open-ended dynamic mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMemory {
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_state: Option<ChatState>,
}

impl UserMemory {
    pub fn new(user: &str) -> Self {
        Self {
            user: user.to_string(),
            nickname: None,
            history: Vec::new(),
            chat_state: None,
        }
    }

    /// Nicknames are sticky: a new non-empty value overwrites, anything
    /// else leaves the stored one untouched.
    pub fn apply_nickname(&mut self, nickname: Option<&str>) {
        if let Some(n) = nickname {
            let trimmed = n.trim();
            if !trimmed.is_empty() {
                self.nickname = Some(trimmed.to_string());
            }
        }
    }

    /// The most recent `window` scores, oldest first.
    pub fn recent_scores(&self, window: usize) -> Vec<i64> {
        let start = self.history.len().saturating_sub(window);
        self.history[start..].iter().map(|e| e.qscore).collect()
    }
}
