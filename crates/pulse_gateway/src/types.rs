//! Request and response bodies for the HTTP boundary.

use serde::{Deserialize, Serialize};

/// Body of `POST /score`. Carries either a list of free-text answers or a
/// single chat-event message; serde rejects anything that isn't a list of
/// strings for `answers`, so the core never sees malformed input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoreRequest {
    pub answers: Option<Vec<String>>,
    pub user: Option<String>,
    pub nickname: Option<String>,
    /// Either flag marks a chat-event submission.
    pub chat: Option<bool>,
    pub event: Option<String>,
    pub message: Option<String>,
}

impl ScoreRequest {
    pub fn is_chat(&self) -> bool {
        self.chat.unwrap_or(false) || self.event.as_deref() == Some("chat")
    }
}

/// Acknowledgment returned while the chat buffer is still filling.
#[derive(Debug, Clone, Serialize)]
pub struct QueuedBody {
    pub status: &'static str,
    pub count: u32,
    pub threshold: u32,
}

impl QueuedBody {
    pub fn new(count: u32, threshold: u32) -> Self {
        Self {
            status: "queued",
            count,
            threshold,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
