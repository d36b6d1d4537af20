use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message in the thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Bot,
}

/// Domain model for one entry in the active message thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Document names the backend cited for this answer (empty for user messages).
    #[serde(default)]
    pub sources: Vec<String>,
}

impl ChatMessage {
    pub fn from_user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
            sources: Vec::new(),
        }
    }

    pub fn from_bot(text: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            timestamp: Utc::now(),
            sources,
        }
    }
}

/// Cached copy of a backend-owned chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

/// The logged-in user as the client knows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
}
