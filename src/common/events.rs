use crate::common::types::{ChatMessage, SessionSummary, UserProfile};

/// Events the backend task sends up to the UI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// Authentication state changed: `Some` after login (or restore at
    /// startup), `None` after logout.
    AuthChanged(Option<UserProfile>),
    LoginFailed,
    /// Registration succeeded; credentials echoed back so the UI can chain
    /// the auto-login.
    Registered {
        email: String,
        password: String,
    },
    RegisterFailed,
    Sessions(Vec<SessionSummary>),
    SessionCreated {
        session_id: String,
    },
    SessionCreateFailed,
    History {
        session_id: String,
        messages: Vec<ChatMessage>,
    },
    HistoryFailed {
        session_id: String,
    },
    Answer {
        session_id: String,
        message: ChatMessage,
    },
    AskFailed {
        session_id: String,
    },
    SessionDeleted {
        session_id: String,
    },
    DeleteFailed {
        session_id: String,
    },
    /// Persisted theme restored at startup, if any.
    ThemeLoaded(Option<String>),
}
