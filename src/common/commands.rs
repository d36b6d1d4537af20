/// Commands the UI sends down to the backend task.
#[derive(Debug, Clone)]
pub enum BackendCommand {
    Register {
        username: String,
        email: String,
        password: String,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    CreateSession {
        label: String,
    },
    ListSessions,
    FetchHistory {
        session_id: String,
    },
    Ask {
        session_id: String,
        question: String,
    },
    DeleteSession {
        session_id: String,
    },
    /// Persist the UI theme choice ("dark" / "light") for the next launch.
    SetTheme {
        name: String,
    },
}
