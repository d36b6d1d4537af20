use crate::common::{BackendCommand, BackendEvent, ChatMessage, SessionSummary};

pub const DEFAULT_SESSION_LABEL: &str = "New conversation";
pub const ASK_FAILED_TEXT: &str = "Error communicating with the server.";
pub const MISSING_FIELDS_TEXT: &str = "Please fill in all fields";
pub const BAD_CREDENTIALS_TEXT: &str = "Incorrect credentials";
pub const REGISTER_FAILED_TEXT: &str =
    "Registration failed. That email may already be in use.";
pub const DELETE_FAILED_TEXT: &str = "Failed to delete the conversation.";

/// UI state plus the controller transitions over it. Methods return the
/// backend commands a transition wants issued; the app forwards them to the
/// command channel, which keeps every transition testable without a network.
pub struct AppState {
    pub messages: Vec<ChatMessage>,
    pub input_text: String,
    pub sessions: Vec<SessionSummary>,
    pub current_session_id: Option<String>,

    pub sidebar_open: bool,
    pub dark_theme: bool,

    pub logged_in: bool,
    pub user_name: String,
    pub user_email: String,

    pub show_login_form: bool,
    pub registering: bool,
    pub login_email: String,
    pub login_password: String,
    pub register_username: String,
    pub register_email: String,
    pub register_password: String,
    pub auth_error: String,

    /// Question stashed while a session is being created for it.
    pub pending_question: Option<String>,
    /// Session awaiting delete confirmation.
    pub pending_delete: Option<String>,
    /// Blocking error dialog text, if any.
    pub last_error: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            input_text: String::new(),
            sessions: Vec::new(),
            current_session_id: None,
            sidebar_open: true,
            dark_theme: false,
            logged_in: false,
            user_name: String::new(),
            user_email: String::new(),
            show_login_form: false,
            registering: false,
            login_email: String::new(),
            login_password: String::new(),
            register_username: String::new(),
            register_email: String::new(),
            register_password: String::new(),
            auth_error: String::new(),
            pending_question: None,
            pending_delete: None,
            last_error: None,
        }
    }

    // --- local-only toggles ---

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Theme is the one UI flag that persists across launches.
    pub fn toggle_theme(&mut self) -> Vec<BackendCommand> {
        self.dark_theme = !self.dark_theme;
        let name = if self.dark_theme { "dark" } else { "light" };
        vec![BackendCommand::SetTheme { name: name.into() }]
    }

    pub fn open_login_form(&mut self) {
        self.show_login_form = true;
        self.registering = false;
        self.auth_error.clear();
    }

    pub fn close_login_form(&mut self) {
        self.show_login_form = false;
        self.auth_error.clear();
    }

    pub fn toggle_register(&mut self) {
        self.registering = !self.registering;
        self.auth_error.clear();
    }

    // --- commands ---

    /// Blank input is a no-op. Unauthenticated sends open the login form
    /// without touching the backend. With no active session the question is
    /// stashed and a session created first; the stashed question is sent once
    /// the session exists. Otherwise the user message is appended
    /// optimistically and the question goes out.
    pub fn send_message(&mut self) -> Vec<BackendCommand> {
        let question = self.input_text.trim().to_string();
        if question.is_empty() {
            return Vec::new();
        }

        if !self.logged_in {
            self.open_login_form();
            return Vec::new();
        }

        self.messages.push(ChatMessage::from_user(question.clone()));
        self.input_text.clear();

        match &self.current_session_id {
            Some(session_id) => vec![BackendCommand::Ask {
                session_id: session_id.clone(),
                question,
            }],
            None => {
                self.pending_question = Some(question);
                vec![BackendCommand::CreateSession {
                    label: DEFAULT_SESSION_LABEL.into(),
                }]
            }
        }
    }

    pub fn start_new_session(&mut self) -> Vec<BackendCommand> {
        self.messages.clear();
        self.current_session_id = None;

        if !self.logged_in {
            self.open_login_form();
            return Vec::new();
        }

        vec![BackendCommand::CreateSession {
            label: DEFAULT_SESSION_LABEL.into(),
        }]
    }

    pub fn select_session(&mut self, session_id: String) -> Vec<BackendCommand> {
        self.current_session_id = Some(session_id.clone());
        self.messages.clear();
        vec![BackendCommand::FetchHistory { session_id }]
    }

    /// Deletion goes through a confirmation dialog first.
    pub fn request_delete(&mut self, session_id: String) {
        self.pending_delete = Some(session_id);
    }

    pub fn confirm_delete(&mut self) -> Vec<BackendCommand> {
        match self.pending_delete.take() {
            Some(session_id) => vec![BackendCommand::DeleteSession { session_id }],
            None => Vec::new(),
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn submit_login(&mut self) -> Vec<BackendCommand> {
        if self.login_email.is_empty() || self.login_password.is_empty() {
            self.auth_error = MISSING_FIELDS_TEXT.into();
            return Vec::new();
        }
        vec![BackendCommand::Login {
            email: self.login_email.clone(),
            password: self.login_password.clone(),
        }]
    }

    pub fn submit_register(&mut self) -> Vec<BackendCommand> {
        if self.register_username.is_empty()
            || self.register_email.is_empty()
            || self.register_password.is_empty()
        {
            self.auth_error = MISSING_FIELDS_TEXT.into();
            return Vec::new();
        }
        vec![BackendCommand::Register {
            username: self.register_username.clone(),
            email: self.register_email.clone(),
            password: self.register_password.clone(),
        }]
    }

    pub fn logout(&mut self) -> Vec<BackendCommand> {
        vec![BackendCommand::Logout]
    }

    // --- events ---

    pub fn apply_event(&mut self, event: BackendEvent) -> Vec<BackendCommand> {
        match event {
            BackendEvent::AuthChanged(Some(user)) => {
                self.logged_in = true;
                self.user_name = user.username;
                self.user_email = user.email;
                self.show_login_form = false;
                self.login_email.clear();
                self.login_password.clear();
                self.register_username.clear();
                self.register_email.clear();
                self.register_password.clear();
                self.auth_error.clear();
                vec![BackendCommand::ListSessions]
            }

            BackendEvent::AuthChanged(None) => {
                self.logged_in = false;
                self.user_name.clear();
                self.user_email.clear();
                self.sessions.clear();
                self.messages.clear();
                self.current_session_id = None;
                self.pending_question = None;
                Vec::new()
            }

            BackendEvent::LoginFailed => {
                self.auth_error = BAD_CREDENTIALS_TEXT.into();
                Vec::new()
            }

            // Mirror the original flow: a fresh registration logs itself in.
            BackendEvent::Registered { email, password } => {
                vec![BackendCommand::Login { email, password }]
            }

            BackendEvent::RegisterFailed => {
                self.auth_error = REGISTER_FAILED_TEXT.into();
                Vec::new()
            }

            BackendEvent::Sessions(sessions) => {
                self.sessions = sessions;
                if self.current_session_id.is_none() {
                    if let Some(first) = self.sessions.first() {
                        let id = first.id.clone();
                        return self.select_session(id);
                    }
                }
                Vec::new()
            }

            BackendEvent::SessionCreated { session_id } => {
                self.current_session_id = Some(session_id.clone());
                let mut commands = vec![BackendCommand::ListSessions];
                if let Some(question) = self.pending_question.take() {
                    commands.push(BackendCommand::Ask {
                        session_id,
                        question,
                    });
                }
                commands
            }

            BackendEvent::SessionCreateFailed => {
                self.pending_question = None;
                self.last_error = Some("Failed to create a conversation.".into());
                Vec::new()
            }

            BackendEvent::History {
                session_id,
                messages,
            } => {
                // Late response for a session we already left: drop it.
                if self.current_session_id.as_deref() == Some(session_id.as_str()) {
                    self.messages = messages;
                }
                Vec::new()
            }

            BackendEvent::HistoryFailed { session_id } => {
                if self.current_session_id.as_deref() == Some(session_id.as_str()) {
                    self.messages.clear();
                }
                Vec::new()
            }

            BackendEvent::Answer {
                session_id,
                message,
            } => {
                if self.current_session_id.as_deref() == Some(session_id.as_str()) {
                    self.messages.push(message);
                    // Titles/previews may have changed server-side.
                    return vec![BackendCommand::ListSessions];
                }
                Vec::new()
            }

            BackendEvent::AskFailed { session_id } => {
                if self.current_session_id.as_deref() == Some(session_id.as_str()) {
                    self.messages
                        .push(ChatMessage::from_bot(ASK_FAILED_TEXT, Vec::new()));
                }
                Vec::new()
            }

            BackendEvent::SessionDeleted { session_id } => {
                if self.current_session_id.as_deref() == Some(session_id.as_str()) {
                    self.messages.clear();
                    self.current_session_id = None;
                }
                vec![BackendCommand::ListSessions]
            }

            BackendEvent::DeleteFailed { .. } => {
                self.last_error = Some(DELETE_FAILED_TEXT.into());
                Vec::new()
            }

            BackendEvent::ThemeLoaded(theme) => {
                if let Some(name) = theme {
                    self.dark_theme = name == "dark";
                }
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::common::{Sender, UserProfile};

    use super::*;

    fn logged_in_state() -> AppState {
        let mut state = AppState::new();
        state.apply_event(BackendEvent::AuthChanged(Some(UserProfile {
            username: "alice".into(),
            email: "alice@example.com".into(),
        })));
        state
    }

    fn summary(id: &str) -> SessionSummary {
        SessionSummary {
            id: id.into(),
            label: format!("Chat {id}"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn blank_input_is_a_no_op() {
        let mut state = logged_in_state();
        state.input_text = "   ".into();

        let commands = state.send_message();

        assert!(commands.is_empty());
        assert!(state.messages.is_empty());
        assert!(!state.show_login_form);
    }

    #[test]
    fn unauthenticated_send_opens_login_form_without_backend_call() {
        let mut state = AppState::new();
        state.input_text = "hello".into();

        let commands = state.send_message();

        assert!(commands.is_empty());
        assert!(state.show_login_form);
        assert!(state.messages.is_empty());
        // Keep the draft so nothing is lost across the login.
        assert_eq!(state.input_text, "hello");
    }

    #[test]
    fn send_appends_optimistically_and_asks() {
        let mut state = logged_in_state();
        state.current_session_id = Some("s1".into());
        state.input_text = "  why is the sky blue?  ".into();

        let commands = state.send_message();

        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].sender, Sender::User);
        assert_eq!(state.messages[0].text, "why is the sky blue?");
        assert!(state.input_text.is_empty());
        assert!(matches!(
            &commands[..],
            [BackendCommand::Ask { session_id, question }]
                if session_id == "s1" && question == "why is the sky blue?"
        ));
    }

    #[test]
    fn send_without_session_creates_one_then_resends() {
        let mut state = logged_in_state();
        state.input_text = "first question".into();

        let commands = state.send_message();
        assert!(matches!(&commands[..], [BackendCommand::CreateSession { .. }]));
        assert_eq!(state.pending_question.as_deref(), Some("first question"));

        let follow_up = state.apply_event(BackendEvent::SessionCreated {
            session_id: "s9".into(),
        });
        assert_eq!(state.current_session_id.as_deref(), Some("s9"));
        assert!(state.pending_question.is_none());
        assert!(matches!(
            &follow_up[..],
            [
                BackendCommand::ListSessions,
                BackendCommand::Ask { session_id, question }
            ] if session_id == "s9" && question == "first question"
        ));
    }

    #[test]
    fn auth_change_triggers_session_load_and_closes_form() {
        let mut state = AppState::new();
        state.show_login_form = true;
        state.login_email = "alice@example.com".into();
        state.login_password = "secret".into();

        let commands = state.apply_event(BackendEvent::AuthChanged(Some(UserProfile {
            username: "alice".into(),
            email: "alice@example.com".into(),
        })));

        assert!(state.logged_in);
        assert_eq!(state.user_name, "alice");
        assert!(!state.show_login_form);
        assert!(state.login_email.is_empty() && state.login_password.is_empty());
        assert!(matches!(&commands[..], [BackendCommand::ListSessions]));
    }

    #[test]
    fn logout_event_empties_sessions_and_thread() {
        let mut state = logged_in_state();
        state.sessions = vec![summary("s1")];
        state.current_session_id = Some("s1".into());
        state.messages.push(ChatMessage::from_user("hi"));

        let commands = state.apply_event(BackendEvent::AuthChanged(None));

        assert!(commands.is_empty());
        assert!(!state.logged_in);
        assert!(state.sessions.is_empty());
        assert!(state.messages.is_empty());
        assert_eq!(state.current_session_id, None);
    }

    #[test]
    fn empty_credentials_are_rejected_locally() {
        let mut state = AppState::new();
        assert!(state.submit_login().is_empty());
        assert_eq!(state.auth_error, MISSING_FIELDS_TEXT);

        state.auth_error.clear();
        assert!(state.submit_register().is_empty());
        assert_eq!(state.auth_error, MISSING_FIELDS_TEXT);
    }

    #[test]
    fn registration_chains_into_login() {
        let mut state = AppState::new();
        let commands = state.apply_event(BackendEvent::Registered {
            email: "bob@example.com".into(),
            password: "hunter2".into(),
        });
        assert!(matches!(
            &commands[..],
            [BackendCommand::Login { email, .. }] if email == "bob@example.com"
        ));
    }

    #[test]
    fn history_replaces_thread_in_order() {
        let mut state = logged_in_state();
        let commands = state.select_session("s1".into());
        assert!(matches!(
            &commands[..],
            [BackendCommand::FetchHistory { session_id }] if session_id == "s1"
        ));
        assert!(state.messages.is_empty());

        state.apply_event(BackendEvent::History {
            session_id: "s1".into(),
            messages: vec![
                ChatMessage::from_user("hi"),
                ChatMessage::from_bot("hello", Vec::new()),
            ],
        });

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[0].sender, Sender::User);
        assert_eq!(state.messages[1].sender, Sender::Bot);
    }

    #[test]
    fn stale_history_for_another_session_is_dropped() {
        let mut state = logged_in_state();
        state.select_session("s2".into());

        state.apply_event(BackendEvent::History {
            session_id: "s1".into(),
            messages: vec![ChatMessage::from_user("old")],
        });

        assert!(state.messages.is_empty());
    }

    #[test]
    fn failed_ask_appends_fallback_bot_message() {
        let mut state = logged_in_state();
        state.current_session_id = Some("s1".into());

        state.apply_event(BackendEvent::AskFailed {
            session_id: "s1".into(),
        });

        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].sender, Sender::Bot);
        assert_eq!(state.messages[0].text, ASK_FAILED_TEXT);
    }

    #[test]
    fn answer_appends_and_refreshes_list() {
        let mut state = logged_in_state();
        state.current_session_id = Some("s1".into());

        let commands = state.apply_event(BackendEvent::Answer {
            session_id: "s1".into(),
            message: ChatMessage::from_bot("42", vec!["manual.pdf".into()]),
        });

        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].sources, vec!["manual.pdf".to_string()]);
        assert!(matches!(&commands[..], [BackendCommand::ListSessions]));
    }

    #[test]
    fn deleting_active_session_clears_thread() {
        let mut state = logged_in_state();
        state.current_session_id = Some("s1".into());
        state.messages.push(ChatMessage::from_user("hi"));

        state.request_delete("s1".into());
        let commands = state.confirm_delete();
        assert!(matches!(
            &commands[..],
            [BackendCommand::DeleteSession { session_id }] if session_id == "s1"
        ));

        let follow_up = state.apply_event(BackendEvent::SessionDeleted {
            session_id: "s1".into(),
        });
        assert!(state.messages.is_empty());
        assert_eq!(state.current_session_id, None);
        assert!(matches!(&follow_up[..], [BackendCommand::ListSessions]));
    }

    #[test]
    fn deleting_other_session_leaves_thread_untouched() {
        let mut state = logged_in_state();
        state.current_session_id = Some("s1".into());
        state.messages.push(ChatMessage::from_user("hi"));

        state.apply_event(BackendEvent::SessionDeleted {
            session_id: "s2".into(),
        });

        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.current_session_id.as_deref(), Some("s1"));
    }

    #[test]
    fn cancelled_delete_sends_nothing() {
        let mut state = logged_in_state();
        state.request_delete("s1".into());
        state.cancel_delete();
        assert!(state.confirm_delete().is_empty());
    }

    #[test]
    fn first_session_auto_selected_when_none_current() {
        let mut state = logged_in_state();

        let commands = state.apply_event(BackendEvent::Sessions(vec![
            summary("s1"),
            summary("s2"),
        ]));

        assert_eq!(state.current_session_id.as_deref(), Some("s1"));
        assert!(matches!(
            &commands[..],
            [BackendCommand::FetchHistory { session_id }] if session_id == "s1"
        ));
    }

    #[test]
    fn session_refresh_keeps_current_selection() {
        let mut state = logged_in_state();
        state.current_session_id = Some("s2".into());

        let commands = state.apply_event(BackendEvent::Sessions(vec![
            summary("s1"),
            summary("s2"),
        ]));

        assert!(commands.is_empty());
        assert_eq!(state.current_session_id.as_deref(), Some("s2"));
    }

    #[test]
    fn theme_toggle_persists_choice() {
        let mut state = AppState::new();
        let commands = state.toggle_theme();
        assert!(state.dark_theme);
        assert!(matches!(
            &commands[..],
            [BackendCommand::SetTheme { name }] if name == "dark"
        ));

        state.apply_event(BackendEvent::ThemeLoaded(Some("light".into())));
        assert!(!state.dark_theme);
    }

    #[test]
    fn start_new_session_requires_login() {
        let mut state = AppState::new();
        state.messages.push(ChatMessage::from_bot("hi", Vec::new()));

        let commands = state.start_new_session();

        assert!(commands.is_empty());
        assert!(state.messages.is_empty());
        assert!(state.show_login_form);
    }
}
