use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::common::{ChatMessage, Sender, SessionSummary};

/// Typed bindings for the chatbot backend's REST endpoints. JSON over HTTP;
/// authenticated calls carry the bearer token, except `/session` and `/ask`
/// which take the token (or nothing) in the body, matching the backend.
pub struct Api {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct CreateSessionResponse {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct SessionsResponse {
    sessions: Vec<SessionDto>,
}

#[derive(Debug, Deserialize)]
struct SessionDto {
    session_id: String,
    label: String,
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    history: Vec<HistoryEntryDto>,
}

#[derive(Debug, Deserialize)]
struct HistoryEntryDto {
    role: String,
    content: String,
    timestamp: String,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: String,
    #[serde(default)]
    sources: Vec<SourceDto>,
}

#[derive(Debug, Deserialize)]
struct SourceDto {
    source: String,
}

impl Api {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), reqwest::Error> {
        self.http
            .post(self.url("/register"))
            .json(&json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Returns the bearer token on valid credentials; invalid credentials
    /// surface as a 401 error.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, reqwest::Error> {
        let response: LoginResponse = self
            .http
            .post(self.url("/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.token)
    }

    /// Returns the new session's id. The backend expects the token in the
    /// body on this endpoint.
    pub async fn create_session(
        &self,
        token: &str,
        label: &str,
    ) -> Result<String, reqwest::Error> {
        let response: CreateSessionResponse = self
            .http
            .post(self.url("/session"))
            .json(&json!({ "token": token, "label": label }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.session_id)
    }

    pub async fn list_sessions(&self, token: &str) -> Result<Vec<SessionSummary>, reqwest::Error> {
        let response: SessionsResponse = self
            .http
            .get(self.url("/sessions"))
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .sessions
            .into_iter()
            .map(|dto| SessionSummary {
                id: dto.session_id,
                label: dto.label,
                created_at: parse_backend_timestamp(&dto.created_at),
            })
            .collect())
    }

    pub async fn history(
        &self,
        token: &str,
        session_id: &str,
    ) -> Result<Vec<ChatMessage>, reqwest::Error> {
        let response: HistoryResponse = self
            .http
            .get(self.url(&format!("/history/{session_id}")))
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.history.into_iter().map(map_history_entry).collect())
    }

    /// Poses a question and returns the bot's reply with any cited sources.
    pub async fn ask(
        &self,
        session_id: &str,
        question: &str,
    ) -> Result<ChatMessage, reqwest::Error> {
        let response: AskResponse = self
            .http
            .post(self.url("/ask"))
            .json(&json!({ "session_id": session_id, "question": question }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut sources: Vec<String> =
            response.sources.into_iter().map(|dto| dto.source).collect();
        sources.dedup();
        Ok(ChatMessage::from_bot(response.answer, sources))
    }

    pub async fn delete_session(
        &self,
        token: &str,
        session_id: &str,
    ) -> Result<(), reqwest::Error> {
        self.http
            .delete(self.url(&format!("/session/{session_id}")))
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

fn map_history_entry(dto: HistoryEntryDto) -> ChatMessage {
    ChatMessage {
        sender: map_sender(&dto.role),
        text: dto.content,
        timestamp: parse_backend_timestamp(&dto.timestamp),
        sources: Vec::new(),
    }
}

/// History roles are `user` or `assistant`; anything unexpected renders as
/// the bot side rather than failing the response.
fn map_sender(role: &str) -> Sender {
    if role == "user" { Sender::User } else { Sender::Bot }
}

/// The backend serializes Mongo datetimes as HTTP-date strings
/// ("Tue, 05 Aug 2025 14:03:00 GMT"); accept RFC 3339 too. A bad timestamp
/// degrades to "now" with a warning instead of poisoning the whole response.
fn parse_backend_timestamp(raw: &str) -> DateTime<Utc> {
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return parsed.with_timezone(&Utc);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }
    log::warn!("Unparseable backend timestamp `{raw}`; substituting now");
    Utc::now()
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn parses_http_date_timestamps() {
        let parsed = parse_backend_timestamp("Tue, 05 Aug 2025 14:03:00 GMT");
        assert_eq!(
            (parsed.year(), parsed.month(), parsed.day(), parsed.hour()),
            (2025, 8, 5, 14)
        );
    }

    #[test]
    fn parses_rfc3339_timestamps() {
        let parsed = parse_backend_timestamp("2025-08-05T14:03:00Z");
        assert_eq!(parsed.minute(), 3);
    }

    #[test]
    fn maps_roles_to_senders() {
        assert_eq!(map_sender("user"), Sender::User);
        assert_eq!(map_sender("assistant"), Sender::Bot);
        assert_eq!(map_sender("system"), Sender::Bot);
    }

    #[test]
    fn deserializes_sessions_payload() {
        let json = r#"{"sessions":[
            {"session_id":"s1","label":"First chat","created_at":"Tue, 05 Aug 2025 14:03:00 GMT"}
        ]}"#;
        let parsed: SessionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.sessions.len(), 1);
        assert_eq!(parsed.sessions[0].session_id, "s1");
    }

    #[test]
    fn deserializes_history_in_order() {
        let json = r#"{"history":[
            {"role":"user","content":"hi","timestamp":"Tue, 05 Aug 2025 14:03:00 GMT"},
            {"role":"assistant","content":"hello","timestamp":"Tue, 05 Aug 2025 14:03:02 GMT"}
        ]}"#;
        let parsed: HistoryResponse = serde_json::from_str(json).unwrap();
        let messages: Vec<ChatMessage> =
            parsed.history.into_iter().map(map_history_entry).collect();
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[0].text, "hi");
        assert_eq!(messages[1].sender, Sender::Bot);
        assert_eq!(messages[1].text, "hello");
    }

    #[test]
    fn ask_sources_are_optional() {
        let parsed: AskResponse = serde_json::from_str(r#"{"answer":"42"}"#).unwrap();
        assert!(parsed.sources.is_empty());

        let parsed: AskResponse = serde_json::from_str(
            r#"{"answer":"42","sources":[{"chunk":"...","source":"manual.pdf"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.sources[0].source, "manual.pdf");
    }
}
