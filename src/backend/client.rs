use std::error::Error;

use tokio::sync::mpsc;

use crate::common::{BackendCommand, BackendEvent};
use crate::store::{self, ProfileDatabase, SessionStore};

use super::api::Api;

/// Async task that owns the session store and the REST client. Receives
/// commands from the UI, talks to the backend, and reports results as events.
/// Calls are handled one at a time; nothing is retried and no failure is
/// fatal to the task.
pub struct BackendClient {
    api: Api,
    event_sender: mpsc::Sender<BackendEvent>,
    command_receiver: mpsc::Receiver<BackendCommand>,
}

impl BackendClient {
    pub fn new(
        backend_url: String,
        event_sender: mpsc::Sender<BackendEvent>,
        command_receiver: mpsc::Receiver<BackendCommand>,
    ) -> Self {
        Self {
            api: Api::new(backend_url),
            event_sender,
            command_receiver,
        }
    }

    pub async fn run(mut self) -> Result<(), Box<dyn Error>> {
        store::ensure_data_dir()?;
        let mut store = SessionStore::open(ProfileDatabase::new()?)?;
        log::info!("Backend client loop started");

        // Let the UI bootstrap from persisted state before any command.
        match store.theme() {
            Ok(theme) => self.emit(BackendEvent::ThemeLoaded(theme)).await,
            Err(err) => log::warn!("Failed to read persisted theme: {err}"),
        }
        let restored_user = if store.auth().is_authenticated() {
            store.auth().user.clone()
        } else {
            None
        };
        self.emit(BackendEvent::AuthChanged(restored_user)).await;

        while let Some(command) = self.command_receiver.recv().await {
            self.handle_command(command, &mut store).await;
        }

        Ok(())
    }

    async fn handle_command(&mut self, command: BackendCommand, store: &mut SessionStore) {
        match command {
            BackendCommand::Register {
                username,
                email,
                password,
            } => match self.api.register(&username, &email, &password).await {
                Ok(()) => {
                    self.emit(BackendEvent::Registered { email, password }).await;
                }
                Err(err) => {
                    log::error!("Registration failed: {err}");
                    self.emit(BackendEvent::RegisterFailed).await;
                }
            },

            BackendCommand::Login { email, password } => {
                match self.api.login(&email, &password).await {
                    Ok(token) => match store.apply_login(token, &email) {
                        Ok(user) => {
                            self.emit(BackendEvent::AuthChanged(Some(user))).await;
                        }
                        Err(err) => {
                            log::error!("Failed to persist login: {err}");
                            self.emit(BackendEvent::LoginFailed).await;
                        }
                    },
                    Err(err) => {
                        log::error!("Login failed: {err}");
                        self.emit(BackendEvent::LoginFailed).await;
                    }
                }
            }

            BackendCommand::Logout => {
                if let Err(err) = store.clear() {
                    log::error!("Failed to clear persisted credentials: {err}");
                }
                self.emit(BackendEvent::AuthChanged(None)).await;
            }

            BackendCommand::CreateSession { label } => {
                let Some(token) = store.token().map(str::to_string) else {
                    log::warn!("CreateSession without a token; ignoring");
                    self.emit(BackendEvent::SessionCreateFailed).await;
                    return;
                };
                match self.api.create_session(&token, &label).await {
                    Ok(session_id) => {
                        self.emit(BackendEvent::SessionCreated { session_id }).await;
                    }
                    Err(err) => {
                        log::error!("Failed to create session: {err}");
                        self.emit(BackendEvent::SessionCreateFailed).await;
                    }
                }
            }

            BackendCommand::ListSessions => {
                let Some(token) = store.token().map(str::to_string) else {
                    log::warn!("ListSessions without a token; ignoring");
                    return;
                };
                match self.api.list_sessions(&token).await {
                    Ok(sessions) => {
                        store.cache_sessions(sessions.clone());
                        log::debug!("Cached {} sessions", store.sessions().len());
                        self.emit(BackendEvent::Sessions(sessions)).await;
                    }
                    Err(err) => {
                        log::error!("Failed to load sessions: {err}");
                    }
                }
            }

            BackendCommand::FetchHistory { session_id } => {
                let Some(token) = store.token().map(str::to_string) else {
                    log::warn!("FetchHistory without a token; ignoring");
                    self.emit(BackendEvent::HistoryFailed { session_id }).await;
                    return;
                };
                match self.api.history(&token, &session_id).await {
                    Ok(messages) => {
                        self.emit(BackendEvent::History {
                            session_id,
                            messages,
                        })
                        .await;
                    }
                    Err(err) => {
                        log::error!("Failed to load history for {session_id}: {err}");
                        self.emit(BackendEvent::HistoryFailed { session_id }).await;
                    }
                }
            }

            BackendCommand::Ask {
                session_id,
                question,
            } => match self.api.ask(&session_id, &question).await {
                Ok(message) => {
                    self.emit(BackendEvent::Answer {
                        session_id,
                        message,
                    })
                    .await;
                }
                Err(err) => {
                    log::error!("Ask failed for {session_id}: {err}");
                    self.emit(BackendEvent::AskFailed { session_id }).await;
                }
            },

            BackendCommand::DeleteSession { session_id } => {
                let Some(token) = store.token().map(str::to_string) else {
                    log::warn!("DeleteSession without a token; ignoring");
                    self.emit(BackendEvent::DeleteFailed { session_id }).await;
                    return;
                };
                match self.api.delete_session(&token, &session_id).await {
                    Ok(()) => {
                        self.emit(BackendEvent::SessionDeleted { session_id }).await;
                    }
                    Err(err) => {
                        log::error!("Failed to delete session {session_id}: {err}");
                        self.emit(BackendEvent::DeleteFailed { session_id }).await;
                    }
                }
            }

            BackendCommand::SetTheme { name } => {
                if let Err(err) = store.set_theme(&name) {
                    log::warn!("Failed to persist theme: {err}");
                }
            }
        }
    }

    async fn emit(&self, event: BackendEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::warn!("Failed to notify UI: {err}");
        }
    }
}
