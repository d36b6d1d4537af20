use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{BackendCommand, BackendEvent};

use super::components::auth_panel::{self, AuthAction};
use super::components::sidebar::{self, SidebarAction};
use super::components::{chat_area, input_bar};
use super::state::AppState;

pub struct ChatApp {
    state: AppState,
    command_sender: mpsc::Sender<BackendCommand>,
    event_receiver: mpsc::Receiver<BackendEvent>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        command_sender: mpsc::Sender<BackendCommand>,
        event_receiver: mpsc::Receiver<BackendEvent>,
    ) -> Self {
        Self {
            state: AppState::new(),
            command_sender,
            event_receiver,
        }
    }

    fn handle_backend_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            let follow_ups = self.state.apply_event(event);
            self.dispatch(follow_ups);
        }
    }

    fn dispatch(&mut self, commands: Vec<BackendCommand>) {
        for command in commands {
            if let Err(err) = self.command_sender.try_send(command) {
                log::warn!("Failed to send command to backend: {err}");
            }
        }
    }

    fn handle_sidebar_action(&mut self, action: SidebarAction) {
        match action {
            SidebarAction::NewChat => {
                let commands = self.state.start_new_session();
                self.dispatch(commands);
            }
            SidebarAction::Select(session_id) => {
                let commands = self.state.select_session(session_id);
                self.dispatch(commands);
            }
            SidebarAction::Delete(session_id) => self.state.request_delete(session_id),
            SidebarAction::OpenLogin => self.state.open_login_form(),
            SidebarAction::Logout => {
                let commands = self.state.logout();
                self.dispatch(commands);
            }
        }
    }

    fn handle_auth_action(&mut self, action: AuthAction) {
        match action {
            AuthAction::SubmitLogin => {
                let commands = self.state.submit_login();
                self.dispatch(commands);
            }
            AuthAction::SubmitRegister => {
                let commands = self.state.submit_register();
                self.dispatch(commands);
            }
            AuthAction::ToggleMode => self.state.toggle_register(),
            AuthAction::Close => self.state.close_login_form(),
        }
    }

    /// Confirmation dialog before a session delete goes out.
    fn show_delete_confirmation(&mut self, ctx: &egui::Context) {
        if self.state.pending_delete.is_none() {
            return;
        }

        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Delete conversation")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Are you sure you want to delete this conversation?");
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });

        if confirmed {
            let commands = self.state.confirm_delete();
            self.dispatch(commands);
        } else if cancelled {
            self.state.cancel_delete();
        }
    }

    fn show_error_dialog(&mut self, ctx: &egui::Context) {
        let Some(text) = self.state.last_error.clone() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(text);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.state.last_error = None;
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_backend_events();

        ctx.set_visuals(if self.state.dark_theme {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        if self.state.sidebar_open {
            let mut sidebar_action = None;
            egui::SidePanel::left("session_sidebar").show(ctx, |ui| {
                sidebar_action = sidebar::render(ui, &self.state);
            });
            if let Some(action) = sidebar_action {
                self.handle_sidebar_action(action);
            }
        }

        let mut send_requested = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("☰").clicked() {
                    self.state.toggle_sidebar();
                }
                ui.heading("Chatbot");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_icon = if self.state.dark_theme { "☀" } else { "🌙" };
                    if ui.button(theme_icon).clicked() {
                        let commands = self.state.toggle_theme();
                        self.dispatch(commands);
                    }
                });
            });
            ui.separator();

            egui::TopBottomPanel::bottom("input_bar")
                .exact_height(32.0)
                .show_inside(ui, |ui| {
                    send_requested = input_bar::render(ui, &mut self.state.input_text);
                });
            egui::CentralPanel::default().show_inside(ui, |ui| {
                chat_area::render(ui, &self.state.messages);
            });
        });
        if send_requested {
            let commands = self.state.send_message();
            self.dispatch(commands);
        }

        if let Some(action) = auth_panel::render(ctx, &mut self.state) {
            self.handle_auth_action(action);
        }
        self.show_delete_confirmation(ctx);
        self.show_error_dialog(ctx);

        ctx.request_repaint();
    }
}
