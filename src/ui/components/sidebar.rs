use eframe::egui;

use crate::ui::state::AppState;

/// What the user clicked in the sidebar this frame.
pub enum SidebarAction {
    NewChat,
    Select(String),
    Delete(String),
    OpenLogin,
    Logout,
}

pub fn render(ui: &mut egui::Ui, state: &AppState) -> Option<SidebarAction> {
    let mut action = None;

    ui.heading("Conversations");
    ui.separator();

    if ui.button("+ New chat").clicked() {
        action = Some(SidebarAction::NewChat);
    }
    ui.separator();

    if state.sessions.is_empty() {
        ui.label("No conversations yet");
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for session in &state.sessions {
            let is_current = state.current_session_id.as_deref() == Some(session.id.as_str());
            ui.horizontal(|ui| {
                if ui.selectable_label(is_current, &session.label).clicked() {
                    action = Some(SidebarAction::Select(session.id.clone()));
                }
                if ui.small_button("🗑").clicked() {
                    action = Some(SidebarAction::Delete(session.id.clone()));
                }
            });
        }
    });

    ui.separator();
    if state.logged_in {
        ui.label(egui::RichText::new(&state.user_name).strong());
        ui.label(egui::RichText::new(&state.user_email).weak());
        if ui.button("Log out").clicked() {
            action = Some(SidebarAction::Logout);
        }
    } else if ui.button("Log in").clicked() {
        action = Some(SidebarAction::OpenLogin);
    }

    action
}
