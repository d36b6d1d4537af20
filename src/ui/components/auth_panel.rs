use eframe::egui;

use crate::ui::state::AppState;

pub enum AuthAction {
    SubmitLogin,
    SubmitRegister,
    ToggleMode,
    Close,
}

/// Login / register window. Shown only while `state.show_login_form` is set.
pub fn render(ctx: &egui::Context, state: &mut AppState) -> Option<AuthAction> {
    if !state.show_login_form {
        return None;
    }

    let mut action = None;
    let title = if state.registering { "Create account" } else { "Sign in" };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            if state.registering {
                ui.label("Username");
                ui.text_edit_singleline(&mut state.register_username);
                ui.label("Email");
                ui.text_edit_singleline(&mut state.register_email);
                ui.label("Password");
                ui.add(egui::TextEdit::singleline(&mut state.register_password).password(true));
            } else {
                ui.label("Email");
                ui.text_edit_singleline(&mut state.login_email);
                ui.label("Password");
                ui.add(egui::TextEdit::singleline(&mut state.login_password).password(true));
            }

            if !state.auth_error.is_empty() {
                ui.colored_label(egui::Color32::RED, &state.auth_error);
            }

            ui.horizontal(|ui| {
                let submit_label = if state.registering { "Register" } else { "Log in" };
                if ui.button(submit_label).clicked() {
                    action = Some(if state.registering {
                        AuthAction::SubmitRegister
                    } else {
                        AuthAction::SubmitLogin
                    });
                }
                if ui.button("Cancel").clicked() {
                    action = Some(AuthAction::Close);
                }
            });

            let toggle_label = if state.registering {
                "Already have an account? Sign in"
            } else {
                "No account? Register"
            };
            if ui.link(toggle_label).clicked() {
                action = Some(AuthAction::ToggleMode);
            }
        });

    action
}
