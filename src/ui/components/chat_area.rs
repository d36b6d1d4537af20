use eframe::egui;

use crate::common::{ChatMessage, Sender};

pub fn render(ui: &mut egui::Ui, messages: &[ChatMessage]) {
    egui::ScrollArea::vertical()
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in messages {
                let (who, color) = match message.sender {
                    Sender::User => ("You", egui::Color32::LIGHT_BLUE),
                    Sender::Bot => ("Bot", egui::Color32::LIGHT_GREEN),
                };
                ui.horizontal_wrapped(|ui| {
                    ui.colored_label(color, format!("{who}:"));
                    ui.label(&message.text);
                });
                if !message.sources.is_empty() {
                    ui.label(
                        egui::RichText::new(format!("sources: {}", message.sources.join(", ")))
                            .weak()
                            .small(),
                    );
                }
            }
        });
}
