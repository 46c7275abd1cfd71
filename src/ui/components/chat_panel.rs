//! Chat about the open meeting
//!
//! Every turn gets an accessibility label prefixed with its author so tests
//! can find it.

use super::labeled;
use crate::gateway::GatewayAction;
use crate::store::ChatRole;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{RichText, ScrollArea, Vec2, WidgetType};

pub struct ChatPanel<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> ChatPanel<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let theme = self.theme;
        let Some(workspace) = self.state.workspace.as_mut() else {
            return;
        };

        ui.label(RichText::new("Ask about this meeting").strong().color(theme.text_primary));

        ScrollArea::vertical()
            .id_salt("chat_history")
            .max_height(260.0)
            .auto_shrink([false, true])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if workspace.chat().is_empty() {
                    ui.label(
                        RichText::new("Questions and answers appear here.")
                            .italics()
                            .color(theme.text_muted),
                    );
                }
                for message in workspace.chat() {
                    Self::show_turn(ui, theme, message.role, &message.text);
                }
                if workspace.is_pending(GatewayAction::Chat) {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("Thinking...").color(theme.text_muted));
                    });
                }
            });

        ui.add_space(theme.spacing_sm);

        let mut send = false;
        ui.horizontal(|ui| {
            let pending = workspace.is_pending(GatewayAction::Chat);
            let input = ui.add_enabled(
                !pending,
                egui::TextEdit::singleline(&mut workspace.chat_input)
                    .hint_text("Ask a question...")
                    .desired_width(ui.available_width() - 70.0),
            );
            let input = labeled(input, WidgetType::TextEdit, "Chat input");
            let enter = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let button = ui.add_enabled(
                workspace.can_send_chat(),
                egui::Button::new("Send")
                    .min_size(Vec2::new(60.0, 0.0))
                    .rounding(theme.button_rounding),
            );
            send = labeled(button, WidgetType::Button, "Send question").clicked() || enter;
        });

        if send {
            self.state.send_chat();
        }
    }

    fn show_turn(ui: &mut egui::Ui, theme: &Theme, role: ChatRole, text: &str) {
        let (fill, prefix, layout) = match role {
            ChatRole::User => (
                theme.user_bubble,
                "User message",
                egui::Layout::right_to_left(egui::Align::TOP),
            ),
            ChatRole::Model => (
                theme.model_bubble,
                "AI response",
                egui::Layout::left_to_right(egui::Align::TOP),
            ),
        };

        ui.with_layout(layout, |ui| {
            egui::Frame::none()
                .fill(fill)
                .rounding(theme.card_rounding)
                .inner_margin(theme.spacing_sm)
                .show(ui, |ui| {
                    ui.set_max_width(ui.available_width() * 0.8);
                    let label = ui.label(RichText::new(text).color(theme.text_primary));
                    labeled(label, WidgetType::Label, &format!("{}: {}", prefix, text));
                });
        });
    }
}
