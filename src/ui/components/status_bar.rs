//! Bottom bar with notifications and a busy indicator

use super::labeled;
use crate::ui::state::{AppState, NoticeLevel};
use crate::ui::theme::Theme;
use egui::{RichText, WidgetType};

pub struct StatusBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let mut dismiss = None;

        ui.horizontal_wrapped(|ui| {
            if self.state.has_pending_requests() {
                ui.spinner();
                ui.label(RichText::new("Working...").small().color(self.theme.text_muted));
                ui.separator();
            }

            for (index, notice) in self.state.notifications().enumerate() {
                let color = match notice.level {
                    NoticeLevel::Info => self.theme.success,
                    NoticeLevel::Error => self.theme.error,
                };
                let label = ui.label(RichText::new(&notice.text).color(color));
                labeled(label, WidgetType::Label, &format!("Notification: {}", notice.text));
                if ui.small_button("✕").on_hover_text("Dismiss").clicked() {
                    dismiss = Some(index);
                }
                ui.separator();
            }
        });

        if let Some(index) = dismiss {
            self.state.dismiss_notification(index);
        }
    }
}
