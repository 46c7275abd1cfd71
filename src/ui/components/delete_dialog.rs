//! Confirmation window shown before a project is deleted

use super::labeled;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{RichText, WidgetType};

pub struct DeleteDialog<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> DeleteDialog<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ctx: &egui::Context) {
        let Some(project) = self.state.pending_delete.clone() else {
            return;
        };

        let mut confirm = false;
        let mut cancel = false;

        egui::Window::new("Delete project")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!(
                    "Delete \"{}\" and all of its meetings? This cannot be undone.",
                    project.name
                ));
                ui.add_space(self.theme.spacing_sm);
                ui.horizontal(|ui| {
                    let yes = ui.button(RichText::new("Delete").color(self.theme.error));
                    confirm = labeled(yes, WidgetType::Button, "Confirm delete").clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });

        if confirm {
            self.state.confirm_delete();
        } else if cancel {
            self.state.cancel_delete();
        }
    }
}
