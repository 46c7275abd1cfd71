//! Workspace of the open meeting: transcription, minutes, decisions, chat

use super::{format_date, labeled, ChatPanel};
use crate::gateway::GatewayAction;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{RichText, ScrollArea, WidgetType};

#[derive(Clone, Copy)]
enum Action {
    Close,
    Minutes,
    Decisions,
}

pub struct MeetingView<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> MeetingView<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let theme = self.theme;
        let Some(workspace) = self.state.workspace.as_ref() else {
            return;
        };
        let mut action = None;

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.heading(&workspace.meeting().title);
                ui.label(
                    RichText::new(format_date(&workspace.meeting().created_at))
                        .small()
                        .color(theme.text_muted),
                );
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                let close = ui.button("✕");
                if labeled(close, WidgetType::Button, "Close meeting").clicked() {
                    action = Some(Action::Close);
                }
            });
        });

        ui.add_space(theme.spacing_sm);

        egui::CollapsingHeader::new("Transcription")
            .id_salt("transcription")
            .default_open(false)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("transcription_text")
                    .max_height(200.0)
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(&workspace.meeting().transcription)
                                .color(theme.text_secondary),
                        );
                    });
            });

        ui.add_space(theme.spacing_sm);
        ui.horizontal(|ui| {
            let minutes = Self::action_button(
                ui,
                theme,
                "Generate minutes",
                workspace.can_generate_minutes(),
                workspace.is_pending(GatewayAction::Minutes),
            );
            if minutes {
                action = Some(Action::Minutes);
            }

            let decisions = Self::action_button(
                ui,
                theme,
                "Extract decisions",
                workspace.can_extract_decisions(),
                workspace.is_pending(GatewayAction::Decisions),
            );
            if decisions {
                action = Some(Action::Decisions);
            }
        });

        if let Some(minutes) = workspace.minutes() {
            Self::artifact(ui, theme, "Minutes", minutes);
        }
        if let Some(decisions) = workspace.decisions() {
            Self::artifact(ui, theme, "Decisions", decisions);
        }

        ui.add_space(theme.spacing_sm);
        ui.separator();
        ChatPanel::new(&mut *self.state, theme).show(ui);

        match action {
            Some(Action::Close) => self.state.close_meeting(),
            Some(Action::Minutes) => self.state.generate_minutes(),
            Some(Action::Decisions) => self.state.extract_decisions(),
            None => {}
        }
    }

    /// Button that is disabled once its artifact exists or is being generated
    fn action_button(
        ui: &mut egui::Ui,
        theme: &Theme,
        label: &str,
        enabled: bool,
        pending: bool,
    ) -> bool {
        let response = ui.add_enabled(
            enabled,
            egui::Button::new(label).rounding(theme.button_rounding),
        );
        let clicked = labeled(response, WidgetType::Button, label).clicked();
        if pending {
            ui.spinner();
        }
        clicked
    }

    fn artifact(ui: &mut egui::Ui, theme: &Theme, title: &str, text: &str) {
        ui.add_space(theme.spacing_sm);
        theme.card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(title).strong().color(theme.primary));
            let body = ui.label(RichText::new(text).color(theme.text_secondary));
            labeled(body, WidgetType::Label, &format!("{}: {}", title, text));
        });
    }
}
