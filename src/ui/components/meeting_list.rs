//! Project details: header and the project's meetings

use super::{format_date, labeled};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{RichText, ScrollArea, WidgetType};

pub struct MeetingList<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> MeetingList<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let back = ui.button("← Projects");
        if labeled(back, WidgetType::Button, "Back to projects").clicked() {
            self.state.back_to_projects();
            return;
        }

        let Some(project) = self.state.current_project.clone() else {
            ui.add_space(self.theme.spacing);
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Loading project...").color(self.theme.text_muted));
            });
            return;
        };

        ui.heading(&project.name);
        if !project.description.is_empty() {
            ui.label(RichText::new(&project.description).color(self.theme.text_secondary));
        }
        ui.add_space(self.theme.spacing_sm);

        let transcribing = self.state.is_transcribing();
        let new = ui.add_enabled(
            self.state.draft.is_none() && !transcribing,
            egui::Button::new("+ New transcription").rounding(self.theme.button_rounding),
        );
        if labeled(new, WidgetType::Button, "New transcription").clicked() {
            self.state.new_transcription();
        }
        if transcribing && self.state.draft.is_none() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Transcribing...").color(self.theme.text_muted));
            });
        }

        ui.add_space(self.theme.spacing_sm);
        ui.label(RichText::new("Meetings").strong().color(self.theme.text_primary));

        if self.state.meetings.is_empty() {
            ui.label(
                RichText::new("No meetings in this project yet.")
                    .italics()
                    .color(self.theme.text_muted),
            );
            return;
        }

        let selected = self
            .state
            .workspace
            .as_ref()
            .map(|w| w.meeting().id.clone());
        let mut open = None;

        ScrollArea::vertical()
            .id_salt("meeting_list")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for meeting in &self.state.meetings {
                    let is_selected = selected.as_deref() == Some(meeting.id.as_str());
                    let frame = if is_selected {
                        self.theme
                            .card_frame()
                            .stroke(egui::Stroke::new(1.5, self.theme.primary))
                    } else {
                        self.theme.card_frame()
                    };

                    let card = frame
                        .show(ui, |ui| {
                            ui.set_min_width(ui.available_width());
                            ui.label(
                                RichText::new(&meeting.title)
                                    .strong()
                                    .color(self.theme.text_primary),
                            );
                            let mut meta = format_date(&meeting.created_at);
                            if let Some(file_name) = &meeting.file_name {
                                meta.push_str(" · ");
                                meta.push_str(file_name);
                            }
                            ui.label(RichText::new(meta).small().color(self.theme.text_muted));
                        })
                        .response
                        .interact(egui::Sense::click());

                    if labeled(
                        card,
                        WidgetType::Button,
                        &format!("Open meeting {}", meeting.title),
                    )
                    .clicked()
                    {
                        open = Some(meeting.id.clone());
                    }
                    ui.add_space(self.theme.spacing_sm / 2.0);
                }
            });

        if let Some(id) = open {
            self.state.open_meeting(&id);
        }
    }
}
