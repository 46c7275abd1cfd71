//! Upload form: pick a recording, name the meeting, start the transcription
//!
//! A file is chosen either by typing its path or by dropping it onto the
//! window (handled in `StudioApp`).

use super::labeled;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{RichText, WidgetType};

pub struct TranscriptionForm<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> TranscriptionForm<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let theme = self.theme;
        let busy = self.state.is_transcribing();
        let can_start = self.state.can_start_transcription();
        let Some(draft) = self.state.draft.as_mut() else {
            return;
        };

        let mut start = false;
        let mut cancel = false;

        theme.card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new("New transcription").strong().color(theme.text_primary));
            ui.add_space(theme.spacing_sm / 2.0);

            ui.add_enabled_ui(!busy, |ui| {
                let title = ui.add(
                    egui::TextEdit::singleline(&mut draft.title)
                        .hint_text("Meeting title")
                        .desired_width(f32::INFINITY),
                );
                labeled(title, WidgetType::TextEdit, "Meeting title");

                ui.horizontal(|ui| {
                    let path = ui.add(
                        egui::TextEdit::singleline(&mut draft.path_input)
                            .hint_text("Path to an audio or video file")
                            .desired_width(ui.available_width() - 90.0),
                    );
                    labeled(path.clone(), WidgetType::TextEdit, "File path");
                    let enter = path.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Load file").clicked() || enter {
                        draft.load_path();
                    }
                });
            });

            match draft.media() {
                Some(media) => {
                    ui.label(
                        RichText::new(format!(
                            "{} · {} · {:.1} MB",
                            media.name,
                            media.mime_type,
                            media.data.len() as f64 / (1024.0 * 1024.0)
                        ))
                        .color(theme.text_secondary),
                    );
                }
                None => {
                    ui.label(
                        RichText::new("Or drop a recording onto the window.")
                            .small()
                            .color(theme.text_muted),
                    );
                }
            }

            if let Some(error) = draft.error() {
                let label = ui.label(RichText::new(error).color(theme.error));
                labeled(label, WidgetType::Label, &format!("Error: {}", error));
            }

            ui.add_space(theme.spacing_sm / 2.0);
            ui.horizontal(|ui| {
                if busy {
                    ui.spinner();
                    ui.label(RichText::new("Transcribing...").color(theme.text_muted));
                } else {
                    start = ui
                        .add_enabled(
                            can_start,
                            egui::Button::new("Transcribe").rounding(theme.button_rounding),
                        )
                        .clicked();
                }
                let cancel_button = ui.add_enabled(
                    !busy,
                    egui::Button::new("Cancel").rounding(theme.button_rounding),
                );
                cancel = labeled(cancel_button, WidgetType::Button, "Cancel").clicked();
            });
        });

        if start {
            self.state.start_transcription();
        } else if cancel {
            self.state.cancel_transcription();
        }
    }
}
