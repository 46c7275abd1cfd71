//! Main application struct and eframe integration
//!
//! This module contains the StudioApp that implements eframe::App.

use crate::gateway::MediaFile;
use crate::ui::components::{
    DeleteDialog, MeetingList, MeetingView, ProjectList, StatusBar, TranscriptionForm,
};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use crate::ui::view::Screen;
use egui::{CentralPanel, RichText, SidePanel, TopBottomPanel};
use std::time::Duration;
use tracing::{debug, info};

/// How long a notification stays in the status bar
const NOTIFICATION_TTL: Duration = Duration::from_secs(8);

pub struct StudioApp {
    state: AppState,
    theme: Theme,
}

impl StudioApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        let app = Self::from_state(state);
        app.theme.apply(&cc.egui_ctx);
        info!("Studio UI initialized");
        app
    }

    /// Build the app without an eframe window
    pub fn from_state(state: AppState) -> Self {
        Self {
            state,
            theme: Theme::dark(),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Hand files dropped onto the window to the open upload form
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        let Some(draft) = self.state.draft.as_mut() else {
            debug!("Ignoring dropped file, no upload form open");
            return;
        };

        let media = match (&file.bytes, &file.path) {
            (Some(bytes), _) => MediaFile::from_bytes(file.name.clone(), bytes.to_vec()),
            (None, Some(path)) => MediaFile::load(path),
            (None, None) => return,
        };
        match media {
            Ok(media) => draft.select_media(media),
            Err(e) => draft.reject(e.user_message()),
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Minutes Studio")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.label(
                        RichText::new("Meeting transcription & minutes")
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );
                });
            });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("status_bar")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(self.theme.spacing_sm),
            )
            .show(ctx, |ui| {
                StatusBar::new(&mut self.state, &self.theme).show(ui);
            });
    }

    fn show_content(&mut self, ctx: &egui::Context) {
        match self.state.view.screen().clone() {
            Screen::ProjectList => {
                CentralPanel::default()
                    .frame(egui::Frame::none().inner_margin(self.theme.spacing))
                    .show(ctx, |ui| {
                        ProjectList::new(&mut self.state, &self.theme).show(ui);
                    });
            }
            Screen::ProjectDetails { .. } => {
                SidePanel::left("meetings")
                    .resizable(true)
                    .default_width(300.0)
                    .min_width(240.0)
                    .frame(
                        egui::Frame::none()
                            .fill(self.theme.bg_primary)
                            .inner_margin(self.theme.spacing),
                    )
                    .show(ctx, |ui| {
                        MeetingList::new(&mut self.state, &self.theme).show(ui);
                    });

                CentralPanel::default()
                    .frame(egui::Frame::none().inner_margin(self.theme.spacing))
                    .show(ctx, |ui| {
                        egui::ScrollArea::vertical()
                            .id_salt("workspace")
                            .show(ui, |ui| {
                                if self.state.draft.is_some() {
                                    TranscriptionForm::new(&mut self.state, &self.theme).show(ui);
                                } else if self.state.workspace.is_some() {
                                    MeetingView::new(&mut self.state, &self.theme).show(ui);
                                } else {
                                    ui.centered_and_justified(|ui| {
                                        ui.label(
                                            RichText::new(
                                                "Select a meeting or start a new transcription.",
                                            )
                                            .color(self.theme.text_muted),
                                        );
                                    });
                                }
                            });
                    });
            }
        }
    }

    /// Draw one frame; also used directly by UI tests
    pub fn ui(&mut self, ctx: &egui::Context) {
        self.state.poll_events();
        self.state.expire_notifications(NOTIFICATION_TTL);
        self.handle_dropped_files(ctx);

        self.show_header(ctx);
        self.show_status_bar(ctx);
        self.show_content(ctx);
        DeleteDialog::new(&mut self.state, &self.theme).show(ctx);

        // Keep polling while calls are in flight
        if self.state.has_pending_requests() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Minutes Studio shutting down");
    }
}
