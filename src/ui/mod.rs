//! User interface and the headless state behind it
//!
//! `view`, `workspace`, `transcription` and `state` hold everything the UI
//! shows and are usable without a window; `app` and `components` draw them
//! with egui.

mod app;
pub mod components;
pub mod state;
mod theme;
pub mod transcription;
pub mod view;
pub mod workspace;

pub use app::StudioApp;
pub use state::{AppState, NoticeLevel, Notification, MAX_NOTIFICATIONS};
pub use theme::Theme;
pub use transcription::{TranscriptionDraft, TranscriptionJob};
pub use view::{Screen, ViewController};
pub use workspace::{MeetingWorkspace, WorkspaceUpdate};

/// Run the studio window until it is closed
pub fn run(state: AppState) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([720.0, 480.0])
            .with_drag_and_drop(true)
            .with_title("Minutes Studio"),
        ..Default::default()
    };

    eframe::run_native(
        "Minutes Studio",
        options,
        Box::new(|cc| Ok(Box::new(StudioApp::new(cc, state)))),
    )
}
