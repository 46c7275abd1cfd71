//! UI components module
//!
//! Each component borrows the app state and theme for one frame and
//! renders itself with `show`.

pub mod chat_panel;
pub mod delete_dialog;
pub mod meeting_list;
pub mod meeting_view;
pub mod project_list;
pub mod status_bar;
pub mod transcription_form;

pub use chat_panel::ChatPanel;
pub use delete_dialog::DeleteDialog;
pub use meeting_list::MeetingList;
pub use meeting_view::MeetingView;
pub use project_list::ProjectList;
pub use status_bar::StatusBar;
pub use transcription_form::TranscriptionForm;

use chrono::{DateTime, Local, Utc};

/// Attach an accessibility label to a widget
pub(crate) fn labeled(
    response: egui::Response,
    kind: egui::WidgetType,
    label: &str,
) -> egui::Response {
    let enabled = response.enabled();
    response.widget_info(|| egui::WidgetInfo::labeled(kind, enabled, label));
    response
}

pub(crate) fn format_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string()
}
