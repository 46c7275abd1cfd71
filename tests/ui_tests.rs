//! UI automation tests using egui_kittest and AccessKit
//!
//! These tests drive the real `StudioApp` frame function, clicking and
//! typing through the accessibility tree.

use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use minutes_studio::gateway::{AiGateway, MediaFile, QueryContext};
use minutes_studio::store::{LocalStore, Meeting, Project};
use minutes_studio::ui::{AppState, Screen, StudioApp};
use minutes_studio::{Result, StudioError};
use std::sync::Arc;
use std::time::Duration;

struct ScriptedGateway;

impl AiGateway for ScriptedGateway {
    fn transcribe(&self, _media: &MediaFile) -> Result<String> {
        Err(StudioError::EmptyResult("nothing heard".to_string()))
    }

    fn summarize(&self, _transcription: &str) -> Result<String> {
        Ok("Kickoff minutes".to_string())
    }

    fn extract_decisions(&self, _transcription: &str) -> Result<String> {
        Err(StudioError::Gateway("quota exceeded".to_string()))
    }

    fn answer_query(&self, _query: &str, _context: &QueryContext) -> Result<String> {
        Ok("On Friday.".to_string())
    }
}

fn app_with(store: LocalStore) -> StudioApp {
    let state = AppState::new(store, Arc::new(ScriptedGateway)).unwrap();
    StudioApp::from_state(state)
}

/// App showing one project with one open meeting
fn app_with_open_meeting() -> StudioApp {
    let store = LocalStore::in_memory();
    let project = Project::new("Q3", "Quarter planning");
    let meeting = Meeting::new(project.id.clone(), "Kickoff", "we ship on friday");
    store.create_project(project.clone()).unwrap();
    store.create_meeting(meeting.clone()).unwrap();

    let mut app = app_with(store);
    let state = app.state_mut();
    state.open_project(&project.id);
    state.open_meeting(&meeting.id);
    app
}

fn harness(app: StudioApp) -> Harness<'static, StudioApp> {
    Harness::builder()
        .with_size(egui::Vec2::new(1100.0, 800.0))
        .build_state(|ctx, app: &mut StudioApp| app.ui(ctx), app)
}

/// Run frames until the gateway worker has answered everything
fn run_until_idle(harness: &mut Harness<'_, StudioApp>) {
    for _ in 0..200 {
        harness.run();
        if !harness.state().state().has_pending_requests() {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    harness.run();
}

#[test]
fn test_empty_project_list() {
    let mut harness = harness(app_with(LocalStore::in_memory()));
    harness.run();

    let _name = harness.get_by_label("Project name");
    let _description = harness.get_by_label("Project description");
    let _create = harness.get_by_label("Create project");
    assert!(harness.state().state().projects.is_empty());
}

#[test]
fn test_create_project_through_form() {
    let mut harness = harness(app_with(LocalStore::in_memory()));
    harness.run();

    harness.get_by_label("Project name").focus();
    harness.run();
    harness.get_by_label("Project name").type_text("Q3 planning");
    harness.run();

    harness.get_by_label("Create project").click();
    harness.run();
    harness.run();

    let state = harness.state().state();
    assert_eq!(state.projects.len(), 1);
    assert_eq!(state.projects[0].name, "Q3 planning");
    assert!(state.new_project_name.is_empty());

    let _card = harness.get_by_label("Open Q3 planning");
}

#[test]
fn test_open_project_and_go_back() {
    let store = LocalStore::in_memory();
    store.create_project(Project::new("Q3", "")).unwrap();
    let mut harness = harness(app_with(store));
    harness.run();

    harness.get_by_label("Open Q3").click();
    harness.run();
    harness.run();
    assert!(matches!(
        harness.state().state().view.screen(),
        Screen::ProjectDetails { .. }
    ));
    let _new = harness.get_by_label("New transcription");

    harness.get_by_label("Back to projects").click();
    harness.run();
    harness.run();
    assert_eq!(harness.state().state().view.screen(), &Screen::ProjectList);
}

#[test]
fn test_delete_asks_for_confirmation() {
    let store = LocalStore::in_memory();
    store.create_project(Project::new("Q3", "")).unwrap();
    let mut harness = harness(app_with(store));
    harness.run();

    harness.get_by_label("Delete Q3").click();
    harness.run();
    harness.run();
    assert_eq!(harness.state().state().projects.len(), 1);

    harness.get_by_label("Confirm delete").click();
    harness.run();
    harness.run();

    let state = harness.state().state();
    assert!(state.projects.is_empty());
    assert!(state.pending_delete.is_none());
    assert!(harness.query_by_label("Confirm delete").is_none());
}

#[test]
fn test_generate_minutes_button() {
    let mut harness = harness(app_with_open_meeting());
    harness.run();

    harness.get_by_label("Generate minutes").click();
    harness.run();
    run_until_idle(&mut harness);

    let workspace = harness.state().state().workspace.as_ref().unwrap();
    assert_eq!(workspace.minutes(), Some("Kickoff minutes"));
    let _minutes = harness.get_by_label("Minutes: Kickoff minutes");
}

#[test]
fn test_failed_decisions_show_notification() {
    let mut harness = harness(app_with_open_meeting());
    harness.run();

    harness.get_by_label("Extract decisions").click();
    harness.run();
    run_until_idle(&mut harness);

    let _notice = harness.get_by_label("Notification: Error extracting decisions. Please try again.");
    let workspace = harness.state().state().workspace.as_ref().unwrap();
    assert!(workspace.decisions().is_none());
    assert!(workspace.can_extract_decisions());
}

#[test]
fn test_chat_round_trip() {
    let mut harness = harness(app_with_open_meeting());
    harness.run();

    harness.get_by_label("Chat input").focus();
    harness.run();
    harness.get_by_label("Chat input").type_text("When do we ship?");
    harness.run();

    harness.get_by_label("Send question").click();
    harness.run();
    run_until_idle(&mut harness);

    let _question = harness.get_by_label("User message: When do we ship?");
    let _answer = harness.get_by_label("AI response: On Friday.");
    assert!(harness
        .state()
        .state()
        .workspace
        .as_ref()
        .unwrap()
        .chat_input
        .is_empty());
}

#[test]
fn test_transcription_error_is_shown_in_form() {
    let mut app = app_with_open_meeting();
    let state = app.state_mut();
    state.new_transcription();
    state
        .draft
        .as_mut()
        .unwrap()
        .select_media(MediaFile::new("standup.mp3", "audio/mpeg", vec![1, 2, 3]));

    let mut harness = harness(app);
    harness.run();

    harness.get_by_label("Transcribe").click();
    harness.run();
    run_until_idle(&mut harness);

    let _error = harness.get_by_label(
        "Error: Failed to process the file. Check that the format is supported and try again.",
    );
    assert!(harness.state().state().draft.is_some());
}
