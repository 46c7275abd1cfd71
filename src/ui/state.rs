//! Application state management
//!
//! This module provides the central state for the studio UI. It owns the
//! store, the current screen, the forms, and the handle of the gateway
//! pipeline whose results are routed back in `poll_events`.

use crate::gateway::{
    AiGateway, GatewayAction, GatewayOutcome, GatewayPipeline, PendingRequest, PipelineHandle,
};
use crate::store::{LocalStore, Meeting, Project};
use crate::ui::transcription::{TranscriptionDraft, TranscriptionJob};
use crate::ui::view::ViewController;
use crate::ui::workspace::{MeetingWorkspace, WorkspaceUpdate};
use crate::Result;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Oldest notifications are dropped past this many
pub const MAX_NOTIFICATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message shown in the status bar
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NoticeLevel,
    pub text: String,
    pub created_at: Instant,
}

/// Central application state
pub struct AppState {
    store: LocalStore,

    /// Current screen
    pub view: ViewController,

    /// Project creation form
    pub new_project_name: String,
    pub new_project_description: String,

    /// Project awaiting delete confirmation
    pub pending_delete: Option<Project>,

    /// Projects as last read from the store
    pub projects: Vec<Project>,

    /// Project shown on the details screen, if it still exists
    pub current_project: Option<Project>,

    /// Meetings of the current project, newest first
    pub meetings: Vec<Meeting>,

    /// Upload form, when open
    pub draft: Option<TranscriptionDraft>,

    /// Transcription in flight; outlives the form that started it
    transcription: Option<TranscriptionJob>,

    /// Workspace of the selected meeting
    pub workspace: Option<MeetingWorkspace>,

    notifications: VecDeque<Notification>,

    pipeline: PipelineHandle,
}

impl AppState {
    /// Create the state and start the gateway worker
    pub fn new(store: LocalStore, gateway: Arc<dyn AiGateway>) -> Result<Self> {
        let pipeline = GatewayPipeline::new(gateway).start_worker()?;
        let mut state = Self {
            store,
            view: ViewController::new(),
            new_project_name: String::new(),
            new_project_description: String::new(),
            pending_delete: None,
            projects: Vec::new(),
            current_project: None,
            meetings: Vec::new(),
            draft: None,
            transcription: None,
            workspace: None,
            notifications: VecDeque::with_capacity(MAX_NOTIFICATIONS),
            pipeline,
        };
        state.reload();
        info!("Loaded {} projects", state.projects.len());
        Ok(state)
    }

    /// Show the project list as read fresh from the store
    pub fn reload(&mut self) {
        self.view.reset();
        self.current_project = None;
        self.meetings.clear();
        self.workspace = None;
        self.draft = None;
        self.refresh_projects();
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn refresh_projects(&mut self) {
        self.projects = self.store.list_projects();
    }

    fn refresh_meetings(&mut self) {
        self.meetings = match self.view.active_project_id() {
            Some(project_id) => self.store.list_meetings(project_id),
            None => Vec::new(),
        };
    }

    pub fn can_create_project(&self) -> bool {
        !self.new_project_name.trim().is_empty()
    }

    /// Create a project from the form fields
    pub fn create_project(&mut self) {
        if !self.can_create_project() {
            return;
        }
        let project = Project::new(
            self.new_project_name.trim(),
            self.new_project_description.trim(),
        );
        // Write failures are logged by the store and otherwise not surfaced
        let _ = self.store.create_project(project);

        self.new_project_name.clear();
        self.new_project_description.clear();
        self.refresh_projects();
    }

    /// Ask for confirmation before deleting `project_id`
    pub fn request_delete(&mut self, project_id: &str) {
        self.pending_delete = self.projects.iter().find(|p| p.id == project_id).cloned();
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the project awaiting confirmation together with its meetings
    pub fn confirm_delete(&mut self) {
        let Some(project) = self.pending_delete.take() else {
            return;
        };
        let _ = self.store.delete_project(&project.id);

        if self.view.active_project_id() == Some(project.id.as_str()) {
            self.back_to_projects();
        }
        self.refresh_projects();
    }

    pub fn open_project(&mut self, project_id: &str) {
        let Some(project) = self.store.get_project(project_id) else {
            warn!("Project {} not found", project_id);
            self.refresh_projects();
            return;
        };
        self.view.open_project(project.id.clone());
        self.current_project = Some(project);
        self.workspace = None;
        self.draft = None;
        self.refresh_meetings();
    }

    pub fn back_to_projects(&mut self) {
        self.view.back_to_projects();
        self.current_project = None;
        self.meetings.clear();
        self.workspace = None;
        self.draft = None;
        self.refresh_projects();
    }

    /// Select a meeting, starting a fresh workspace for it
    pub fn open_meeting(&mut self, meeting_id: &str) {
        if let Some(meeting) = self.meetings.iter().find(|m| m.id == meeting_id) {
            debug!("Opening meeting {}", meeting.id);
            self.workspace = Some(MeetingWorkspace::new(meeting.clone()));
            self.draft = None;
        }
    }

    pub fn close_meeting(&mut self) {
        self.workspace = None;
    }

    /// Whether a transcription is waiting for the gateway
    pub fn is_transcribing(&self) -> bool {
        self.transcription.is_some()
    }

    /// Open the upload form, unless a transcription is still running
    pub fn new_transcription(&mut self) {
        if self.is_transcribing() {
            debug!("Transcription in progress, not opening another form");
            return;
        }
        if self.draft.is_none() {
            self.draft = Some(TranscriptionDraft::new());
        }
        self.workspace = None;
    }

    /// Close the upload form; refused while its transcription runs
    pub fn cancel_transcription(&mut self) {
        if !self.is_transcribing() {
            self.draft = None;
        }
    }

    pub fn can_start_transcription(&self) -> bool {
        !self.is_transcribing() && self.draft.as_ref().is_some_and(|d| d.can_submit())
    }

    pub fn start_transcription(&mut self) {
        if self.is_transcribing() {
            return;
        }
        let Some(project_id) = self.view.active_project_id().map(str::to_string) else {
            return;
        };
        let Some((pending, job)) = self.draft.as_mut().and_then(|d| d.submit(&project_id)) else {
            return;
        };
        info!("Transcribing '{}' into project {}", job.title, project_id);
        self.transcription = Some(job);
        self.submit(pending);
    }

    pub fn generate_minutes(&mut self) {
        if let Some(pending) = self.workspace.as_mut().and_then(|w| w.request_minutes()) {
            self.submit(pending);
        }
    }

    pub fn extract_decisions(&mut self) {
        if let Some(pending) = self.workspace.as_mut().and_then(|w| w.request_decisions()) {
            self.submit(pending);
        }
    }

    pub fn send_chat(&mut self) {
        if let Some(pending) = self.workspace.as_mut().and_then(|w| w.submit_chat_input()) {
            self.submit(pending);
        }
    }

    fn submit(&mut self, pending: PendingRequest) {
        let request_id = pending.id;
        let action = pending.action();
        if let Err(e) = self.pipeline.submit(pending) {
            warn!("Could not queue {} request: {}", action.as_str(), e);
            self.abandon(request_id, action);
            self.notify(NoticeLevel::Error, e.user_message());
        }
    }

    fn abandon(&mut self, request_id: Uuid, action: GatewayAction) {
        match action {
            GatewayAction::Transcription => {
                if self.take_transcription(request_id).is_some() {
                    if let Some(draft) = self.draft.as_mut() {
                        draft.reject(action.failure_message());
                    }
                }
            }
            _ => {
                if let Some(workspace) = self.workspace.as_mut() {
                    workspace.abandon(request_id);
                }
            }
        }
    }

    /// Whether a transcription or a call issued from the open workspace is still running
    pub fn has_pending_requests(&self) -> bool {
        let workspace = self.workspace.as_ref().is_some_and(|w| {
            w.is_pending(GatewayAction::Minutes)
                || w.is_pending(GatewayAction::Decisions)
                || w.is_pending(GatewayAction::Chat)
        });
        self.is_transcribing() || workspace
    }

    /// Process finished gateway calls
    pub fn poll_events(&mut self) {
        while let Some(event) = self.pipeline.try_recv() {
            match GatewayOutcome::from_event(event) {
                Some(outcome) => self.route(outcome),
                None => warn!("Gateway pipeline stopped"),
            }
        }
    }

    fn route(&mut self, outcome: GatewayOutcome) {
        match outcome.action {
            GatewayAction::Transcription => {
                let Some(job) = self.take_transcription(outcome.request_id) else {
                    debug!("Dropping stale transcription {}", outcome.request_id);
                    return;
                };
                match outcome.result {
                    Ok(transcription) => self.save_meeting(job.into_meeting(transcription)),
                    Err(e) => {
                        warn!("Transcription of '{}' failed: {}", job.title, e);
                        let message = GatewayAction::Transcription.failure_message();
                        if let Some(draft) = self.draft.as_mut() {
                            draft.reject(message);
                        }
                        self.notify(NoticeLevel::Error, message);
                    }
                }
            }
            _ => {
                let update = match self.workspace.as_mut() {
                    Some(workspace) => workspace.apply(&outcome),
                    None => WorkspaceUpdate::Stale,
                };
                if let WorkspaceUpdate::Failed { message } = update {
                    self.notify(NoticeLevel::Error, message);
                }
            }
        }
    }

    fn take_transcription(&mut self, request_id: Uuid) -> Option<TranscriptionJob> {
        if self
            .transcription
            .as_ref()
            .is_some_and(|job| job.request_id == request_id)
        {
            self.transcription.take()
        } else {
            None
        }
    }

    /// Persist a finished transcription, whatever screen is showing
    fn save_meeting(&mut self, meeting: Meeting) {
        info!("Transcription saved as meeting {}", meeting.id);
        let title = meeting.title.clone();
        if self.store.create_meeting(meeting).is_ok() {
            self.notify(NoticeLevel::Info, format!("\"{}\" transcribed", title));
        }
        self.draft = None;
        self.refresh_meetings();
    }

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        if self.notifications.len() >= MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(Notification {
            level,
            text: text.into(),
            created_at: Instant::now(),
        });
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    pub fn dismiss_notification(&mut self, index: usize) {
        self.notifications.remove(index);
    }

    /// Drop notifications older than `max_age`
    pub fn expire_notifications(&mut self, max_age: Duration) {
        self.notifications
            .retain(|n| n.created_at.elapsed() < max_age);
    }
}
