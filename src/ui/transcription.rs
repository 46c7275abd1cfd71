//! Headless state of the "new transcription" form
//!
//! The form only collects the title and the recording. Once submitted, the
//! call is tracked by a [`TranscriptionJob`] owned by the app state, so the
//! form can be closed without losing the result.

use crate::gateway::{suggested_title, GatewayRequest, MediaFile, PendingRequest};
use crate::store::Meeting;
use tracing::{debug, warn};
use uuid::Uuid;

/// A transcription handed to the gateway and not yet answered
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionJob {
    pub request_id: Uuid,
    /// Project the meeting will belong to
    pub project_id: String,
    pub title: String,
    pub file_name: String,
}

impl TranscriptionJob {
    /// The meeting to persist once the gateway returned `transcription`
    pub fn into_meeting(self, transcription: impl Into<String>) -> Meeting {
        Meeting::new(self.project_id, self.title, transcription).with_file_name(self.file_name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TranscriptionDraft {
    pub title: String,
    /// Path typed into the file field
    pub path_input: String,
    media: Option<MediaFile>,
    error: Option<String>,
}

impl TranscriptionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn media(&self) -> Option<&MediaFile> {
        self.media.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        self.media.is_some() && !self.title.trim().is_empty()
    }

    /// Use `media` as the recording, filling in the title if none was typed
    pub fn select_media(&mut self, media: MediaFile) {
        if self.title.trim().is_empty() {
            self.title = suggested_title(&media.name);
        }
        debug!("Selected {} ({})", media.name, media.mime_type);
        self.media = Some(media);
        self.error = None;
    }

    /// Show `message` in the form
    pub fn reject(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Load the file named in the path field
    pub fn load_path(&mut self) {
        let path = self.path_input.trim().to_string();
        if path.is_empty() {
            return;
        }
        match MediaFile::load(&path) {
            Ok(media) => self.select_media(media),
            Err(e) => {
                warn!("Could not load {}: {}", path, e);
                self.error = Some(e.user_message());
            }
        }
    }

    /// Build the gateway request and the job tracking it for `project_id`
    pub fn submit(&mut self, project_id: &str) -> Option<(PendingRequest, TranscriptionJob)> {
        if !self.can_submit() {
            return None;
        }
        let media = self.media.clone()?;
        let file_name = media.name.clone();
        let pending = PendingRequest::new(GatewayRequest::Transcribe { media });
        let job = TranscriptionJob {
            request_id: pending.id,
            project_id: project_id.to_string(),
            title: self.title.trim().to_string(),
            file_name,
        };
        self.error = None;
        Some((pending, job))
    }
}
