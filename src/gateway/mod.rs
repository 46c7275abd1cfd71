//! AI gateway: the external capability that does all semantic work
//!
//! This module provides the narrow interface the rest of the app depends on
//! and the implementations behind it.
//!
//! # Architecture
//!
//! - **config**: backend settings (remote model, offline model paths)
//! - **media**: loading recordings and inferring their MIME type
//! - **prompts**: instruction text for each capability
//! - **gemini**: remote implementation over the Gemini REST API
//! - **local**: offline implementation (feature `local-models`)
//! - **pipeline**: worker thread that runs calls off the UI thread
//!
//! # Usage
//!
//! ```rust,ignore
//! use minutes_studio::gateway::{GatewayPipeline, GeminiGateway, GatewayRequest, PendingRequest};
//! use std::sync::Arc;
//!
//! let gateway = Arc::new(GeminiGateway::new(config)?);
//! let pipeline = GatewayPipeline::new(gateway);
//! let handle = pipeline.start_worker()?;
//!
//! handle.submit(PendingRequest::new(GatewayRequest::Summarize {
//!     transcription: meeting.transcription.clone(),
//! }))?;
//! ```

pub mod config;
pub mod gemini;
#[cfg(feature = "local-models")]
pub mod local;
pub mod media;
pub mod pipeline;
pub mod prompts;

pub use config::{GeminiConfig, LocalModelConfig};
pub use gemini::GeminiGateway;
#[cfg(feature = "local-models")]
pub use local::LocalGateway;
pub use media::{mime_type_for, suggested_title, MediaFile};
pub use pipeline::{
    GatewayCommand, GatewayEvent, GatewayOutcome, GatewayPipeline, GatewayRequest, PendingRequest,
    PipelineHandle,
};

use crate::store::ChatMessage;
use crate::Result;

/// Everything a chat answer may draw on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryContext {
    pub transcription: String,
    pub minutes: Option<String>,
    pub decisions: Option<String>,
    /// Turns that preceded the question, oldest first
    pub history: Vec<ChatMessage>,
}

impl QueryContext {
    pub fn new(transcription: impl Into<String>) -> Self {
        Self {
            transcription: transcription.into(),
            ..Default::default()
        }
    }
}

/// The capability set the app needs from a text/multimodal model
///
/// Calls block until the backend answers; callers run them on the
/// pipeline worker thread. Failures are returned, never retried.
pub trait AiGateway: Send + Sync {
    /// Transcribe a recording. Fails if the backend produced no text.
    fn transcribe(&self, media: &MediaFile) -> Result<String>;

    /// Structured minutes of a transcript
    fn summarize(&self, transcription: &str) -> Result<String>;

    /// Plain numbered list of the decisions found in a transcript
    fn extract_decisions(&self, transcription: &str) -> Result<String>;

    /// Free-text answer to a question about the meeting
    fn answer_query(&self, query: &str, context: &QueryContext) -> Result<String>;
}

/// The four user-triggered action groups, one call in flight each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayAction {
    Transcription,
    Minutes,
    Decisions,
    Chat,
}

impl GatewayAction {
    /// Message shown to the user when a call of this kind fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            GatewayAction::Transcription => {
                "Failed to process the file. Check that the format is supported and try again."
            }
            GatewayAction::Minutes => "Error generating the minutes. Please try again.",
            GatewayAction::Decisions => "Error extracting decisions. Please try again.",
            GatewayAction::Chat => "An error occurred while processing your message.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayAction::Transcription => "transcription",
            GatewayAction::Minutes => "minutes",
            GatewayAction::Decisions => "decisions",
            GatewayAction::Chat => "chat",
        }
    }
}

/// Use `text` unless the model returned nothing
pub(crate) fn text_or_fallback(text: Option<String>, fallback: &str) -> String {
    match text {
        Some(text) if !text.trim().is_empty() => text,
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_or_fallback() {
        assert_eq!(text_or_fallback(Some("ok".into()), "fb"), "ok");
        assert_eq!(text_or_fallback(Some("   ".into()), "fb"), "fb");
        assert_eq!(text_or_fallback(None, "fb"), "fb");
    }

    #[test]
    fn test_every_action_has_failure_message() {
        for action in [
            GatewayAction::Transcription,
            GatewayAction::Minutes,
            GatewayAction::Decisions,
            GatewayAction::Chat,
        ] {
            assert!(!action.failure_message().is_empty());
        }
    }
}
