//! Transient state of the meeting currently open
//!
//! A workspace lives exactly as long as its meeting stays selected. Minutes,
//! decisions and the chat are produced on demand by gateway calls, each action
//! having its own in-flight slot that holds the id of the pending request.
//! Results whose id does not match a slot are dropped.

use crate::gateway::{
    GatewayAction, GatewayOutcome, GatewayRequest, PendingRequest, QueryContext,
};
use crate::store::{ChatMessage, Meeting};
use tracing::{debug, warn};
use uuid::Uuid;

/// What applying a gateway outcome did to the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceUpdate {
    /// Not addressed to this workspace
    Stale,
    /// Result stored
    Applied,
    /// The call failed; the action can be retried
    Failed { message: &'static str },
}

#[derive(Debug, Clone)]
pub struct MeetingWorkspace {
    meeting: Meeting,
    minutes: Option<String>,
    decisions: Option<String>,
    chat: Vec<ChatMessage>,
    /// Text currently typed into the chat box
    pub chat_input: String,
    pending_minutes: Option<Uuid>,
    pending_decisions: Option<Uuid>,
    pending_chat: Option<Uuid>,
}

impl MeetingWorkspace {
    pub fn new(meeting: Meeting) -> Self {
        Self {
            meeting,
            minutes: None,
            decisions: None,
            chat: Vec::new(),
            chat_input: String::new(),
            pending_minutes: None,
            pending_decisions: None,
            pending_chat: None,
        }
    }

    pub fn meeting(&self) -> &Meeting {
        &self.meeting
    }

    pub fn minutes(&self) -> Option<&str> {
        self.minutes.as_deref()
    }

    pub fn decisions(&self) -> Option<&str> {
        self.decisions.as_deref()
    }

    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    pub fn is_pending(&self, action: GatewayAction) -> bool {
        match action {
            GatewayAction::Minutes => self.pending_minutes.is_some(),
            GatewayAction::Decisions => self.pending_decisions.is_some(),
            GatewayAction::Chat => self.pending_chat.is_some(),
            GatewayAction::Transcription => false,
        }
    }

    pub fn can_generate_minutes(&self) -> bool {
        self.minutes.is_none() && self.pending_minutes.is_none()
    }

    pub fn can_extract_decisions(&self) -> bool {
        self.decisions.is_none() && self.pending_decisions.is_none()
    }

    pub fn can_send_chat(&self) -> bool {
        self.pending_chat.is_none() && !self.chat_input.trim().is_empty()
    }

    /// Request minutes, unless they exist or are already being generated
    pub fn request_minutes(&mut self) -> Option<PendingRequest> {
        if !self.can_generate_minutes() {
            debug!("Minutes request ignored for meeting {}", self.meeting.id);
            return None;
        }
        let pending = PendingRequest::new(GatewayRequest::Summarize {
            transcription: self.meeting.transcription.clone(),
        });
        self.pending_minutes = Some(pending.id);
        Some(pending)
    }

    /// Request the decision list, unless it exists or is already being extracted
    pub fn request_decisions(&mut self) -> Option<PendingRequest> {
        if !self.can_extract_decisions() {
            debug!("Decisions request ignored for meeting {}", self.meeting.id);
            return None;
        }
        let pending = PendingRequest::new(GatewayRequest::ExtractDecisions {
            transcription: self.meeting.transcription.clone(),
        });
        self.pending_decisions = Some(pending.id);
        Some(pending)
    }

    /// Append the user's turn and build the request for the answer
    ///
    /// The context carries the turns that preceded this question. Rejected
    /// while an answer is pending or when `query` is blank; otherwise the
    /// text is kept exactly as typed.
    pub fn submit_chat(&mut self, query: &str) -> Option<PendingRequest> {
        if query.trim().is_empty() || self.pending_chat.is_some() {
            return None;
        }

        let context = QueryContext {
            transcription: self.meeting.transcription.clone(),
            minutes: self.minutes.clone(),
            decisions: self.decisions.clone(),
            history: self.chat.clone(),
        };
        self.chat.push(ChatMessage::user(query));

        let pending = PendingRequest::new(GatewayRequest::AnswerQuery {
            query: query.to_string(),
            context,
        });
        self.pending_chat = Some(pending.id);
        Some(pending)
    }

    /// Submit whatever is in the chat box, clearing it on success
    pub fn submit_chat_input(&mut self) -> Option<PendingRequest> {
        let query = self.chat_input.clone();
        let pending = self.submit_chat(&query)?;
        self.chat_input.clear();
        Some(pending)
    }

    /// Store the result of a call this workspace issued
    pub fn apply(&mut self, outcome: &GatewayOutcome) -> WorkspaceUpdate {
        let slot = match outcome.action {
            GatewayAction::Minutes => &mut self.pending_minutes,
            GatewayAction::Decisions => &mut self.pending_decisions,
            GatewayAction::Chat => &mut self.pending_chat,
            GatewayAction::Transcription => return WorkspaceUpdate::Stale,
        };
        if *slot != Some(outcome.request_id) {
            debug!(
                "Dropping stale {} result {}",
                outcome.action.as_str(),
                outcome.request_id
            );
            return WorkspaceUpdate::Stale;
        }
        *slot = None;

        match (&outcome.result, outcome.action) {
            (Ok(text), GatewayAction::Minutes) => self.minutes = Some(text.clone()),
            (Ok(text), GatewayAction::Decisions) => self.decisions = Some(text.clone()),
            (Ok(text), _) => self.chat.push(ChatMessage::model(text.clone())),
            (Err(error), GatewayAction::Chat) => {
                warn!("Chat answer failed: {}", error);
                self.chat
                    .push(ChatMessage::model(GatewayAction::Chat.failure_message()));
            }
            (Err(error), action) => {
                warn!("{} failed: {}", action.as_str(), error);
                return WorkspaceUpdate::Failed {
                    message: action.failure_message(),
                };
            }
        }
        WorkspaceUpdate::Applied
    }

    /// Clear the slot of a request that never reached the worker
    pub fn abandon(&mut self, request_id: Uuid) {
        for slot in [
            &mut self.pending_minutes,
            &mut self.pending_decisions,
            &mut self.pending_chat,
        ] {
            if *slot == Some(request_id) {
                *slot = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ChatRole;
    use crate::StudioError;

    fn workspace() -> MeetingWorkspace {
        MeetingWorkspace::new(Meeting::new("p1", "Kickoff", "we decided to ship"))
    }

    fn ok(pending: &PendingRequest, text: &str) -> GatewayOutcome {
        GatewayOutcome {
            request_id: pending.id,
            action: pending.action(),
            result: Ok(text.to_string()),
        }
    }

    fn failed(pending: &PendingRequest) -> GatewayOutcome {
        GatewayOutcome {
            request_id: pending.id,
            action: pending.action(),
            result: Err(StudioError::Gateway("503".to_string())),
        }
    }

    #[test]
    fn test_minutes_requested_once() {
        let mut ws = workspace();
        let pending = ws.request_minutes().unwrap();
        assert!(ws.is_pending(GatewayAction::Minutes));
        assert!(ws.request_minutes().is_none());

        assert_eq!(ws.apply(&ok(&pending, "# Minutes")), WorkspaceUpdate::Applied);
        assert_eq!(ws.minutes(), Some("# Minutes"));
        assert!(!ws.can_generate_minutes());
        assert!(ws.request_minutes().is_none());
    }

    #[test]
    fn test_minutes_request_carries_transcription() {
        let mut ws = workspace();
        match ws.request_minutes().unwrap().request {
            GatewayRequest::Summarize { transcription } => {
                assert_eq!(transcription, "we decided to ship")
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_failed_decisions_can_be_retried() {
        let mut ws = workspace();
        let pending = ws.request_decisions().unwrap();

        let update = ws.apply(&failed(&pending));
        assert_eq!(
            update,
            WorkspaceUpdate::Failed {
                message: GatewayAction::Decisions.failure_message()
            }
        );
        assert!(ws.decisions().is_none());
        assert!(ws.can_extract_decisions());
        assert!(ws.request_decisions().is_some());
    }

    #[test]
    fn test_actions_are_independent() {
        let mut ws = workspace();
        assert!(ws.request_minutes().is_some());
        assert!(ws.request_decisions().is_some());
        ws.chat_input = "hello".to_string();
        assert!(ws.can_send_chat());
    }

    #[test]
    fn test_chat_turn_order() {
        let mut ws = workspace();
        let pending = ws.submit_chat("What was decided?").unwrap();
        assert_eq!(ws.chat().len(), 1);
        assert_eq!(ws.chat()[0].role, ChatRole::User);

        ws.apply(&ok(&pending, "To ship."));
        let turns: Vec<_> = ws.chat().iter().map(|m| (m.role, m.text.as_str())).collect();
        assert_eq!(
            turns,
            vec![
                (ChatRole::User, "What was decided?"),
                (ChatRole::Model, "To ship.")
            ]
        );
    }

    #[test]
    fn test_chat_context_excludes_current_question() {
        let mut ws = workspace();
        let first = ws.submit_chat("one").unwrap();
        ws.apply(&ok(&first, "1"));

        match ws.submit_chat("two").unwrap().request {
            GatewayRequest::AnswerQuery { query, context } => {
                assert_eq!(query, "two");
                assert_eq!(context.history.len(), 2);
                assert_eq!(context.history[0].text, "one");
                assert_eq!(context.minutes, None);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_chat_rejected_while_pending_or_blank() {
        let mut ws = workspace();
        assert!(ws.submit_chat("   ").is_none());
        assert!(ws.submit_chat("first").is_some());
        assert!(ws.submit_chat("second").is_none());
        assert_eq!(ws.chat().len(), 1);
    }

    #[test]
    fn test_chat_failure_appends_error_turn() {
        let mut ws = workspace();
        let pending = ws.submit_chat("hi").unwrap();
        assert_eq!(ws.apply(&failed(&pending)), WorkspaceUpdate::Applied);

        let last = ws.chat().last().unwrap();
        assert_eq!(last.role, ChatRole::Model);
        assert_eq!(
            last.text,
            "An error occurred while processing your message."
        );
        assert!(!ws.is_pending(GatewayAction::Chat));
    }

    #[test]
    fn test_submit_chat_input_keeps_text_as_typed() {
        let mut ws = workspace();
        ws.chat_input = "  question  ".to_string();
        let pending = ws.submit_chat_input().unwrap();
        assert!(ws.chat_input.is_empty());
        assert_eq!(ws.chat()[0].text, "  question  ");
        match pending.request {
            GatewayRequest::AnswerQuery { query, .. } => assert_eq!(query, "  question  "),
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_foreign_outcome_is_stale() {
        let mut ws = workspace();
        ws.request_minutes().unwrap();

        let mut other = workspace();
        let foreign = other.request_minutes().unwrap();

        assert_eq!(ws.apply(&ok(&foreign, "nope")), WorkspaceUpdate::Stale);
        assert!(ws.minutes().is_none());
        assert!(ws.is_pending(GatewayAction::Minutes));
    }

    #[test]
    fn test_abandon_frees_slot() {
        let mut ws = workspace();
        let pending = ws.request_minutes().unwrap();
        ws.abandon(pending.id);
        assert!(ws.can_generate_minutes());
    }
}
