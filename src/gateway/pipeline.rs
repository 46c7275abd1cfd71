//! Gateway pipeline that runs AI calls off the UI thread
//!
//! Requests go in over a command channel, results come back as events
//! tagged with the id the caller chose, so the UI can tell whether the
//! result still belongs to what is on screen.

use super::media::MediaFile;
use super::{AiGateway, GatewayAction, QueryContext};
use crate::{Result, StudioError};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One call to the gateway
#[derive(Debug, Clone)]
pub enum GatewayRequest {
    Transcribe {
        media: MediaFile,
    },
    Summarize {
        transcription: String,
    },
    ExtractDecisions {
        transcription: String,
    },
    AnswerQuery {
        query: String,
        context: QueryContext,
    },
}

impl GatewayRequest {
    pub fn action(&self) -> GatewayAction {
        match self {
            GatewayRequest::Transcribe { .. } => GatewayAction::Transcription,
            GatewayRequest::Summarize { .. } => GatewayAction::Minutes,
            GatewayRequest::ExtractDecisions { .. } => GatewayAction::Decisions,
            GatewayRequest::AnswerQuery { .. } => GatewayAction::Chat,
        }
    }

    /// Execute the request against a gateway, blocking until it answers
    pub fn run(&self, gateway: &dyn AiGateway) -> Result<String> {
        match self {
            GatewayRequest::Transcribe { media } => gateway.transcribe(media),
            GatewayRequest::Summarize { transcription } => gateway.summarize(transcription),
            GatewayRequest::ExtractDecisions { transcription } => {
                gateway.extract_decisions(transcription)
            }
            GatewayRequest::AnswerQuery { query, context } => gateway.answer_query(query, context),
        }
    }
}

/// A request together with the id its result will carry
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub id: Uuid,
    pub request: GatewayRequest,
}

impl PendingRequest {
    pub fn new(request: GatewayRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
        }
    }

    pub fn action(&self) -> GatewayAction {
        self.request.action()
    }
}

/// Commands that can be sent to the pipeline
#[derive(Debug)]
pub enum GatewayCommand {
    /// Run a request
    Run(PendingRequest),

    /// Stop the worker
    Shutdown,
}

/// Events emitted by the pipeline
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// The gateway answered
    Completed {
        request_id: Uuid,
        action: GatewayAction,
        text: String,
    },

    /// The call failed
    Failed {
        request_id: Uuid,
        action: GatewayAction,
        error: StudioError,
    },

    /// Worker has stopped
    Shutdown,
}

impl GatewayEvent {
    pub fn request_id(&self) -> Option<Uuid> {
        match self {
            GatewayEvent::Completed { request_id, .. } | GatewayEvent::Failed { request_id, .. } => {
                Some(*request_id)
            }
            GatewayEvent::Shutdown => None,
        }
    }
}

/// Result of a request as seen by whoever issued it
#[derive(Debug, Clone)]
pub struct GatewayOutcome {
    pub request_id: Uuid,
    pub action: GatewayAction,
    pub result: std::result::Result<String, StudioError>,
}

impl GatewayOutcome {
    pub fn from_event(event: GatewayEvent) -> Option<Self> {
        match event {
            GatewayEvent::Completed {
                request_id,
                action,
                text,
            } => Some(Self {
                request_id,
                action,
                result: Ok(text),
            }),
            GatewayEvent::Failed {
                request_id,
                action,
                error,
            } => Some(Self {
                request_id,
                action,
                result: Err(error),
            }),
            GatewayEvent::Shutdown => None,
        }
    }
}

/// Gateway pipeline with channel-based communication
pub struct GatewayPipeline {
    gateway: Arc<dyn AiGateway>,
    command_tx: Sender<GatewayCommand>,
    command_rx: Receiver<GatewayCommand>,
    event_tx: Sender<GatewayEvent>,
    event_rx: Receiver<GatewayEvent>,
}

impl GatewayPipeline {
    pub fn new(gateway: Arc<dyn AiGateway>) -> Self {
        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        Self {
            gateway,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    /// Spawn the worker thread
    ///
    /// Requests are executed one at a time in submission order.
    pub fn start_worker(self) -> Result<PipelineHandle> {
        let gateway = Arc::clone(&self.gateway);
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();

        let worker = std::thread::Builder::new()
            .name("gateway-worker".to_string())
            .spawn(move || {
                info!("Gateway worker ready");

                while let Ok(command) = command_rx.recv() {
                    match command {
                        GatewayCommand::Run(pending) => {
                            let action = pending.action();
                            let request_id = pending.id;
                            debug!("Running {} request {}", action.as_str(), request_id);

                            let started = Instant::now();
                            let event = match pending.request.run(gateway.as_ref()) {
                                Ok(text) => GatewayEvent::Completed {
                                    request_id,
                                    action,
                                    text,
                                },
                                Err(error) => {
                                    warn!("{} request {} failed: {}", action.as_str(), request_id, error);
                                    GatewayEvent::Failed {
                                        request_id,
                                        action,
                                        error,
                                    }
                                }
                            };
                            debug!(
                                "{} request {} finished in {}ms",
                                action.as_str(),
                                request_id,
                                started.elapsed().as_millis()
                            );

                            if event_tx.send(event).is_err() {
                                break;
                            }
                        }
                        GatewayCommand::Shutdown => break,
                    }
                }

                info!("Gateway worker shutting down");
                let _ = event_tx.send(GatewayEvent::Shutdown);
            })
            .map_err(|e| StudioError::Channel(format!("Failed to spawn gateway worker: {}", e)))?;

        Ok(PipelineHandle {
            command_tx: self.command_tx,
            event_rx: self.event_rx,
            worker: Some(worker),
        })
    }
}

/// Handle for a running pipeline, owned by the UI state
pub struct PipelineHandle {
    command_tx: Sender<GatewayCommand>,
    event_rx: Receiver<GatewayEvent>,
    worker: Option<JoinHandle<()>>,
}

impl PipelineHandle {
    /// Queue a request for the worker
    pub fn submit(&self, pending: PendingRequest) -> Result<()> {
        self.command_tx
            .send(GatewayCommand::Run(pending))
            .map_err(|e| StudioError::Channel(format!("Failed to send request: {}", e)))
    }

    /// Next finished event, if any, without blocking
    pub fn try_recv(&self) -> Option<GatewayEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Wait for the next event
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<GatewayEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Ask the worker to stop once the current call returns
    pub fn shutdown(&mut self) {
        let _ = self.command_tx.send(GatewayCommand::Shutdown);
        // Detach: an in-flight call has no timeout and cannot be cancelled
        self.worker.take();
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
