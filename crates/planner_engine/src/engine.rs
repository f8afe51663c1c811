use std::sync::{mpsc, Arc};
use std::thread;

use planner_logging::{planner_debug, planner_warn};

use crate::client::{Backend, BackendSettings, HttpBackend};
use crate::{ApiError, EngineEvent, IngestDocument, PlanQuery, RequestId};

/// Receives completed requests. Called from runtime worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] ApiError),
}

enum EngineCommand {
    FetchStatus {
        request: RequestId,
    },
    Ingest {
        request: RequestId,
        document: IngestDocument,
    },
    GeneratePlan {
        request: RequestId,
        query: PlanQuery,
    },
}

/// Runs backend requests on a dedicated tokio runtime.
///
/// Every command becomes its own task, so requests for different workflows
/// proceed concurrently. Dropping the handle stops the runtime and abandons
/// whatever is still in flight.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: &BackendSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let backend = HttpBackend::new(settings)?;
        Self::with_backend(Arc::new(backend), sink)
    }

    pub fn with_backend(
        backend: Arc<dyn Backend>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    let event = handle_command(backend.as_ref(), command).await;
                    sink.emit(event);
                });
            }
            planner_debug!("Engine command channel closed; shutting down runtime");
        });

        Ok(Self { cmd_tx })
    }

    pub fn fetch_status(&self, request: RequestId) {
        self.send(EngineCommand::FetchStatus { request });
    }

    pub fn ingest(&self, request: RequestId, document: IngestDocument) {
        self.send(EngineCommand::Ingest { request, document });
    }

    pub fn generate_plan(&self, request: RequestId, query: PlanQuery) {
        self.send(EngineCommand::GeneratePlan { request, query });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            planner_warn!("Engine thread is gone; dropping command");
        }
    }
}

async fn handle_command(backend: &dyn Backend, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::FetchStatus { request } => EngineEvent::StatusLoaded {
            request,
            result: backend.document_count().await,
        },
        EngineCommand::Ingest { request, document } => {
            let result = backend.ingest_text(&document).await;
            EngineEvent::IngestFinished {
                request,
                doc_id: document.doc_id,
                result,
            }
        }
        EngineCommand::GeneratePlan { request, query } => EngineEvent::PlanFinished {
            request,
            result: backend.generate_plan(&query).await,
        },
    }
}
