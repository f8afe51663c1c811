use std::sync::{mpsc, Arc};

use planner_core::{Effect, Failure, Msg};
use planner_engine::{
    ApiError, BackendSettings, EngineError, EngineEvent, EngineHandle, EventSink,
    FailureKind, IngestDocument, PlanQuery,
};
use planner_logging::{planner_info, planner_warn};

/// Executes core effects on the engine and feeds results back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: &BackendSettings, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings, Arc::new(MsgSink { tx: msg_tx }))?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchStatus { request } => {
                    self.engine.fetch_status(request);
                }
                Effect::SubmitIngest {
                    request,
                    submission,
                } => {
                    planner_info!(
                        "SubmitIngest request={} doc_id={} content_len={}",
                        request,
                        submission.doc_id,
                        submission.content.len()
                    );
                    self.engine.ingest(
                        request,
                        IngestDocument {
                            content: submission.content,
                            doc_id: submission.doc_id.to_string(),
                            source_type: submission.category.as_tag().to_string(),
                        },
                    );
                }
                Effect::GeneratePlan { request, plan } => {
                    planner_info!(
                        "GeneratePlan request={} target_date={}",
                        request,
                        plan.target_date
                    );
                    self.engine.generate_plan(
                        request,
                        PlanQuery {
                            target_date: plan.target_date,
                            guidance: plan.guidance,
                        },
                    );
                }
            }
        }
    }
}

struct MsgSink {
    tx: mpsc::Sender<Msg>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(map_event(event));
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StatusLoaded { request, result } => Msg::StatusLoaded {
            request,
            result: result.map_err(map_failure),
        },
        EngineEvent::IngestFinished {
            request,
            doc_id,
            result,
        } => {
            if let Err(err) = &result {
                planner_warn!("Ingest of {} failed: {}", doc_id, err);
            }
            Msg::IngestFinished {
                request,
                result: result.map_err(map_failure),
            }
        }
        EngineEvent::PlanFinished { request, result } => {
            if let Err(err) = &result {
                planner_warn!("Plan request {} failed: {}", request, err);
            }
            Msg::PlanFinished {
                request,
                result: result.map_err(map_failure),
            }
        }
    }
}

fn map_failure(err: ApiError) -> Failure {
    match err.kind {
        FailureKind::HttpStatus(code) => Failure::Status {
            code,
            reason: err.message,
            detail: err.detail,
        },
        FailureKind::InvalidUrl
        | FailureKind::Timeout
        | FailureKind::Decode
        | FailureKind::Network => Failure::Transport(err.to_string()),
    }
}
