use planner_logging::{planner_debug, planner_info, planner_warn};

use crate::{AppState, DocumentSubmission, Effect, Failure, Msg, PlanRequest};

pub const EMPTY_CONTENT_MESSAGE: &str = "Error: Content is empty, paste a document first.";
const INGEST_GENERIC_FAILURE: &str = "Server error while indexing";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted | Msg::RefreshStatus => {
            let request = state.begin_status_refresh();
            vec![Effect::FetchStatus { request }]
        }
        Msg::StatusLoaded { request, result } => {
            match result {
                Ok(count) => {
                    if !state.apply_status_count(request, count) {
                        planner_debug!(
                            "Dropped stale status response request={} count={}",
                            request,
                            count
                        );
                    }
                }
                Err(failure) => {
                    // The previous count stays on screen.
                    planner_warn!("Status refresh {} failed: {:?}", request, failure);
                    state.finish_status_without_count(request);
                }
            }
            Vec::new()
        }
        Msg::IngestContentChanged(content) => {
            state.set_ingest_content(content);
            Vec::new()
        }
        Msg::IngestCategoryChanged(category) => {
            state.set_ingest_category(category);
            Vec::new()
        }
        Msg::IngestSubmitted { now_millis } => {
            if state.ingest_in_flight().is_some() {
                return (state, Vec::new());
            }
            if state.ingest_content().is_empty() {
                state.reject_ingest(EMPTY_CONTENT_MESSAGE.to_string());
                return (state, Vec::new());
            }

            let doc_id = state.next_doc_id(now_millis);
            let submission = DocumentSubmission {
                content: state.ingest_content().to_string(),
                doc_id,
                category: state.ingest_category(),
            };
            let request = state.begin_ingest(submission.doc_id.clone());
            vec![Effect::SubmitIngest {
                request,
                submission,
            }]
        }
        Msg::IngestFinished { request, result } => {
            if state.ingest_in_flight() != Some(request) {
                planner_debug!("Ignoring ingest response for stale request {}", request);
                return (state, Vec::new());
            }
            match result {
                Ok(()) => match state.complete_ingest() {
                    Some(doc_id) => {
                        planner_info!("Indexed {}; refreshing document count", doc_id);
                        let request = state.begin_status_refresh();
                        vec![Effect::FetchStatus { request }]
                    }
                    None => Vec::new(),
                },
                Err(failure) => {
                    state.reject_ingest(ingest_failure_message(&failure));
                    Vec::new()
                }
            }
        }
        Msg::PlanDateChanged(date) => {
            state.set_plan_date(date);
            Vec::new()
        }
        Msg::PlanGuidanceChanged(guidance) => {
            state.set_plan_guidance(guidance);
            Vec::new()
        }
        Msg::PlanSubmitted => {
            if state.plan_in_flight().is_some() {
                return (state, Vec::new());
            }
            let plan = PlanRequest {
                target_date: state.plan_target_date(),
                guidance: state.plan_guidance().to_string(),
            };
            let request = state.begin_plan();
            vec![Effect::GeneratePlan { request, plan }]
        }
        Msg::PlanFinished { request, result } => {
            if state.plan_in_flight() != Some(request) {
                planner_debug!("Ignoring plan response for stale request {}", request);
                return (state, Vec::new());
            }
            match result {
                Ok(text) => state.complete_plan(text.trim().to_string()),
                Err(failure) => state.fail_plan(plan_failure_message(&failure)),
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn ingest_failure_message(failure: &Failure) -> String {
    match failure {
        Failure::Status {
            detail: Some(detail),
            ..
        } => format!("Error: {detail}"),
        Failure::Status { code, .. } => format!("Error: {INGEST_GENERIC_FAILURE} ({code})"),
        Failure::Transport(message) => format!("Error: {message}"),
    }
}

fn plan_failure_message(failure: &Failure) -> String {
    match failure {
        Failure::Status { code, reason, .. } if reason.is_empty() => {
            format!("Plan generation failed: server error {code}")
        }
        Failure::Status { code, reason, .. } => {
            format!("Plan generation failed: server error {code} {reason}")
        }
        Failure::Transport(message) => format!("Plan generation failed: {message}"),
    }
}
