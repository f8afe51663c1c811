use std::sync::Once;

use chrono::NaiveDate;
use planner_core::{
    update, AppState, Category, DocId, Effect, Failure, Msg, Phase, EMPTY_CONTENT_MESSAGE,
    INGEST_PROGRESS_TEXT,
};
use pretty_assertions::assert_eq;

const NOW: i64 = 1_717_000_000_000;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(planner_logging::initialize_for_tests);
}

fn fresh_state() -> AppState {
    AppState::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
}

fn submit(
    state: AppState,
    content: &str,
    category: Category,
    now_millis: i64,
) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::IngestContentChanged(content.to_string()));
    let (state, _) = update(state, Msg::IngestCategoryChanged(category));
    update(state, Msg::IngestSubmitted { now_millis })
}

fn ingest_effect(effects: &[Effect]) -> (u64, DocId) {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SubmitIngest {
                request,
                submission,
            } => Some((*request, submission.doc_id.clone())),
            _ => None,
        })
        .expect("ingest effect")
}

#[test]
fn note_submission_uses_category_timestamp_id() {
    init_logging();
    let (state, effects) = submit(fresh_state(), "Meeting notes", Category::Note, NOW);

    assert_eq!(effects.len(), 1);
    match &effects[0] {
        Effect::SubmitIngest { submission, .. } => {
            assert_eq!(submission.content, "Meeting notes");
            assert_eq!(submission.category, Category::Note);
            assert_eq!(submission.doc_id.as_str(), format!("note-{NOW}"));
        }
        other => panic!("unexpected effect {other:?}"),
    }

    let view = state.view();
    assert!(view.ingest.in_flight());
    assert_eq!(view.ingest.message, INGEST_PROGRESS_TEXT);
    // Content stays until the backend confirms.
    assert_eq!(view.ingest.content, "Meeting notes");
}

#[test]
fn success_clears_content_and_refreshes_status_once() {
    init_logging();
    let (state, effects) = submit(fresh_state(), "Meeting notes", Category::Note, NOW);
    let (request, doc_id) = ingest_effect(&effects);

    let (state, effects) = update(
        state,
        Msg::IngestFinished {
            request,
            result: Ok(()),
        },
    );

    let refreshes = effects
        .iter()
        .filter(|effect| matches!(effect, Effect::FetchStatus { .. }))
        .count();
    assert_eq!(refreshes, 1);
    assert_eq!(effects.len(), 1);

    let view = state.view();
    assert_eq!(view.ingest.content, "");
    assert_eq!(view.ingest.phase, Phase::Succeeded(doc_id.clone()));
    assert!(view.ingest.message.contains(doc_id.as_str()));
    assert!(view.status.refreshing);
}

#[test]
fn empty_content_is_rejected_without_a_request() {
    init_logging();
    let (mut state, effects) = submit(fresh_state(), "", Category::Email, NOW);

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.ingest.phase, Phase::Failed(EMPTY_CONTENT_MESSAGE.to_string()));
    assert_eq!(view.ingest.message, EMPTY_CONTENT_MESSAGE);
    assert!(!state.is_busy());
    assert!(state.consume_dirty());
}

#[test]
fn second_submission_while_in_flight_is_ignored() {
    init_logging();
    let (state, first) = submit(fresh_state(), "first", Category::Email, NOW);
    assert_eq!(first.len(), 1);
    let before = state.view();

    let (state, second) = update(state, Msg::IngestSubmitted { now_millis: NOW + 5 });

    assert!(second.is_empty());
    assert_eq!(state.view(), before);
}

#[test]
fn failure_keeps_content_and_shows_server_detail() {
    init_logging();
    let (state, effects) = submit(fresh_state(), "keep me", Category::Email, NOW);
    let (request, _) = ingest_effect(&effects);

    let (state, effects) = update(
        state,
        Msg::IngestFinished {
            request,
            result: Err(Failure::Status {
                code: 422,
                reason: "Unprocessable Entity".to_string(),
                detail: Some("content too short".to_string()),
            }),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.ingest.content, "keep me");
    assert_eq!(view.ingest.message, "Error: content too short");
    assert!(matches!(view.ingest.phase, Phase::Failed(_)));
    assert_eq!(view.status.document_count, None);
    assert!(!view.status.refreshing);
}

#[test]
fn failure_without_detail_uses_generic_message() {
    init_logging();
    let (state, effects) = submit(fresh_state(), "text", Category::Transcription, NOW);
    let (request, _) = ingest_effect(&effects);

    let (state, _) = update(
        state,
        Msg::IngestFinished {
            request,
            result: Err(Failure::Status {
                code: 500,
                reason: "Internal Server Error".to_string(),
                detail: None,
            }),
        },
    );
    assert_eq!(
        state.view().ingest.message,
        "Error: Server error while indexing (500)"
    );

    let (state, effects) = update(state, Msg::IngestSubmitted { now_millis: NOW + 1 });
    let (request, _) = ingest_effect(&effects);
    let (state, _) = update(
        state,
        Msg::IngestFinished {
            request,
            result: Err(Failure::Transport("connection refused".to_string())),
        },
    );
    assert_eq!(state.view().ingest.message, "Error: connection refused");
}

#[test]
fn retry_after_failure_is_allowed() {
    init_logging();
    let (state, effects) = submit(fresh_state(), "retry me", Category::Email, NOW);
    let (request, _) = ingest_effect(&effects);
    let (state, _) = update(
        state,
        Msg::IngestFinished {
            request,
            result: Err(Failure::Transport("offline".to_string())),
        },
    );

    let (_state, effects) = update(state, Msg::IngestSubmitted { now_millis: NOW + 10 });
    let (_, doc_id) = ingest_effect(&effects);
    assert_eq!(doc_id.as_str(), format!("email-{}", NOW + 10));
}

#[test]
fn doc_ids_stay_unique_when_clock_does_not_advance() {
    init_logging();
    let mut state = fresh_state();
    let mut ids = Vec::new();
    for _ in 0..3 {
        let (next, effects) = submit(state, "same instant", Category::Email, NOW);
        let (request, doc_id) = ingest_effect(&effects);
        let (next, _) = update(
            next,
            Msg::IngestFinished {
                request,
                result: Ok(()),
            },
        );
        ids.push(doc_id.as_str().to_string());
        state = next;
    }

    assert_eq!(
        ids,
        vec![
            format!("email-{NOW}"),
            format!("email-{}", NOW + 1),
            format!("email-{}", NOW + 2),
        ]
    );
}

#[test]
fn doc_id_stamp_saturates_at_clock_maximum() {
    init_logging();
    let mut state = fresh_state();
    let mut ids = Vec::new();
    for _ in 0..2 {
        let (next, effects) = submit(state, "end of time", Category::Note, i64::MAX);
        let (request, doc_id) = ingest_effect(&effects);
        let (next, _) = update(
            next,
            Msg::IngestFinished {
                request,
                result: Ok(()),
            },
        );
        ids.push(doc_id.as_str().to_string());
        state = next;
    }

    assert_eq!(ids, vec![format!("note-{}", i64::MAX); 2]);
}

#[test]
fn stale_ingest_response_is_ignored() {
    init_logging();
    let (state, effects) = submit(fresh_state(), "doc", Category::Note, NOW);
    let (request, _) = ingest_effect(&effects);
    let before = state.view();

    let (state, effects) = update(
        state,
        Msg::IngestFinished {
            request: request + 100,
            result: Ok(()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.view(), before);
}
