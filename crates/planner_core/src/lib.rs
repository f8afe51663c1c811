//! Planner core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod types;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, INGEST_PROGRESS_TEXT, PLAN_INITIAL_TEXT, PLAN_PLACEHOLDER_TEXT};
pub use types::{
    Category, DocId, DocumentSubmission, Failure, Phase, PlanRequest, RequestId, UnknownCategory,
};
pub use update::{update, EMPTY_CONTENT_MESSAGE};
pub use view_model::{AppViewModel, IngestView, PlanView, StatusView};
