use chrono::NaiveDate;

use crate::{Category, Failure, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Frontend finished setting up; loads the initial document count.
    Mounted,
    /// User asked for a fresh document count.
    RefreshStatus,
    /// Engine answered a status request.
    StatusLoaded {
        request: RequestId,
        result: Result<u64, Failure>,
    },
    /// User edited the document text.
    IngestContentChanged(String),
    /// User picked a document category.
    IngestCategoryChanged(Category),
    /// User submitted the document. `now_millis` is the frontend's clock reading.
    IngestSubmitted { now_millis: i64 },
    /// Engine finished an ingest request.
    IngestFinished {
        request: RequestId,
        result: Result<(), Failure>,
    },
    /// User edited the plan date.
    PlanDateChanged(NaiveDate),
    /// User edited the plan guidance.
    PlanGuidanceChanged(String),
    /// User asked for a plan.
    PlanSubmitted,
    /// Engine finished a plan request.
    PlanFinished {
        request: RequestId,
        result: Result<String, Failure>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    NoOp,
}
