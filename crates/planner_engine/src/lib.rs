//! Planner engine: backend HTTP client and request execution.
mod client;
mod engine;
mod types;
mod wire;

pub use client::{Backend, BackendSettings, HttpBackend, DEFAULT_BASE_URL};
pub use engine::{ChannelEventSink, EngineError, EngineHandle, EventSink};
pub use types::{ApiError, EngineEvent, FailureKind, IngestDocument, PlanQuery, RequestId};
