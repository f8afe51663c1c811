use std::fmt;

use chrono::NaiveDate;

pub type RequestId = u64;

/// Document to index, already carrying its client-generated id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestDocument {
    pub content: String,
    pub doc_id: String,
    pub source_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanQuery {
    pub target_date: NaiveDate,
    pub guidance: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    StatusLoaded {
        request: RequestId,
        result: Result<u64, ApiError>,
    },
    IngestFinished {
        request: RequestId,
        doc_id: String,
        result: Result<(), ApiError>,
    },
    PlanFinished {
        request: RequestId,
        result: Result<String, ApiError>,
    },
}

impl EngineEvent {
    pub fn request(&self) -> RequestId {
        match self {
            EngineEvent::StatusLoaded { request, .. }
            | EngineEvent::IngestFinished { request, .. }
            | EngineEvent::PlanFinished { request, .. } => *request,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
    /// `detail` field of a JSON error body, when the backend sent one.
    pub detail: Option<String>,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            FailureKind::HttpStatus(code) => Some(code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "invalid response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
