use std::fmt;
use std::str::FromStr;

/// Identifier issued by the state machine for every outgoing request.
pub type RequestId = u64;

/// Kind of document being ingested. The wire tag is the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Email,
    Transcription,
    Note,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Email, Category::Transcription, Category::Note];

    pub fn as_tag(self) -> &'static str {
        match self {
            Category::Email => "email",
            Category::Transcription => "transcription",
            Category::Note => "note",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown category '{}' (expected email, transcription or note)",
            self.0
        )
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_tag().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(trimmed.to_string()))
    }
}

/// Client-side document identifier, `<category>-<unix millis>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocId(String);

impl DocId {
    pub(crate) fn new(category: Category, stamp_millis: i64) -> Self {
        Self(format!("{}-{}", category.as_tag(), stamp_millis))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSubmission {
    pub content: String,
    pub doc_id: DocId,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub target_date: chrono::NaiveDate,
    pub guidance: String,
}

/// Why a request did not succeed, as reported back by the IO layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The request never produced an HTTP response.
    Transport(String),
    /// The backend answered with a non-2xx status.
    Status {
        code: u16,
        reason: String,
        detail: Option<String>,
    },
}

/// Lifecycle of a single workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<T> {
    Idle,
    InFlight {
        request: RequestId,
    },
    Succeeded(T),
    Failed(String),
}

impl<T> Default for Phase<T> {
    fn default() -> Self {
        Phase::Idle
    }
}

impl<T> Phase<T> {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Phase::InFlight { .. })
    }

    pub fn in_flight_request(&self) -> Option<RequestId> {
        match self {
            Phase::InFlight { request } => Some(*request),
            _ => None,
        }
    }
}
