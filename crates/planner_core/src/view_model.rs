use chrono::NaiveDate;

use crate::{Category, DocId, Phase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub status: StatusView,
    pub ingest: IngestView,
    pub plan: PlanView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    /// `None` until the first count arrives.
    pub document_count: Option<u64>,
    pub refreshing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestView {
    pub content: String,
    pub category: Category,
    pub phase: Phase<DocId>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanView {
    pub target_date: NaiveDate,
    pub guidance: String,
    pub in_flight: bool,
    pub failed: bool,
    pub text: String,
}

impl StatusView {
    pub fn label(&self) -> String {
        match self.document_count {
            Some(1) => "1 document indexed".to_string(),
            Some(count) => format!("{count} documents indexed"),
            None => "Loading...".to_string(),
        }
    }
}

impl IngestView {
    pub fn in_flight(&self) -> bool {
        self.phase.is_in_flight()
    }
}
