use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::view_model::{AppViewModel, IngestView, PlanView, StatusView};
use crate::{Category, DocId, Phase, RequestId};

pub const PLAN_INITIAL_TEXT: &str = "No plan yet. Enter guidance and generate a plan.";
pub const PLAN_PLACEHOLDER_TEXT: &str = "Generating plan, please wait...";
pub const INGEST_PROGRESS_TEXT: &str = "Indexing document...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    next_request: RequestId,
    status: StatusState,
    ingest: IngestState,
    plan: PlanState,
    dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct StatusState {
    count: Option<u64>,
    last_applied: Option<RequestId>,
    pending: BTreeSet<RequestId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct IngestState {
    content: String,
    category: Category,
    phase: Phase<DocId>,
    message: String,
    pending_doc: Option<DocId>,
    last_stamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlanState {
    target_date: NaiveDate,
    guidance: String,
    phase: Phase<()>,
    text: String,
}

impl AppState {
    /// Creates the initial state. The plan date defaults to the day after `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            next_request: 1,
            status: StatusState::default(),
            ingest: IngestState::default(),
            plan: PlanState {
                target_date: today.succ_opt().unwrap_or(today),
                guidance: String::new(),
                phase: Phase::Idle,
                text: PLAN_INITIAL_TEXT.to_string(),
            },
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            status: StatusView {
                document_count: self.status.count,
                refreshing: !self.status.pending.is_empty(),
            },
            ingest: IngestView {
                content: self.ingest.content.clone(),
                category: self.ingest.category,
                phase: self.ingest.phase.clone(),
                message: self.ingest.message.clone(),
            },
            plan: PlanView {
                target_date: self.plan.target_date,
                guidance: self.plan.guidance.clone(),
                in_flight: self.plan.phase.is_in_flight(),
                failed: matches!(self.plan.phase, Phase::Failed(_)),
                text: self.plan.text.clone(),
            },
            dirty: self.dirty,
        }
    }

    /// True while any request issued by this state is still outstanding.
    pub fn is_busy(&self) -> bool {
        !self.status.pending.is_empty()
            || self.ingest.phase.is_in_flight()
            || self.plan.phase.is_in_flight()
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn issue_request(&mut self) -> RequestId {
        let request = self.next_request;
        self.next_request += 1;
        request
    }

    // Status

    pub(crate) fn begin_status_refresh(&mut self) -> RequestId {
        let request = self.issue_request();
        self.status.pending.insert(request);
        self.mark_dirty();
        request
    }

    /// Returns false when the response was older than one already applied.
    pub(crate) fn apply_status_count(&mut self, request: RequestId, count: u64) -> bool {
        self.status.pending.remove(&request);
        self.mark_dirty();
        if self
            .status
            .last_applied
            .is_some_and(|applied| applied > request)
        {
            return false;
        }
        self.status.last_applied = Some(request);
        self.status.count = Some(count);
        true
    }

    pub(crate) fn finish_status_without_count(&mut self, request: RequestId) {
        if self.status.pending.remove(&request) {
            self.mark_dirty();
        }
    }

    // Ingest

    pub(crate) fn ingest_content(&self) -> &str {
        &self.ingest.content
    }

    pub(crate) fn ingest_category(&self) -> Category {
        self.ingest.category
    }

    pub(crate) fn ingest_in_flight(&self) -> Option<RequestId> {
        self.ingest.phase.in_flight_request()
    }

    pub(crate) fn set_ingest_content(&mut self, content: String) {
        if self.ingest.content != content {
            self.ingest.content = content;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_ingest_category(&mut self, category: Category) {
        if self.ingest.category != category {
            self.ingest.category = category;
            self.mark_dirty();
        }
    }

    /// Issues a doc id whose millisecond stamp never repeats within this state,
    /// short of `i64::MAX`.
    pub(crate) fn next_doc_id(&mut self, now_millis: i64) -> DocId {
        let stamp = match self.ingest.last_stamp {
            Some(last) if now_millis <= last => last.saturating_add(1),
            _ => now_millis,
        };
        self.ingest.last_stamp = Some(stamp);
        DocId::new(self.ingest.category, stamp)
    }

    pub(crate) fn begin_ingest(&mut self, doc_id: DocId) -> RequestId {
        let request = self.issue_request();
        self.ingest.pending_doc = Some(doc_id);
        self.ingest.phase = Phase::InFlight { request };
        self.ingest.message = INGEST_PROGRESS_TEXT.to_string();
        self.mark_dirty();
        request
    }

    pub(crate) fn reject_ingest(&mut self, message: String) {
        self.ingest.pending_doc = None;
        self.ingest.message = message.clone();
        self.ingest.phase = Phase::Failed(message);
        self.mark_dirty();
    }

    /// Clears the content and returns the id of the document that was indexed.
    pub(crate) fn complete_ingest(&mut self) -> Option<DocId> {
        let doc_id = self.ingest.pending_doc.take()?;
        self.ingest.content.clear();
        self.ingest.message =
            format!("Document {doc_id} indexed. You can generate a plan now.");
        self.ingest.phase = Phase::Succeeded(doc_id.clone());
        self.mark_dirty();
        Some(doc_id)
    }

    // Plan

    pub(crate) fn plan_in_flight(&self) -> Option<RequestId> {
        self.plan.phase.in_flight_request()
    }

    pub(crate) fn plan_target_date(&self) -> NaiveDate {
        self.plan.target_date
    }

    pub(crate) fn plan_guidance(&self) -> &str {
        &self.plan.guidance
    }

    pub(crate) fn set_plan_date(&mut self, date: NaiveDate) {
        if self.plan.target_date != date {
            self.plan.target_date = date;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_plan_guidance(&mut self, guidance: String) {
        if self.plan.guidance != guidance {
            self.plan.guidance = guidance;
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_plan(&mut self) -> RequestId {
        let request = self.issue_request();
        self.plan.phase = Phase::InFlight { request };
        self.plan.text = PLAN_PLACEHOLDER_TEXT.to_string();
        self.mark_dirty();
        request
    }

    pub(crate) fn complete_plan(&mut self, text: String) {
        self.plan.phase = Phase::Succeeded(());
        self.plan.text = text;
        self.mark_dirty();
    }

    pub(crate) fn fail_plan(&mut self, message: String) {
        self.plan.text = message.clone();
        self.plan.phase = Phase::Failed(message);
        self.mark_dirty();
    }
}
