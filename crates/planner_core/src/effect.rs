use crate::{DocumentSubmission, PlanRequest, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchStatus {
        request: RequestId,
    },
    SubmitIngest {
        request: RequestId,
        submission: DocumentSubmission,
    },
    GeneratePlan {
        request: RequestId,
        plan: PlanRequest,
    },
}

impl Effect {
    pub fn request(&self) -> RequestId {
        match self {
            Effect::FetchStatus { request }
            | Effect::SubmitIngest { request, .. }
            | Effect::GeneratePlan { request, .. } => *request,
        }
    }
}
