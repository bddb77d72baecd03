//! Candidate detail: one live interview session from the candidate's side.

use parley_types::error::ServiceError;
use parley_types::interview::Interview;
use parley_types::response::{Response, ResponseId};

use super::{DetailKind, DetailStore};
use crate::chat::Interactive;
use crate::service::InterviewService;

/// Focal response, the interview it belongs to, and the live conversation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateDetail;

impl DetailKind for CandidateDetail {
    type Id = ResponseId;
    type Focal = Response;
    type Dependents = Option<Interview>;
    type Local = ();
    type Mode = Interactive;

    const LABEL: &'static str = "candidate";

    async fn fetch_focal<R: InterviewService>(
        remote: &R,
        id: &ResponseId,
    ) -> Result<Response, ServiceError> {
        remote.get_response(id).await
    }

    async fn fetch_dependents<R: InterviewService>(
        remote: &R,
        focal: &Response,
    ) -> Result<Option<Interview>, ServiceError> {
        remote.get_interview(&focal.interview_id).await.map(Some)
    }

    fn session_mode(id: &ResponseId) -> Option<Interactive> {
        Some(Interactive { response_id: *id })
    }
}

impl<R: InterviewService> DetailStore<R, CandidateDetail> {
    /// The interview this session belongs to, once loaded.
    pub async fn interview(&self) -> Option<Interview> {
        self.state.read().await.snapshot.dependents.clone()
    }
}
