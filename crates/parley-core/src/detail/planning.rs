//! Planning detail: one interview being designed with the agent.

use tracing::{info, warn};

use parley_types::error::{ErrorKind, ServiceError, StoreError};
use parley_types::interview::{Interview, InterviewId, InterviewPatch};
use parley_types::response::CandidateInvite;

use super::{DetailKind, DetailStore};
use crate::chat::Planning;
use crate::service::InterviewService;

/// Focal interview plus its planning conversation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanningDetail;

impl DetailKind for PlanningDetail {
    type Id = InterviewId;
    type Focal = Interview;
    /// The planning transcript is the only sub-resource and the session owns it.
    type Dependents = ();
    type Local = ();
    type Mode = Planning;

    const LABEL: &'static str = "planning";

    async fn fetch_focal<R: InterviewService>(
        remote: &R,
        id: &InterviewId,
    ) -> Result<Interview, ServiceError> {
        remote.get_interview(id).await
    }

    async fn fetch_dependents<R: InterviewService>(
        _remote: &R,
        _focal: &Interview,
    ) -> Result<(), ServiceError> {
        Ok(())
    }

    fn session_mode(id: &InterviewId) -> Option<Planning> {
        Some(Planning { interview_id: *id })
    }
}

impl<R: InterviewService> DetailStore<R, PlanningDetail> {
    /// Send a partial update. On success the focal interview becomes the
    /// server's representation, which is also returned so the caller can
    /// push it into the collection store.
    pub async fn update(&self, patch: InterviewPatch) -> Result<Interview, StoreError> {
        if patch.is_empty() {
            return Err(StoreError::EmptyPatch);
        }
        let (id, generation) = {
            let state = self.state.read().await;
            if state.snapshot.errors.is_set(ErrorKind::Update) {
                return Err(StoreError::UnclearedError(ErrorKind::Update));
            }
            let focal = state.snapshot.focal.as_ref().ok_or(StoreError::NotLoaded)?;
            (focal.id, state.generation)
        };

        let result = self.remote.update_interview(&id, &patch).await;

        let mut state = self.state.write().await;
        let current = state.generation == generation;
        match result {
            Ok(updated) => {
                info!(interview_id = %id, "Interview updated");
                if current {
                    state.snapshot.focal = Some(updated.clone());
                }
                Ok(updated)
            }
            Err(err) => {
                warn!(interview_id = %id, error = %err, "Failed to update interview");
                if current {
                    state.snapshot.errors.raise(ErrorKind::Update);
                }
                Err(StoreError::Update(err))
            }
        }
    }

    /// Create a candidate session for the focal interview and build the
    /// link the candidate opens.
    pub async fn invite_candidate(
        &self,
        additional_information: Option<&str>,
    ) -> Result<CandidateInvite, StoreError> {
        let (id, generation) = {
            let state = self.state.read().await;
            if state.snapshot.errors.is_set(ErrorKind::Create) {
                return Err(StoreError::UnclearedError(ErrorKind::Create));
            }
            let focal = state.snapshot.focal.as_ref().ok_or(StoreError::NotLoaded)?;
            (focal.id, state.generation)
        };

        match self.remote.create_session(&id, additional_information).await {
            Ok(response_id) => {
                info!(interview_id = %id, response_id = %response_id, "Candidate session created");
                Ok(CandidateInvite::new(
                    response_id,
                    &self.config.candidate_link_base,
                ))
            }
            Err(err) => {
                warn!(interview_id = %id, error = %err, "Failed to create candidate session");
                let mut state = self.state.write().await;
                if state.generation == generation {
                    state.snapshot.errors.raise(ErrorKind::Create);
                }
                Err(StoreError::Create(err))
            }
        }
    }
}
