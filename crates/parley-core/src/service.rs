//! InterviewService trait definition.
//!
//! The remote interview service owns every entity; the stores in this crate
//! only hold replicas. Implementations live in parley-infra (e.g.,
//! `HttpInterviewService`). Uses native async fn in traits (RPITIT, Rust 2024
//! edition), following the repository traits' pattern.

use parley_types::error::ServiceError;
use parley_types::interview::{Interview, InterviewId, InterviewPatch, InterviewStatus};
use parley_types::message::{Message, SessionTarget};
use parley_types::response::{Response, ResponseId};

/// Port to the remote interview service.
///
/// Every call either returns parsed domain entities or fails with a
/// [`ServiceError`]. Retries, backoff and timeouts are the implementation's
/// concern; callers never retry on their own.
pub trait InterviewService: Send + Sync {
    /// List interviews, optionally restricted to one status. Order is not
    /// significant.
    fn list_interviews(
        &self,
        status: Option<InterviewStatus>,
    ) -> impl std::future::Future<Output = Result<Vec<Interview>, ServiceError>> + Send;

    /// Get a single interview by ID.
    fn get_interview(
        &self,
        id: &InterviewId,
    ) -> impl std::future::Future<Output = Result<Interview, ServiceError>> + Send;

    /// Create a new (draft) interview. The service picks every field.
    fn create_interview(
        &self,
    ) -> impl std::future::Future<Output = Result<Interview, ServiceError>> + Send;

    /// Apply a partial update and return the server's full representation.
    fn update_interview(
        &self,
        id: &InterviewId,
        patch: &InterviewPatch,
    ) -> impl std::future::Future<Output = Result<Interview, ServiceError>> + Send;

    /// List the responses recorded against an interview (without transcripts).
    fn list_responses(
        &self,
        interview_id: &InterviewId,
    ) -> impl std::future::Future<Output = Result<Vec<Response>, ServiceError>> + Send;

    /// Get a single response by ID.
    fn get_response(
        &self,
        id: &ResponseId,
    ) -> impl std::future::Future<Output = Result<Response, ServiceError>> + Send;

    /// Get the ordered transcript of a planning or candidate conversation.
    fn get_transcript(
        &self,
        target: &SessionTarget,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, ServiceError>> + Send;

    /// Post a human message and return the agent's reply.
    fn post_message(
        &self,
        target: &SessionTarget,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Message, ServiceError>> + Send;

    /// Create a candidate session (a new response) for an interview.
    fn create_session(
        &self,
        interview_id: &InterviewId,
        additional_information: Option<&str>,
    ) -> impl std::future::Future<Output = Result<ResponseId, ServiceError>> + Send;
}
