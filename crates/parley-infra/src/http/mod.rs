//! HttpInterviewService -- [`InterviewService`] over the remote service's
//! JSON HTTP API.
//!
//! Every call is a single request with the configured timeout. There are no
//! retries here; the stores decide what a failure means.

pub mod wire;

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, debug_span};

use parley_core::service::InterviewService;
use parley_observe::fields;
use parley_types::config::ClientConfig;
use parley_types::error::ServiceError;
use parley_types::interview::{Interview, InterviewId, InterviewPatch, InterviewStatus};
use parley_types::message::{Message, SessionTarget};
use parley_types::response::{Response, ResponseId};

use self::wire::{
    CreateSessionReply, CreateSessionRequest, PostMessageReply, PostMessageRequest,
    WireInterview, WireMessage, WireResponse,
};

/// Endpoints of the interview service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    ListInterviews,
    GetInterview(InterviewId),
    CreateInterview,
    UpdateInterview(InterviewId),
    ListResponses(InterviewId),
    GetResponse(ResponseId),
    Transcript(SessionTarget),
    PostMessage(SessionTarget),
    CreateSession,
}

impl Route {
    /// Operation name recorded on the request span.
    fn op(self) -> &'static str {
        match self {
            Route::ListInterviews => fields::OP_LIST_INTERVIEWS,
            Route::GetInterview(_) => fields::OP_GET_INTERVIEW,
            Route::CreateInterview => fields::OP_CREATE_INTERVIEW,
            Route::UpdateInterview(_) => fields::OP_UPDATE_INTERVIEW,
            Route::ListResponses(_) => fields::OP_LIST_RESPONSES,
            Route::GetResponse(_) => fields::OP_GET_RESPONSE,
            Route::Transcript(_) => fields::OP_GET_TRANSCRIPT,
            Route::PostMessage(_) => fields::OP_POST_MESSAGE,
            Route::CreateSession => fields::OP_CREATE_SESSION,
        }
    }

    fn path(self) -> String {
        match self {
            Route::ListInterviews => "/interviews/get_all".to_string(),
            Route::GetInterview(id) => format!("/interviews/get/{id}"),
            Route::CreateInterview => "/interviews/add".to_string(),
            Route::UpdateInterview(id) => format!("/interviews/update/{id}"),
            Route::ListResponses(id) => {
                format!("/interviews/user/get_all_by_interview_uuid/{id}")
            }
            Route::GetResponse(id) => format!("/interviews/user/get_by_uuid/{id}"),
            Route::Transcript(SessionTarget::Planning(id)) => {
                format!("/interviews/planning/{id}/all")
            }
            Route::Transcript(SessionTarget::Response(id)) => format!("/interviews/user/{id}/all"),
            Route::PostMessage(SessionTarget::Planning(id)) => format!("/interviews/planning/{id}"),
            Route::PostMessage(SessionTarget::Response(id)) => format!("/interviews/user/{id}"),
            Route::CreateSession => "/interviews/user/add".to_string(),
        }
    }
}

/// Remote interview service reached over HTTP.
pub struct HttpInterviewService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInterviewService {
    /// Build a client for `config.api_base_url` with the configured timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ServiceError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: Route) -> String {
        format!("{}{}", self.base_url, route.path())
    }

    async fn get<T: DeserializeOwned>(
        &self,
        route: Route,
        query: &[(&str, &str)],
    ) -> Result<T, ServiceError> {
        let url = self.url(route);
        let span = debug_span!("interview_service", op = route.op(), method = "GET", url = %url);
        let request = self.client.get(&url).query(query);
        execute(request).instrument(span).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        route: Route,
        body: Option<&B>,
    ) -> Result<T, ServiceError> {
        let url = self.url(route);
        let span = debug_span!("interview_service", op = route.op(), method = "POST", url = %url);
        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }
        execute(request).instrument(span).await
    }
}

async fn execute<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ServiceError> {
    debug!("Sending request");
    let response = request.send().await.map_err(transport_error)?;
    decode(response).await
}

fn transport_error(err: reqwest::Error) -> ServiceError {
    ServiceError::Transport(format!("HTTP request failed: {err}"))
}

/// Map a non-success status to a [`ServiceError`], otherwise parse the body.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ServiceError::NotFound);
    }
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ServiceError::Status {
            status: status.as_u16(),
            message,
        });
    }
    response
        .json()
        .await
        .map_err(|e| ServiceError::Decode(format!("failed to parse response: {e}")))
}

impl InterviewService for HttpInterviewService {
    async fn list_interviews(
        &self,
        status: Option<InterviewStatus>,
    ) -> Result<Vec<Interview>, ServiceError> {
        let query: Vec<(&str, &str)> = status.iter().map(|s| ("status", s.as_str())).collect();
        let wire: Vec<WireInterview> = self.get(Route::ListInterviews, &query).await?;
        Ok(wire.into_iter().map(Interview::from).collect())
    }

    async fn get_interview(&self, id: &InterviewId) -> Result<Interview, ServiceError> {
        let wire: WireInterview = self.get(Route::GetInterview(*id), &[]).await?;
        Ok(wire.into())
    }

    async fn create_interview(&self) -> Result<Interview, ServiceError> {
        let wire: WireInterview = self.post::<(), _>(Route::CreateInterview, None).await?;
        Ok(wire.into())
    }

    async fn update_interview(
        &self,
        id: &InterviewId,
        patch: &InterviewPatch,
    ) -> Result<Interview, ServiceError> {
        let wire: WireInterview = self
            .post(Route::UpdateInterview(*id), Some(patch))
            .await?;
        Ok(wire.into())
    }

    async fn list_responses(
        &self,
        interview_id: &InterviewId,
    ) -> Result<Vec<Response>, ServiceError> {
        let wire: Vec<WireResponse> = self.get(Route::ListResponses(*interview_id), &[]).await?;
        Ok(wire.into_iter().map(Response::from).collect())
    }

    async fn get_response(&self, id: &ResponseId) -> Result<Response, ServiceError> {
        let wire: WireResponse = self.get(Route::GetResponse(*id), &[]).await?;
        Ok(wire.into())
    }

    async fn get_transcript(&self, target: &SessionTarget) -> Result<Vec<Message>, ServiceError> {
        let wire: Vec<WireMessage> = self.get(Route::Transcript(*target), &[]).await?;
        Ok(wire.into_iter().map(Message::from).collect())
    }

    async fn post_message(
        &self,
        target: &SessionTarget,
        text: &str,
    ) -> Result<Message, ServiceError> {
        let body = PostMessageRequest { message: text };
        let reply: PostMessageReply = self.post(Route::PostMessage(*target), Some(&body)).await?;
        Ok(reply.conversation.into())
    }

    async fn create_session(
        &self,
        interview_id: &InterviewId,
        additional_information: Option<&str>,
    ) -> Result<ResponseId, ServiceError> {
        let body = CreateSessionRequest {
            interview_uuid: interview_id.0,
            additional_information,
        };
        let reply: CreateSessionReply = self.post(Route::CreateSession, Some(&body)).await?;
        Ok(ResponseId::from_uuid(reply.uuid))
    }
}
