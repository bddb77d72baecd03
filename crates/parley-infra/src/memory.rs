//! In-memory implementation of [`InterviewService`].
//!
//! Holds interviews, responses and transcripts in process memory behind
//! `tokio::sync::RwLock`s. Used for offline work and for driving the stores
//! end to end in tests. The agent is a reply function supplied by the caller.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use parley_core::service::InterviewService;
use parley_types::error::ServiceError;
use parley_types::interview::{Interview, InterviewId, InterviewPatch, InterviewStatus};
use parley_types::message::{Message, SessionTarget};
use parley_types::response::{Response, ResponseId};

/// Produces the agent's reply to a human message.
pub type AgentReply = Arc<dyn Fn(&SessionTarget, &str) -> String + Send + Sync>;

pub struct InMemoryInterviewService {
    interviews: RwLock<Vec<Interview>>,
    responses: RwLock<Vec<Response>>,
    transcripts: RwLock<HashMap<SessionTarget, Vec<Message>>>,
    agent: AgentReply,
}

impl Default for InMemoryInterviewService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryInterviewService {
    /// Empty service whose agent echoes the human message back.
    pub fn new() -> Self {
        Self::with_agent(Arc::new(|_target: &SessionTarget, text: &str| {
            format!("Noted: {text}")
        }))
    }

    pub fn with_agent(agent: AgentReply) -> Self {
        Self {
            interviews: RwLock::new(Vec::new()),
            responses: RwLock::new(Vec::new()),
            transcripts: RwLock::new(HashMap::new()),
            agent,
        }
    }

    pub async fn insert_interview(&self, interview: Interview) {
        self.interviews.write().await.push(interview);
    }

    pub async fn insert_response(&self, response: Response) {
        self.responses.write().await.push(response);
    }

    pub async fn set_transcript(&self, target: SessionTarget, messages: Vec<Message>) {
        self.transcripts.write().await.insert(target, messages);
    }
}

impl InterviewService for InMemoryInterviewService {
    async fn list_interviews(
        &self,
        status: Option<InterviewStatus>,
    ) -> Result<Vec<Interview>, ServiceError> {
        let interviews = self.interviews.read().await;
        Ok(interviews
            .iter()
            .filter(|i| status.is_none_or(|s| i.status == s))
            .cloned()
            .collect())
    }

    async fn get_interview(&self, id: &InterviewId) -> Result<Interview, ServiceError> {
        let interviews = self.interviews.read().await;
        interviews
            .iter()
            .find(|i| &i.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }

    async fn create_interview(&self) -> Result<Interview, ServiceError> {
        let interview = Interview {
            id: InterviewId::new(),
            title: "Untitled interview".to_string(),
            objective: String::new(),
            questions: Vec::new(),
            status: InterviewStatus::Draft,
            created_at: Some(Utc::now()),
            response_count: 0,
            outline: None,
            tags: Vec::new(),
        };
        debug!(interview_id = %interview.id, "Created in-memory interview");
        self.interviews.write().await.push(interview.clone());
        Ok(interview)
    }

    async fn update_interview(
        &self,
        id: &InterviewId,
        patch: &InterviewPatch,
    ) -> Result<Interview, ServiceError> {
        let mut interviews = self.interviews.write().await;
        let interview = interviews
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or(ServiceError::NotFound)?;
        if let Some(title) = &patch.title {
            interview.title = title.clone();
        }
        if let Some(objective) = &patch.objective {
            interview.objective = objective.clone();
        }
        if let Some(questions) = &patch.questions {
            interview.questions = questions.clone();
        }
        Ok(interview.clone())
    }

    async fn list_responses(
        &self,
        interview_id: &InterviewId,
    ) -> Result<Vec<Response>, ServiceError> {
        let responses = self.responses.read().await;
        Ok(responses
            .iter()
            .filter(|r| &r.interview_id == interview_id)
            .cloned()
            .collect())
    }

    async fn get_response(&self, id: &ResponseId) -> Result<Response, ServiceError> {
        let responses = self.responses.read().await;
        responses
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }

    async fn get_transcript(&self, target: &SessionTarget) -> Result<Vec<Message>, ServiceError> {
        let transcripts = self.transcripts.read().await;
        Ok(transcripts.get(target).cloned().unwrap_or_default())
    }

    async fn post_message(
        &self,
        target: &SessionTarget,
        text: &str,
    ) -> Result<Message, ServiceError> {
        // Posting to something that does not exist is a 404 on the real service.
        match target {
            SessionTarget::Planning(id) => {
                self.get_interview(id).await?;
            }
            SessionTarget::Response(id) => {
                self.get_response(id).await?;
            }
        }

        let reply = Message::agent((self.agent)(target, text));
        {
            let mut transcripts = self.transcripts.write().await;
            let transcript = transcripts.entry(*target).or_default();
            transcript.push(Message::human(text));
            transcript.push(reply.clone());
        }

        // The planning agent keeps the interview outline in step with the
        // conversation.
        if let SessionTarget::Planning(id) = target {
            let mut interviews = self.interviews.write().await;
            if let Some(interview) = interviews.iter_mut().find(|i| &i.id == id) {
                interview.outline = Some(reply.content.clone());
            }
        }
        Ok(reply)
    }

    async fn create_session(
        &self,
        interview_id: &InterviewId,
        additional_information: Option<&str>,
    ) -> Result<ResponseId, ServiceError> {
        {
            let mut interviews = self.interviews.write().await;
            let interview = interviews
                .iter_mut()
                .find(|i| &i.id == interview_id)
                .ok_or(ServiceError::NotFound)?;
            interview.response_count += 1;
        }

        let response = Response {
            id: ResponseId::new(),
            interview_id: *interview_id,
            summary: String::new(),
            tags: Vec::new(),
            candidate: additional_information.map(str::to_string),
            created_at: Some(Utc::now()),
        };
        let id = response.id;
        self.responses.write().await.push(response);
        Ok(id)
    }
}
