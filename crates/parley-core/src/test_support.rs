//! Test doubles shared by the store and session tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::Notify;

use parley_types::error::ServiceError;
use parley_types::interview::{Interview, InterviewId, InterviewPatch, InterviewStatus};
use parley_types::message::{Message, SessionTarget};
use parley_types::response::{Response, ResponseId};
use parley_types::tag::Tag;

use crate::service::InterviewService;

pub fn interview(title: &str, status: InterviewStatus) -> Interview {
    Interview {
        id: InterviewId::new(),
        title: title.to_string(),
        objective: String::new(),
        questions: vec![],
        status,
        created_at: Some(Utc::now()),
        response_count: 0,
        outline: None,
        tags: vec![],
    }
}

pub fn response(summary: &str, tags: Vec<Tag>) -> Response {
    Response {
        id: ResponseId::new(),
        interview_id: InterviewId::new(),
        summary: summary.to_string(),
        tags,
        candidate: None,
        created_at: Some(Utc::now()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListInterviews,
    GetInterview,
    CreateInterview,
    UpdateInterview,
    ListResponses,
    GetResponse,
    GetTranscript,
    PostMessage,
    CreateSession,
}

/// Scripted in-process service with call counting, failure injection and
/// per-operation gates for holding a call open.
#[derive(Default)]
pub struct MockService {
    pub interviews: Mutex<Vec<Interview>>,
    pub responses: Mutex<Vec<Response>>,
    pub transcripts: Mutex<HashMap<SessionTarget, Vec<Message>>>,
    calls: Mutex<HashMap<Op, usize>>,
    failing: Mutex<HashSet<Op>>,
    gates: Mutex<HashMap<Op, Arc<Notify>>>,
    entered: Mutex<HashMap<Op, Arc<Notify>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interviews(interviews: Vec<Interview>) -> Self {
        let service = Self::new();
        *service.interviews.lock().unwrap() = interviews;
        service
    }

    pub fn add_response(&self, response: Response) {
        self.responses.lock().unwrap().push(response);
    }

    pub fn set_transcript(&self, target: SessionTarget, messages: Vec<Message>) {
        self.transcripts.lock().unwrap().insert(target, messages);
    }

    pub fn calls(&self, op: Op) -> usize {
        self.calls.lock().unwrap().get(&op).copied().unwrap_or(0)
    }

    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.failing.lock().unwrap().remove(&op);
    }

    /// Hold every future call to `op` until the returned notify is signalled
    /// (once per call).
    pub fn gate(&self, op: Op) -> Arc<Notify> {
        self.gates
            .lock()
            .unwrap()
            .entry(op)
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    pub fn ungate(&self, op: Op) {
        self.gates.lock().unwrap().remove(&op);
    }

    /// Signalled each time a call to `op` starts. Only calls made after the
    /// first request for this notify are signalled.
    pub fn entered(&self, op: Op) -> Arc<Notify> {
        self.entered
            .lock()
            .unwrap()
            .entry(op)
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    async fn checkpoint(&self, op: Op) -> Result<(), ServiceError> {
        *self.calls.lock().unwrap().entry(op).or_insert(0) += 1;
        let entered = self.entered.lock().unwrap().get(&op).cloned();
        if let Some(entered) = entered {
            entered.notify_one();
        }
        let gate = self.gates.lock().unwrap().get(&op).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failing.lock().unwrap().contains(&op) {
            return Err(ServiceError::Transport(format!("injected failure: {op:?}")));
        }
        Ok(())
    }
}

impl InterviewService for MockService {
    async fn list_interviews(
        &self,
        status: Option<InterviewStatus>,
    ) -> Result<Vec<Interview>, ServiceError> {
        self.checkpoint(Op::ListInterviews).await?;
        let interviews = self.interviews.lock().unwrap().clone();
        Ok(interviews
            .into_iter()
            .filter(|i| status.is_none_or(|s| i.status == s))
            .collect())
    }

    async fn get_interview(&self, id: &InterviewId) -> Result<Interview, ServiceError> {
        self.checkpoint(Op::GetInterview).await?;
        self.interviews
            .lock()
            .unwrap()
            .iter()
            .find(|i| &i.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }

    async fn create_interview(&self) -> Result<Interview, ServiceError> {
        self.checkpoint(Op::CreateInterview).await?;
        let created = interview("Untitled interview", InterviewStatus::Draft);
        self.interviews.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_interview(
        &self,
        id: &InterviewId,
        patch: &InterviewPatch,
    ) -> Result<Interview, ServiceError> {
        self.checkpoint(Op::UpdateInterview).await?;
        let mut interviews = self.interviews.lock().unwrap();
        let existing = interviews
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or(ServiceError::NotFound)?;
        if let Some(title) = &patch.title {
            existing.title = title.clone();
        }
        if let Some(objective) = &patch.objective {
            existing.objective = objective.clone();
        }
        if let Some(questions) = &patch.questions {
            existing.questions = questions.clone();
        }
        Ok(existing.clone())
    }

    async fn list_responses(
        &self,
        interview_id: &InterviewId,
    ) -> Result<Vec<Response>, ServiceError> {
        self.checkpoint(Op::ListResponses).await?;
        Ok(self
            .responses
            .lock()
            .unwrap()
            .iter()
            .filter(|r| &r.interview_id == interview_id)
            .cloned()
            .collect())
    }

    async fn get_response(&self, id: &ResponseId) -> Result<Response, ServiceError> {
        self.checkpoint(Op::GetResponse).await?;
        self.responses
            .lock()
            .unwrap()
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound)
    }

    async fn get_transcript(&self, target: &SessionTarget) -> Result<Vec<Message>, ServiceError> {
        self.checkpoint(Op::GetTranscript).await?;
        Ok(self
            .transcripts
            .lock()
            .unwrap()
            .get(target)
            .cloned()
            .unwrap_or_default())
    }

    async fn post_message(
        &self,
        target: &SessionTarget,
        text: &str,
    ) -> Result<Message, ServiceError> {
        self.checkpoint(Op::PostMessage).await?;
        let reply = Message::agent(format!("re: {text}"));
        {
            let mut transcripts = self.transcripts.lock().unwrap();
            let transcript = transcripts.entry(*target).or_default();
            transcript.push(Message::human(text));
            transcript.push(reply.clone());
        }
        // Planning replies revise the outline, as the real agent does.
        if let SessionTarget::Planning(id) = target {
            if let Some(found) = self.interviews.lock().unwrap().iter_mut().find(|i| &i.id == id) {
                found.outline = Some(format!("outline after: {text}"));
            }
        }
        Ok(reply)
    }

    async fn create_session(
        &self,
        interview_id: &InterviewId,
        _additional_information: Option<&str>,
    ) -> Result<ResponseId, ServiceError> {
        self.checkpoint(Op::CreateSession).await?;
        let mut created = response("", vec![]);
        created.interview_id = *interview_id;
        let id = created.id;
        self.responses.lock().unwrap().push(created);
        Ok(id)
    }
}
