//! Interview service wire types.
//!
//! These mirror the JSON the remote service speaks. They are NOT the domain
//! types from parley-types; conversions into domain types live here so the
//! rest of the crate never sees wire field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_types::interview::{Interview, InterviewId, InterviewStatus};
use parley_types::message::{Message, MessageRole};
use parley_types::response::{Response, ResponseId};
use parley_types::tag::{SentimentCounts, Tag};

/// An interview as returned by `get_all`, `get/{id}`, `add` and `update/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct WireInterview {
    pub uuid: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default = "default_status")]
    pub status: InterviewStatus,
    /// Number of responses collected so far.
    #[serde(default)]
    pub responses: u32,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub outline: Option<String>,
    #[serde(default)]
    pub tags: Vec<WireTag>,
}

fn default_status() -> InterviewStatus {
    InterviewStatus::Draft
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireTag {
    pub name: String,
    #[serde(default)]
    pub positive: u32,
    #[serde(default)]
    pub negative: u32,
    #[serde(default)]
    pub neutral: u32,
}

/// A candidate session ("user interview" on the wire).
#[derive(Debug, Clone, Deserialize)]
pub struct WireResponse {
    pub uuid: Uuid,
    #[serde(rename = "interviewUuid")]
    pub interview_uuid: Uuid,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<WireTag>,
    #[serde(default, alias = "user")]
    pub user_name: Option<String>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: MessageRole,
    pub message: String,
}

/// Body of a planning or candidate message post.
#[derive(Debug, Clone, Serialize)]
pub struct PostMessageRequest<'a> {
    pub message: &'a str,
}

/// Reply to a message post: the agent's answer.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageReply {
    pub conversation: WireMessage,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest<'a> {
    #[serde(rename = "interviewUuid")]
    pub interview_uuid: Uuid,
    #[serde(rename = "additionalInformation", skip_serializing_if = "Option::is_none")]
    pub additional_information: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionReply {
    pub uuid: Uuid,
}

impl From<WireTag> for Tag {
    fn from(tag: WireTag) -> Self {
        Tag::new(
            tag.name,
            SentimentCounts::new(tag.positive, tag.negative, tag.neutral),
        )
    }
}

impl From<WireInterview> for Interview {
    fn from(wire: WireInterview) -> Self {
        Interview {
            id: InterviewId::from_uuid(wire.uuid),
            title: wire.title,
            objective: wire.objective,
            questions: wire.questions,
            status: wire.status,
            created_at: wire.created_date,
            response_count: wire.responses,
            outline: wire.outline,
            tags: wire.tags.into_iter().map(Tag::from).collect(),
        }
    }
}

impl From<WireResponse> for Response {
    fn from(wire: WireResponse) -> Self {
        Response {
            id: ResponseId::from_uuid(wire.uuid),
            interview_id: InterviewId::from_uuid(wire.interview_uuid),
            summary: wire.summary,
            tags: wire.tags.into_iter().map(Tag::from).collect(),
            candidate: wire.user_name,
            created_at: wire.created_date,
        }
    }
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        Message {
            role: wire.role,
            content: wire.message,
        }
    }
}
