//! Candidate responses to an interview.
//!
//! A response is one candidate's run through an interview. It is created on
//! the remote side when a candidate session is requested, and from the
//! client's point of view only its transcript ever grows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::interview::InterviewId;
use crate::tag::Tag;

/// Unique identifier for a response (also the candidate session identifier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponseId(pub Uuid);

impl ResponseId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ResponseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResponseId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A candidate's response to an interview, without its transcript.
///
/// Transcripts are loaded lazily through a replay or interactive session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: ResponseId,
    pub interview_id: InterviewId,
    pub summary: String,
    /// Per-response sentiment tags.
    pub tags: Vec<Tag>,
    /// Display label for the candidate, when the service knows one.
    pub candidate: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Result of requesting a new candidate session for an interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInvite {
    pub response_id: ResponseId,
    /// Shareable link the candidate opens to start the session.
    pub link: String,
}

impl CandidateInvite {
    /// Build an invite, joining the link base and the response id.
    pub fn new(response_id: ResponseId, link_base: &str) -> Self {
        let base = link_base.trim_end_matches('/');
        Self {
            response_id,
            link: format!("{base}/user-interview/{response_id}"),
        }
    }
}
