use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::tag::Tag;

/// Unique identifier for an interview, assigned by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterviewId(pub Uuid);

impl InterviewId {
    /// Create a new InterviewId using UUID v7 (time-sortable).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create an InterviewId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for InterviewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InterviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InterviewId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// An interview definition: an objective plus the questions a candidate is
/// walked through by the conversational agent.
///
/// Only the title (and the other fields of [`InterviewPatch`]) is ever
/// changed from the client. Status, outline and tags are computed by the
/// remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub id: InterviewId,
    pub title: String,
    pub objective: String,
    /// Ordered question prompts.
    pub questions: Vec<String>,
    pub status: InterviewStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub response_count: u32,
    /// Outline generated by the agent during planning.
    pub outline: Option<String>,
    /// Aggregate sentiment tags across all responses.
    pub tags: Vec<Tag>,
}

/// Planning-stage lifecycle of an interview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    #[default]
    Draft,
    Active,
    Completed,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Draft => "draft",
            InterviewStatus::Active => "active",
            InterviewStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(InterviewStatus::Draft),
            "active" => Ok(InterviewStatus::Active),
            "completed" => Ok(InterviewStatus::Completed),
            other => Err(format!("invalid interview status: '{other}'")),
        }
    }
}

/// Partial update for an interview. `None` fields are left untouched by the
/// remote service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<String>>,
}

impl InterviewPatch {
    /// A patch that only renames the interview.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.objective.is_none() && self.questions.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interview_status_roundtrip() {
        for status in [
            InterviewStatus::Draft,
            InterviewStatus::Active,
            InterviewStatus::Completed,
        ] {
            let parsed: InterviewStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_interview_status_serde() {
        let json = serde_json::to_string(&InterviewStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");
        let parsed: InterviewStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, InterviewStatus::Completed);
    }

    #[test]
    fn test_interview_id_parse() {
        let id = InterviewId::new();
        let parsed: InterviewId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<InterviewId>().is_err());
    }

    #[test]
    fn test_patch_skips_unset_fields() {
        let patch = InterviewPatch::title("Churn study");
        assert!(!patch.is_empty());
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"title":"Churn study"}"#);
        assert!(InterviewPatch::default().is_empty());
    }
}
