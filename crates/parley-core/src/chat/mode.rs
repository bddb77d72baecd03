//! Session modes.

use parley_types::interview::InterviewId;
use parley_types::message::SessionTarget;
use parley_types::response::ResponseId;

/// What a successful exchange means for the session's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeEffect {
    None,
    /// The agent may have revised the owning entity (e.g. the interview
    /// outline); the owner should refetch it.
    RefreshOwner,
}

/// Behaviour that distinguishes one kind of conversation from another.
pub trait SessionMode: Clone + Send + Sync + 'static {
    /// Short name used in log fields.
    const LABEL: &'static str;

    /// Where transcript reads and message posts are addressed.
    fn target(&self) -> SessionTarget;

    /// Whether the human may send messages.
    fn accepts_input(&self) -> bool {
        true
    }

    /// Whether the transcript is fetched at most once per session.
    fn load_once(&self) -> bool {
        false
    }

    fn exchange_effect(&self) -> ExchangeEffect {
        ExchangeEffect::None
    }
}

/// Planning conversation about an interview's design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Planning {
    pub interview_id: InterviewId,
}

impl SessionMode for Planning {
    const LABEL: &'static str = "planning";

    fn target(&self) -> SessionTarget {
        SessionTarget::Planning(self.interview_id)
    }

    fn exchange_effect(&self) -> ExchangeEffect {
        ExchangeEffect::RefreshOwner
    }
}

/// Live interview between a candidate and the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interactive {
    pub response_id: ResponseId,
}

impl SessionMode for Interactive {
    const LABEL: &'static str = "interactive";

    fn target(&self) -> SessionTarget {
        SessionTarget::Response(self.response_id)
    }
}

/// Read-only view of a finished candidate conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replay {
    pub response_id: ResponseId,
}

impl SessionMode for Replay {
    const LABEL: &'static str = "replay";

    fn target(&self) -> SessionTarget {
        SessionTarget::Response(self.response_id)
    }

    fn accepts_input(&self) -> bool {
        false
    }

    fn load_once(&self) -> bool {
        true
    }
}
