//! Conversational sessions with the remote agent.
//!
//! A [`ChatSession`] holds the ordered transcript of one conversation and
//! exchanges messages with the remote service. What the conversation is
//! (planning an interview, a live candidate interview, or a read-only replay)
//! is fixed by its [`SessionMode`] at construction.

pub mod mode;
pub mod session;

pub use mode::{ExchangeEffect, Interactive, Planning, Replay, SessionMode};
pub use session::{ChatSession, RejectReason, SendOutcome};
