//! Chat session: ordered transcript plus the send state machine.
//!
//! Sending is two-phase. The human entry is appended as provisional before
//! the remote call and is confirmed or marked failed when the call settles.
//! A failed exchange never surfaces as an error to the caller; the transcript
//! gains exactly one agent-authored fallback entry instead.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use parley_types::error::ServiceError;
use parley_types::message::{DeliveryState, Message, SessionTarget, TranscriptEntry};

use super::mode::{ExchangeEffect, SessionMode};
use crate::service::InterviewService;
use crate::store::{InitOutcome, LoadState};

/// Why a send was refused without contacting the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The text was empty after trimming.
    Empty,
    /// The session's mode does not accept input.
    ReadOnly,
    /// A previous send has not settled yet.
    Pending,
    /// The transcript is being (re)loaded and would replace the new entry.
    Loading,
}

/// Result of [`ChatSession::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered {
        reply: Message,
        effect: ExchangeEffect,
    },
    /// The exchange failed; a fallback entry was appended.
    Failed { error: ServiceError },
    Rejected(RejectReason),
    /// The session was reset while the exchange was in flight; the result
    /// was dropped from the transcript.
    Superseded,
}

impl SendOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered { .. })
    }
}

#[derive(Debug, Default)]
struct SessionState {
    entries: Vec<TranscriptEntry>,
    /// A send is in flight (sending state).
    pending: bool,
    load_state: LoadState,
    /// Bumped by `reset`; results started under an older epoch are dropped.
    epoch: u64,
}

/// One conversation with the remote agent.
pub struct ChatSession<R: InterviewService, M: SessionMode> {
    remote: Arc<R>,
    mode: M,
    fallback_message: Arc<str>,
    state: Arc<RwLock<SessionState>>,
}

impl<R: InterviewService, M: SessionMode> Clone for ChatSession<R, M> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            mode: self.mode.clone(),
            fallback_message: Arc::clone(&self.fallback_message),
            state: Arc::clone(&self.state),
        }
    }
}

impl<R: InterviewService, M: SessionMode + std::fmt::Debug> std::fmt::Debug for ChatSession<R, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl<R: InterviewService, M: SessionMode> ChatSession<R, M> {
    pub fn new(remote: Arc<R>, mode: M, fallback_message: impl Into<Arc<str>>) -> Self {
        Self {
            remote,
            mode,
            fallback_message: fallback_message.into(),
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    pub fn mode(&self) -> &M {
        &self.mode
    }

    pub fn target(&self) -> SessionTarget {
        self.mode.target()
    }

    /// Fetch the transcript from the service, replacing local entries.
    ///
    /// Read-only sessions fetch once; later calls are no-ops. A load issued
    /// while a send is pending is skipped so the provisional entry keeps its
    /// place.
    pub async fn load(&self) -> Result<InitOutcome, ServiceError> {
        let target = self.mode.target();
        let epoch = {
            let mut state = self.state.write().await;
            if state.pending {
                return Ok(InitOutcome::InFlight);
            }
            match state.load_state {
                LoadState::Pending => return Ok(InitOutcome::InFlight),
                LoadState::Ready if self.mode.load_once() => {
                    return Ok(InitOutcome::AlreadyLoaded);
                }
                _ => {}
            }
            state.load_state = LoadState::Pending;
            state.epoch
        };

        debug!(session_target = %target, mode = M::LABEL, "Loading transcript");
        let result = self.remote.get_transcript(&target).await;

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            return Ok(InitOutcome::Superseded);
        }
        match result {
            Ok(messages) => {
                debug!(session_target = %target, count = messages.len(), "Transcript loaded");
                state.entries = messages.into_iter().map(TranscriptEntry::confirmed).collect();
                state.load_state = LoadState::Ready;
                Ok(InitOutcome::Loaded)
            }
            Err(err) => {
                warn!(session_target = %target, error = %err, "Failed to load transcript");
                state.load_state = LoadState::Errored;
                Err(err)
            }
        }
    }

    /// Send a human message and wait for the agent's reply.
    ///
    /// Surrounding whitespace is stripped before the message is recorded or
    /// posted.
    pub async fn send(&self, text: &str) -> SendOutcome {
        if !self.mode.accepts_input() {
            return SendOutcome::Rejected(RejectReason::ReadOnly);
        }
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Rejected(RejectReason::Empty);
        }

        let target = self.mode.target();
        let (index, epoch) = {
            let mut state = self.state.write().await;
            if state.pending {
                return SendOutcome::Rejected(RejectReason::Pending);
            }
            if state.load_state.is_pending() {
                return SendOutcome::Rejected(RejectReason::Loading);
            }
            state.pending = true;
            state
                .entries
                .push(TranscriptEntry::provisional(Message::human(text)));
            (state.entries.len() - 1, state.epoch)
        };

        let result = self.remote.post_message(&target, text).await;

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            debug!(session_target = %target, "Session reset during send; dropping result");
            return SendOutcome::Superseded;
        }

        state.pending = false;
        let (delivery, outcome) = match result {
            Ok(reply) => {
                info!(session_target = %target, mode = M::LABEL, "Message exchanged");
                state.entries.push(TranscriptEntry::confirmed(reply.clone()));
                (
                    DeliveryState::Confirmed,
                    SendOutcome::Delivered {
                        reply,
                        effect: self.mode.exchange_effect(),
                    },
                )
            }
            Err(error) => {
                warn!(session_target = %target, mode = M::LABEL, error = %error, "Message send failed");
                state
                    .entries
                    .push(TranscriptEntry::fallback(&*self.fallback_message));
                (DeliveryState::Failed, SendOutcome::Failed { error })
            }
        };
        // Loads are refused while pending and resets bump the epoch, so the
        // provisional entry is still at `index`.
        if let Some(entry) = state.entries.get_mut(index) {
            entry.delivery = delivery;
        }
        outcome
    }

    /// Clear the transcript and any pending send.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        state.epoch += 1;
        state.entries.clear();
        state.pending = false;
        state.load_state = LoadState::Uninitialized;
    }

    pub async fn entries(&self) -> Vec<TranscriptEntry> {
        self.state.read().await.entries.clone()
    }

    /// Transcript messages in order, without delivery state.
    pub async fn messages(&self) -> Vec<Message> {
        let state = self.state.read().await;
        state.entries.iter().map(|e| e.message.clone()).collect()
    }

    pub async fn is_pending(&self) -> bool {
        self.state.read().await.pending
    }

    pub async fn can_send(&self) -> bool {
        let state = self.state.read().await;
        self.mode.accepts_input() && !state.pending && !state.load_state.is_pending()
    }

    pub async fn load_state(&self) -> LoadState {
        self.state.read().await.load_state
    }
}
