//! Entity detail stores.
//!
//! A detail store holds one focal entity (the thing a detail screen is
//! about), the sub-resources that hang off it, per-screen local state such as
//! filters, and the chat session scoped to it. The shape of each of those is
//! set by a [`DetailKind`]; the lifecycle is shared.
//!
//! Identity guard: `init_for` with the identity already held is a no-op,
//! while a different identity wipes every piece of sub-state before the first
//! fetch starts, so data from A is never visible while B loads.

pub mod candidate;
pub mod planning;
pub mod responses;

pub use candidate::CandidateDetail;
pub use planning::PlanningDetail;
pub use responses::{ListingLocal, ResponseListingDetail};

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use parley_types::config::ClientConfig;
use parley_types::error::{ErrorKind, ServiceError, StoreError};

use crate::chat::{ChatSession, ExchangeEffect, SendOutcome, SessionMode};
use crate::service::InterviewService;
use crate::store::{ErrorFlags, InitOutcome, LoadState};

/// Shape and fetch strategy of one kind of detail screen.
pub trait DetailKind: Clone + fmt::Debug + Default + Send + Sync + 'static {
    type Id: Copy + Eq + fmt::Display + fmt::Debug + Send + Sync + 'static;
    type Focal: Clone + fmt::Debug + Send + Sync + 'static;
    /// Sub-resources fetched after the focal entity. Transcripts are not
    /// included; they live in the session.
    type Dependents: Clone + Default + fmt::Debug + Send + Sync + 'static;
    /// Screen-local state that never touches the network.
    type Local: Clone + Default + fmt::Debug + Send + Sync + 'static;
    type Mode: SessionMode;

    const LABEL: &'static str;

    fn fetch_focal<R: InterviewService>(
        remote: &R,
        id: &Self::Id,
    ) -> impl std::future::Future<Output = Result<Self::Focal, ServiceError>> + Send;

    fn fetch_dependents<R: InterviewService>(
        remote: &R,
        focal: &Self::Focal,
    ) -> impl std::future::Future<Output = Result<Self::Dependents, ServiceError>> + Send;

    /// Session opened as soon as the focal entity loads. `None` for kinds
    /// that open sessions on demand.
    fn session_mode(id: &Self::Id) -> Option<Self::Mode>;
}

/// Point-in-time copy of a detail store's state (everything but the session).
#[derive(Debug, Clone)]
pub struct DetailSnapshot<K: DetailKind> {
    pub id: Option<K::Id>,
    pub focal: Option<K::Focal>,
    pub dependents: K::Dependents,
    pub local: K::Local,
    pub load_state: LoadState,
    pub dependents_state: LoadState,
    pub errors: ErrorFlags,
}

// Hand-written: ids and focal entities have no meaningful default.
impl<K: DetailKind> Default for DetailSnapshot<K> {
    fn default() -> Self {
        Self {
            id: None,
            focal: None,
            dependents: K::Dependents::default(),
            local: K::Local::default(),
            load_state: LoadState::default(),
            dependents_state: LoadState::default(),
            errors: ErrorFlags::default(),
        }
    }
}

struct DetailState<R: InterviewService, K: DetailKind> {
    snapshot: DetailSnapshot<K>,
    session: Option<ChatSession<R, K::Mode>>,
    /// Bumped on every re-target and reset.
    generation: u64,
}

impl<R: InterviewService, K: DetailKind> Default for DetailState<R, K> {
    fn default() -> Self {
        Self {
            snapshot: DetailSnapshot::default(),
            session: None,
            generation: 0,
        }
    }
}

/// Store for one detail screen, parameterized by its kind.
pub struct DetailStore<R: InterviewService, K: DetailKind> {
    remote: Arc<R>,
    config: Arc<ClientConfig>,
    state: Arc<RwLock<DetailState<R, K>>>,
}

impl<R: InterviewService, K: DetailKind> Clone for DetailStore<R, K> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            config: Arc::clone(&self.config),
            state: Arc::clone(&self.state),
        }
    }
}

impl<R: InterviewService, K: DetailKind> DetailStore<R, K> {
    pub fn new(remote: Arc<R>, config: Arc<ClientConfig>) -> Self {
        Self {
            remote,
            config,
            state: Arc::new(RwLock::new(DetailState::default())),
        }
    }

    fn open_session(&self, mode: K::Mode) -> ChatSession<R, K::Mode> {
        ChatSession::new(
            Arc::clone(&self.remote),
            mode,
            self.config.fallback_message.as_str(),
        )
    }

    /// Point the store at `id` and load it.
    ///
    /// Returns [`InitOutcome::Partial`] when the focal entity loaded but a
    /// dependent fetch failed; the dependents flag records the failure.
    pub async fn init_for(&self, id: K::Id) -> Result<InitOutcome, StoreError> {
        let (generation, previous) = {
            let mut state = self.state.write().await;
            if state.snapshot.id == Some(id) {
                if state.snapshot.errors.is_set(ErrorKind::Initialization) {
                    return Err(StoreError::UnclearedError(ErrorKind::Initialization));
                }
                match state.snapshot.load_state {
                    LoadState::Ready => return Ok(InitOutcome::AlreadyLoaded),
                    LoadState::Pending => return Ok(InitOutcome::InFlight),
                    LoadState::Uninitialized | LoadState::Errored => {}
                }
            }
            state.generation += 1;
            state.snapshot = DetailSnapshot {
                id: Some(id),
                load_state: LoadState::Pending,
                ..DetailSnapshot::default()
            };
            (state.generation, state.session.take())
        };
        if let Some(previous) = previous {
            previous.reset().await;
        }

        info!(kind = K::LABEL, id = %id, "Loading detail");
        let result = K::fetch_focal(&*self.remote, &id).await;

        {
            let mut state = self.state.write().await;
            if state.generation != generation {
                debug!(kind = K::LABEL, id = %id, "Discarding superseded detail load");
                return Ok(InitOutcome::Superseded);
            }
            match result {
                Ok(focal) => {
                    state.snapshot.focal = Some(focal);
                    state.snapshot.load_state = LoadState::Ready;
                    state.session = K::session_mode(&id).map(|mode| self.open_session(mode));
                }
                Err(err) => {
                    warn!(kind = K::LABEL, id = %id, error = %err, "Failed to load detail");
                    state.snapshot.load_state = LoadState::Errored;
                    state.snapshot.errors.raise(ErrorKind::Initialization);
                    return Err(StoreError::Initialization(err));
                }
            }
        }

        match self.load_dependents(generation).await {
            Ok(()) => Ok(InitOutcome::Loaded),
            Err(StoreError::Dependents(_)) => Ok(InitOutcome::Partial),
            Err(other) => Err(other),
        }
    }

    /// Fetch the focal entity's sub-resources (and the session transcript,
    /// if a session is open). Failure does not roll back the focal entity.
    pub async fn fetch_dependents(&self) -> Result<(), StoreError> {
        let generation = {
            let state = self.state.read().await;
            if state.snapshot.errors.is_set(ErrorKind::Dependents) {
                return Err(StoreError::UnclearedError(ErrorKind::Dependents));
            }
            state.generation
        };
        self.load_dependents(generation).await
    }

    async fn load_dependents(&self, generation: u64) -> Result<(), StoreError> {
        let (focal, session) = {
            let mut state = self.state.write().await;
            if state.generation != generation {
                return Ok(());
            }
            let focal = state.snapshot.focal.clone().ok_or(StoreError::NotLoaded)?;
            state.snapshot.dependents_state = LoadState::Pending;
            (focal, state.session.clone())
        };

        let mut result = K::fetch_dependents(&*self.remote, &focal).await;
        if result.is_ok() {
            if let Some(session) = &session {
                if let Err(err) = session.load().await {
                    result = Err(err);
                }
            }
        }

        let mut state = self.state.write().await;
        if state.generation != generation {
            return Ok(());
        }
        match result {
            Ok(dependents) => {
                state.snapshot.dependents = dependents;
                state.snapshot.dependents_state = LoadState::Ready;
                Ok(())
            }
            Err(err) => {
                warn!(kind = K::LABEL, error = %err, "Failed to load dependents");
                state.snapshot.dependents_state = LoadState::Errored;
                state.snapshot.errors.raise(ErrorKind::Dependents);
                Err(StoreError::Dependents(err))
            }
        }
    }

    /// Refetch the focal entity in place. Failure is logged and leaves the
    /// current focal entity untouched; no flag is raised.
    pub async fn refresh_focal(&self) -> Option<K::Focal> {
        let (id, generation) = {
            let state = self.state.read().await;
            state.snapshot.focal.as_ref()?;
            (state.snapshot.id?, state.generation)
        };

        match K::fetch_focal(&*self.remote, &id).await {
            Ok(focal) => {
                let mut state = self.state.write().await;
                if state.generation != generation {
                    return None;
                }
                state.snapshot.focal = Some(focal.clone());
                Some(focal)
            }
            Err(err) => {
                warn!(kind = K::LABEL, id = %id, error = %err, "Failed to refresh detail");
                None
            }
        }
    }

    /// Send a message through the open session. An exchange that asks its
    /// owner to refresh triggers a refetch of the focal entity.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome, StoreError> {
        let session = self.session().await.ok_or(StoreError::NotLoaded)?;
        let outcome = session.send(text).await;
        if let SendOutcome::Delivered {
            effect: ExchangeEffect::RefreshOwner,
            ..
        } = &outcome
        {
            self.refresh_focal().await;
        }
        Ok(outcome)
    }

    /// Forget the current identity entirely.
    pub async fn reset(&self) {
        let previous = {
            let mut state = self.state.write().await;
            state.generation += 1;
            state.snapshot = DetailSnapshot::default();
            state.session.take()
        };
        // A send still in flight on the old session settles as superseded.
        if let Some(previous) = previous {
            previous.reset().await;
        }
    }

    /// Clear a sticky error flag. Clearing the initialization flag lets
    /// `init_for` retry the same identity.
    pub async fn clear_error(&self, kind: ErrorKind) {
        let mut state = self.state.write().await;
        state.snapshot.errors.clear(kind);
        if kind == ErrorKind::Initialization && state.snapshot.load_state == LoadState::Errored {
            state.snapshot.load_state = LoadState::Uninitialized;
        }
    }

    pub async fn snapshot(&self) -> DetailSnapshot<K> {
        self.state.read().await.snapshot.clone()
    }

    pub async fn focal(&self) -> Option<K::Focal> {
        self.state.read().await.snapshot.focal.clone()
    }

    /// Handle to the open session, if any.
    pub async fn session(&self) -> Option<ChatSession<R, K::Mode>> {
        self.state.read().await.session.clone()
    }
}
