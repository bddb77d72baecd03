//! The interview collection store.
//!
//! Single source of truth for the list of interviews and the dashboard's
//! filter and sort state. The collection is fetched at most once per store
//! lifetime; only an explicit [`InterviewCollectionStore::reset`] allows a
//! second fetch.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use parley_types::config::ClientConfig;
use parley_types::error::{ErrorKind, StoreError};
use parley_types::filter::{FilterUpdate, Filters};
use parley_types::interview::{Interview, InterviewId};
use parley_types::tag::aggregate_counts;
use parley_types::view::{DerivedView, InterviewSortKey, PageRequest, SortSpec};

use super::{ErrorFlags, InitOutcome, LoadState};
use crate::service::InterviewService;
use crate::view::derive_view;

/// Point-in-time copy of the collection store's state.
#[derive(Debug, Clone, Default)]
pub struct CollectionSnapshot {
    pub interviews: Vec<Interview>,
    pub load_state: LoadState,
    pub filters: Filters,
    pub sort: SortSpec<InterviewSortKey>,
    pub errors: ErrorFlags,
    /// A create request is in flight.
    pub creating: bool,
}

#[derive(Debug, Default)]
struct CollectionState {
    snapshot: CollectionSnapshot,
    /// Bumped by `reset` so a fetch started before it cannot write after it.
    generation: u64,
}

/// Owns the interview collection.
///
/// Cloning yields another handle to the same state, so a view and a
/// background task can share one store.
pub struct InterviewCollectionStore<R: InterviewService> {
    remote: Arc<R>,
    config: Arc<ClientConfig>,
    state: Arc<RwLock<CollectionState>>,
}

impl<R: InterviewService> Clone for InterviewCollectionStore<R> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            config: Arc::clone(&self.config),
            state: Arc::clone(&self.state),
        }
    }
}

impl<R: InterviewService> InterviewCollectionStore<R> {
    /// Create an empty, uninitialized store.
    pub fn new(remote: Arc<R>, config: Arc<ClientConfig>) -> Self {
        Self {
            remote,
            config,
            state: Arc::new(RwLock::new(CollectionState::default())),
        }
    }

    // --- Lifecycle ---

    /// Fetch the collection unless it is already loaded or loading.
    ///
    /// On failure the collection is left empty and the initialization flag
    /// is raised; further calls are refused until the flag is cleared.
    pub async fn initialize(&self) -> Result<InitOutcome, StoreError> {
        let generation = {
            let mut state = self.state.write().await;
            if state.snapshot.errors.is_set(ErrorKind::Initialization) {
                return Err(StoreError::UnclearedError(ErrorKind::Initialization));
            }
            match state.snapshot.load_state {
                LoadState::Ready => return Ok(InitOutcome::AlreadyLoaded),
                LoadState::Pending => return Ok(InitOutcome::InFlight),
                LoadState::Uninitialized | LoadState::Errored => {}
            }
            state.snapshot.load_state = LoadState::Pending;
            state.generation
        };

        debug!("Fetching interview collection");
        let result = self.remote.list_interviews(None).await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!("Discarding interview collection fetched before reset");
            return Ok(InitOutcome::Superseded);
        }
        match result {
            Ok(interviews) => {
                info!(count = interviews.len(), "Interview collection loaded");
                state.snapshot.interviews = interviews;
                state.snapshot.load_state = LoadState::Ready;
                Ok(InitOutcome::Loaded)
            }
            Err(err) => {
                warn!(error = %err, "Failed to load interview collection");
                state.snapshot.interviews.clear();
                state.snapshot.load_state = LoadState::Errored;
                state.snapshot.errors.raise(ErrorKind::Initialization);
                Err(StoreError::Initialization(err))
            }
        }
    }

    /// Drop everything and return to uninitialized, allowing a new fetch.
    ///
    /// Filter and sort state survive; they belong to the view, not the data.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        state.generation += 1;
        state.snapshot.interviews.clear();
        state.snapshot.load_state = LoadState::Uninitialized;
        state.snapshot.errors = ErrorFlags::default();
        state.snapshot.creating = false;
    }

    /// Clear a sticky error flag. Clearing the initialization flag also
    /// returns an errored store to uninitialized so `initialize` may retry.
    pub async fn clear_error(&self, kind: ErrorKind) {
        let mut state = self.state.write().await;
        state.snapshot.errors.clear(kind);
        if kind == ErrorKind::Initialization && state.snapshot.load_state == LoadState::Errored {
            state.snapshot.load_state = LoadState::Uninitialized;
        }
    }

    // --- Mutations ---

    /// Ask the service for a new interview and append it locally.
    ///
    /// Failure raises the create flag only; an already-loaded list stays
    /// valid.
    pub async fn create(&self) -> Result<Interview, StoreError> {
        {
            let mut state = self.state.write().await;
            if state.snapshot.errors.is_set(ErrorKind::Create) {
                return Err(StoreError::UnclearedError(ErrorKind::Create));
            }
            state.snapshot.creating = true;
        }

        let result = self.remote.create_interview().await;

        let mut state = self.state.write().await;
        state.snapshot.creating = false;
        match result {
            Ok(interview) => {
                info!(interview_id = %interview.id, "Interview created");
                state.snapshot.interviews.push(interview.clone());
                Ok(interview)
            }
            Err(err) => {
                warn!(error = %err, "Failed to create interview");
                state.snapshot.errors.raise(ErrorKind::Create);
                Err(StoreError::Create(err))
            }
        }
    }

    /// Insert or replace an interview with a server-returned representation.
    pub async fn replace(&self, interview: Interview) {
        let mut state = self.state.write().await;
        let interviews = &mut state.snapshot.interviews;
        match interviews.iter_mut().find(|i| i.id == interview.id) {
            Some(existing) => *existing = interview,
            None => interviews.push(interview),
        }
    }

    // --- Filters and sorting (local only) ---

    /// Update one filter dimension. Never touches the network.
    ///
    /// Selecting a tag resets the sentiment filter to the tag's dominant
    /// sentiment across the whole collection.
    pub async fn set_filter(&self, update: FilterUpdate) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let snapshot = &mut state.snapshot;
        match update {
            FilterUpdate::Search(search) => snapshot.filters.search = search,
            FilterUpdate::Status(status) => snapshot.filters.status = status,
            FilterUpdate::Tag(tag) => {
                let counts = tag.as_deref().and_then(|name| {
                    aggregate_counts(snapshot.interviews.iter().map(|i| i.tags.as_slice()), name)
                });
                snapshot.filters.select_tag(tag, counts);
            }
            FilterUpdate::Sentiment(sentiment) => snapshot.filters.select_sentiment(sentiment)?,
        }
        Ok(())
    }

    /// Request sorting by `key`; repeating the current key flips direction.
    pub async fn request_sort(&self, key: InterviewSortKey) -> SortSpec<InterviewSortKey> {
        let mut state = self.state.write().await;
        state.snapshot.sort = state.snapshot.sort.toggled(key);
        state.snapshot.sort
    }

    // --- Reads ---

    /// Local lookup only; fetching a missing interview is a detail store's job.
    pub async fn find_by_id(&self, id: &InterviewId) -> Option<Interview> {
        let state = self.state.read().await;
        state
            .snapshot
            .interviews
            .iter()
            .find(|i| &i.id == id)
            .cloned()
    }

    /// The given 1-indexed page of the filtered, sorted collection.
    pub async fn view(&self, page: usize) -> DerivedView<Interview> {
        let state = self.state.read().await;
        derive_view(
            &state.snapshot.interviews,
            &state.snapshot.filters,
            state.snapshot.sort,
            PageRequest::new(page, self.config.page_size),
        )
    }

    pub async fn snapshot(&self) -> CollectionSnapshot {
        self.state.read().await.snapshot.clone()
    }
}
