//! Store lifecycle bookkeeping and the interview collection store.
//!
//! Every store (and every chat session transcript) moves through the same
//! small state machine: uninitialized -> pending -> ready | errored. Errors
//! are also recorded as sticky flags that the owner clears explicitly
//! before a retry is accepted.

pub mod collection;

use parley_types::error::ErrorKind;

/// Fetch lifecycle of a store or sub-resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Uninitialized,
    Pending,
    Ready,
    Errored,
}

impl LoadState {
    pub fn is_ready(self) -> bool {
        self == LoadState::Ready
    }

    pub fn is_pending(self) -> bool {
        self == LoadState::Pending
    }
}

/// What an initialization call actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// A fetch ran and its result was applied.
    Loaded,
    /// The focal entity loaded but a dependent fetch failed.
    Partial,
    /// Already loaded for this identity; no fetch issued.
    AlreadyLoaded,
    /// A fetch for this identity is already in flight; no fetch issued.
    InFlight,
    /// The store was reset or re-targeted while the fetch was in flight, so
    /// its result was discarded.
    Superseded,
}

/// Sticky error flags, one per [`ErrorKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorFlags {
    pub initialization: bool,
    pub create: bool,
    pub dependents: bool,
    pub update: bool,
}

impl ErrorFlags {
    fn slot(&mut self, kind: ErrorKind) -> &mut bool {
        match kind {
            ErrorKind::Initialization => &mut self.initialization,
            ErrorKind::Create => &mut self.create,
            ErrorKind::Dependents => &mut self.dependents,
            ErrorKind::Update => &mut self.update,
        }
    }

    pub fn raise(&mut self, kind: ErrorKind) {
        *self.slot(kind) = true;
    }

    pub fn clear(&mut self, kind: ErrorKind) {
        *self.slot(kind) = false;
    }

    pub fn is_set(&self, kind: ErrorKind) -> bool {
        match kind {
            ErrorKind::Initialization => self.initialization,
            ErrorKind::Create => self.create,
            ErrorKind::Dependents => self.dependents,
            ErrorKind::Update => self.update,
        }
    }

    pub fn any(&self) -> bool {
        self.initialization || self.create || self.dependents || self.update
    }
}
