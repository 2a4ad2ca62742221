use crate::consent::CoordinatorState;

/// Boundary to the durable store owned by the embedding application.
///
/// The coordinator only needs two things from it: the consumed-once legacy
/// migration signal, and a place to hand off state for persistence between
/// coordinator lifetimes. The storage mechanics themselves live outside
/// this crate.
pub trait ConsentStorage: Send {
    /// Whether leftover state from a previous SDK major version exists.
    /// Reading the signal clears it, so it fires at most once per
    /// installation.
    fn take_legacy_state(&mut self) -> bool;

    /// Persist the current state snapshot. Best-effort; failures are the
    /// implementation's concern.
    fn store_state(&mut self, state: &CoordinatorState);
}

/// Storage that never persists, for embedding without a durable store and
/// for tests.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    legacy_state: bool,
    pub stored: Option<CoordinatorState>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend a previous SDK major version left data behind.
    pub fn with_legacy_state() -> Self {
        Self {
            legacy_state: true,
            stored: None,
        }
    }
}

impl ConsentStorage for InMemoryStorage {
    fn take_legacy_state(&mut self) -> bool {
        std::mem::take(&mut self.legacy_state)
    }

    fn store_state(&mut self, state: &CoordinatorState) {
        self.stored = Some(state.clone());
    }
}
