use std::sync::{Arc, Mutex};

use pawhaven_shared::token::AuthToken;
use tracing::{debug, info, instrument, warn};

use super::{Identity, MemoryStore, Session, SessionSnapshot, SessionStore};

/// Counter that changes every time a login starts or the session is cleared.
/// Used to reject writes from work that was started for an older session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SessionGeneration(u64);

#[derive(Debug, thiserror::Error)]
#[error("write from session generation {attempted:?} rejected, current is {current:?}")]
pub(crate) struct StaleGenerationError {
    pub attempted: SessionGeneration,
    pub current: SessionGeneration,
}

/// Owner of the in memory identity and the only writer of the persisted store
///
/// Cheap to clone, all clones share the same session
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Mutex<SessionInner>>,
}

struct SessionInner {
    identity: Option<Arc<Identity>>,
    generation: SessionGeneration,
    store: Box<dyn SessionStore>,
    /// Set after a failed write, from then on the session is memory only
    is_persistence_degraded: bool,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.inner.lock().expect("mutex poisoned");
        f.debug_struct("SessionContext")
            .field("identity", &guard.identity)
            .field("generation", &guard.generation)
            .field("is_persistence_degraded", &guard.is_persistence_degraded)
            .finish()
    }
}

impl SessionContext {
    /// Creates the context and hydrates it from `store`
    ///
    /// Unreadable or malformed persisted data is treated as no session (and
    /// cleared) rather than an error
    #[instrument(skip(store))]
    pub fn new<S: SessionStore + 'static>(store: S) -> Self {
        let mut store: Box<dyn SessionStore> = Box::new(store);
        let identity = hydrate(store.as_mut());
        info!(is_logged_in = identity.is_some(), "session context initialized");
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                identity,
                generation: SessionGeneration(0),
                store,
                is_persistence_degraded: false,
            })),
        }
    }

    /// Context backed by a fresh [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn current(&self) -> Session {
        match &self.inner.lock().expect("mutex poisoned").identity {
            Some(identity) => Session::Authenticated(Arc::clone(identity)),
            None => Session::Anonymous,
        }
    }

    /// Both read under the same lock so they are guaranteed to belong together
    pub(crate) fn current_with_generation(&self) -> (Session, SessionGeneration) {
        let guard = self.inner.lock().expect("mutex poisoned");
        let session = match &guard.identity {
            Some(identity) => Session::Authenticated(Arc::clone(identity)),
            None => Session::Anonymous,
        };
        (session, guard.generation)
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .identity
            .is_some()
    }

    pub fn generation(&self) -> SessionGeneration {
        self.inner.lock().expect("mutex poisoned").generation
    }

    pub fn is_persistence_degraded(&self) -> bool {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .is_persistence_degraded
    }

    /// Replaces the current identity in memory and persists it
    ///
    /// Never fails, if the store rejects the write the session continues in
    /// memory only and no further writes are attempted
    #[instrument(skip_all, fields(user_id = tracing::field::Empty))]
    pub fn set<I: Into<Arc<Identity>>>(&self, identity: I) {
        let identity = identity.into();
        tracing::Span::current().record("user_id", tracing::field::display(identity.user_id()));
        let mut guard = self.inner.lock().expect("mutex poisoned");
        guard.set_identity(identity);
    }

    /// Removes the identity from memory and every key from storage
    ///
    /// Safe to call when already anonymous. Also invalidates any in flight
    /// login
    #[instrument(skip(self))]
    pub fn clear(&self) {
        self.inner.lock().expect("mutex poisoned").clear();
    }

    /// Re-derives the session from storage without touching memory
    ///
    /// When persistence has degraded storage no longer reflects the session
    /// so the in memory session is returned instead
    #[instrument(skip(self))]
    pub fn rehydrate(&self) -> Session {
        let mut guard = self.inner.lock().expect("mutex poisoned");
        if guard.is_persistence_degraded {
            debug!("persistence degraded, using in memory session");
            return guard
                .identity
                .clone()
                .map(Session::Authenticated)
                .unwrap_or_default();
        }
        match hydrate(guard.store.as_mut()) {
            Some(identity) => Session::Authenticated(identity),
            None => Session::Anonymous,
        }
    }

    /// Starts a new login attempt, anything still running for an older
    /// attempt will no longer be able to commit
    pub(crate) fn begin_attempt(&self) -> SessionGeneration {
        let mut guard = self.inner.lock().expect("mutex poisoned");
        guard.advance_generation();
        guard.generation
    }

    /// Like [`Self::set`] but only if no login or clear has happened since
    /// `generation` was obtained
    pub(crate) fn commit(
        &self,
        generation: SessionGeneration,
        identity: impl Into<Arc<Identity>>,
    ) -> Result<Arc<Identity>, StaleGenerationError> {
        let mut guard = self.inner.lock().expect("mutex poisoned");
        if guard.generation != generation {
            warn!(
                attempted = ?generation,
                current = ?guard.generation,
                "rejecting stale session write"
            );
            return Err(StaleGenerationError {
                attempted: generation,
                current: guard.generation,
            });
        }
        let identity = identity.into();
        guard.set_identity(Arc::clone(&identity));
        Ok(identity)
    }

    /// Clears the session only if it still holds `token`. Login attempts that
    /// have not committed (including failed ones) do not protect the session
    ///
    /// Returns `true` if the session was cleared
    pub(crate) fn clear_if_current(&self, token: &AuthToken) -> bool {
        let mut guard = self.inner.lock().expect("mutex poisoned");
        let is_current = guard
            .identity
            .as_ref()
            .is_some_and(|identity| identity.token() == token);
        if !is_current {
            debug!("not clearing, session changed since request was sent");
            return false;
        }
        guard.clear();
        true
    }
}

impl SessionInner {
    fn advance_generation(&mut self) {
        self.generation = SessionGeneration(self.generation.0 + 1);
    }

    fn clear(&mut self) {
        self.advance_generation();
        self.identity = None;
        if let Err(e) = SessionSnapshot::clear(self.store.as_mut()) {
            warn!(?e, "failed to clear persisted session");
        }
        info!("session cleared");
    }

    fn set_identity(&mut self, identity: Arc<Identity>) {
        if self.is_persistence_degraded {
            debug!("persistence degraded, updating memory only");
        } else if let Err(e) =
            SessionSnapshot::from_identity(&identity).write_to(self.store.as_mut())
        {
            warn!(?e, "failed to persist session, continuing with memory only session");
            self.is_persistence_degraded = true;
            // Don't leave a half written snapshot behind
            pawhaven_shared::log_err_as_error!(SessionSnapshot::clear(self.store.as_mut()));
        }
        self.identity = Some(identity);
    }
}

fn hydrate(store: &mut dyn SessionStore) -> Option<Arc<Identity>> {
    match SessionSnapshot::read_from(store) {
        Ok(snapshot) => snapshot.map(|x| Arc::new(x.into_identity())),
        Err(e) => {
            warn!(?e, "persisted session is unusable, starting anonymous");
            pawhaven_shared::log_err_as_warn!(SessionSnapshot::clear(store));
            None
        }
    }
}
