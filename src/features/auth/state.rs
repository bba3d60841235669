//! Session state for one browser context. The store hydrates the session from
//! durable storage once, when it is built, and is the only writer of the
//! persisted token afterwards. Observers subscribe to a `watch` channel and
//! always receive a whole `Session`, never a half-updated one.

use crate::app_lib::{AppError, ExecutionContext, ACCESS_TOKEN_KEY};
use std::{fmt, sync::Arc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Authentication status of the current context.
///
/// Authentication is derived from the token so the two can never disagree.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns an authenticated session, or an anonymous one for an empty token.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        if token.is_empty() {
            Self::anonymous()
        } else {
            Self {
                token: Some(token.to_string()),
            }
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

// Token material stays out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("is_authenticated", &self.is_authenticated())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Shared handle to the session of one browser context.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<Inner>,
}

struct Inner {
    context: ExecutionContext,
    state: watch::Sender<Session>,
}

impl AuthStore {
    /// Builds the store and hydrates it from durable storage.
    ///
    /// Hydration never fails: a missing, empty or unreadable token leaves the
    /// session anonymous. In a server context storage is not read at all.
    #[must_use]
    pub fn new(context: ExecutionContext) -> Self {
        let initial = hydrate(&context);
        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner { context, state }),
        }
    }

    #[must_use]
    pub fn context(&self) -> &ExecutionContext {
        &self.inner.context
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every login and logout.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    /// Persists `token` and marks the session authenticated.
    ///
    /// # Errors
    /// Returns `AppError::Validation` for an empty token and `AppError::Storage`
    /// if the token cannot be persisted; the session is unchanged in both cases.
    pub fn login(&self, token: &str) -> Result<(), AppError> {
        if token.is_empty() {
            return Err(AppError::Validation(
                "Access token must not be empty.".to_string(),
            ));
        }

        if let Some(storage) = self.inner.context.storage() {
            storage.set_item(ACCESS_TOKEN_KEY, token)?;
        } else {
            debug!("no durable storage in this context, session kept in memory");
        }

        self.inner.state.send_replace(Session::with_token(token));
        info!("session started");

        Ok(())
    }

    /// Removes the persisted token and clears the session. Safe to call repeatedly.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the token cannot be removed from storage.
    /// The in-memory session is cleared even then.
    pub fn logout(&self) -> Result<(), AppError> {
        let removed = match self.inner.context.storage() {
            Some(storage) => storage.remove_item(ACCESS_TOKEN_KEY),
            None => Ok(()),
        };

        let previous = self.inner.state.send_replace(Session::anonymous());
        if previous.is_authenticated() {
            info!("session ended");
        }

        removed
    }
}

impl fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthStore")
            .field("context", &self.inner.context)
            .field("session", &self.current())
            .finish()
    }
}

fn hydrate(context: &ExecutionContext) -> Session {
    let Some(storage) = context.storage() else {
        return Session::anonymous();
    };

    match storage.get_item(ACCESS_TOKEN_KEY) {
        Ok(Some(token)) => {
            let session = Session::with_token(&token);
            debug!(authenticated = session.is_authenticated(), "session hydrated");
            session
        }
        Ok(None) => Session::anonymous(),
        Err(err) => {
            warn!("Failed to read persisted session, starting anonymous: {err}");
            Session::anonymous()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_lib::{storage::tests::TempPath, DurableStorage, FileStorage, MemoryStorage};
    use std::{fs, sync::Arc};

    #[derive(Debug)]
    struct BrokenStorage;

    impl DurableStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, AppError> {
            Err(AppError::Storage("unavailable".to_string()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), AppError> {
            Err(AppError::Storage("quota exceeded".to_string()))
        }

        fn remove_item(&self, _key: &str) -> Result<(), AppError> {
            Err(AppError::Storage("unavailable".to_string()))
        }
    }

    fn browser_store() -> (AuthStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = AuthStore::new(ExecutionContext::Browser(storage.clone()));
        (store, storage)
    }

    #[test]
    fn login_persists_and_authenticates() {
        let (store, storage) = browser_store();

        for token in ["a", "eyJhbGciOi.payload.sig", "token with spaces"] {
            store.login(token).unwrap();

            let session = store.current();
            assert!(session.is_authenticated());
            assert_eq!(session.token(), Some(token));
            assert_eq!(
                storage.get_item(ACCESS_TOKEN_KEY).unwrap(),
                Some(token.to_string())
            );
        }
    }

    #[test]
    fn login_rejects_empty_token() {
        let (store, storage) = browser_store();

        assert!(matches!(store.login(""), Err(AppError::Validation(_))));
        assert!(!store.current().is_authenticated());
        assert_eq!(storage.get_item(ACCESS_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn whitespace_token_is_still_a_token() {
        let (store, storage) = browser_store();

        store.login(" ").unwrap();

        let session = store.current();
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some(" "));
        assert_eq!(
            storage.get_item(ACCESS_TOKEN_KEY).unwrap(),
            Some(" ".to_string())
        );

        let reloaded = AuthStore::new(ExecutionContext::Browser(storage));
        assert_eq!(reloaded.current().token(), Some(" "));
    }

    #[test]
    fn logout_is_idempotent() {
        let (store, storage) = browser_store();

        store.logout().unwrap();
        assert_eq!(store.current(), Session::anonymous());

        store.login("abc").unwrap();
        store.logout().unwrap();
        store.logout().unwrap();

        let session = store.current();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert_eq!(storage.get_item(ACCESS_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn login_logout_login_matches_single_login() {
        let (store, storage) = browser_store();
        store.login("t-1").unwrap();
        store.logout().unwrap();
        store.login("t-1").unwrap();

        let (single, single_storage) = browser_store();
        single.login("t-1").unwrap();

        assert_eq!(store.current(), single.current());
        assert_eq!(
            storage.get_item(ACCESS_TOKEN_KEY).unwrap(),
            single_storage.get_item(ACCESS_TOKEN_KEY).unwrap()
        );
    }

    #[test]
    fn hydrates_from_storage_before_first_read() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(ACCESS_TOKEN_KEY, "persisted").unwrap();

        let store = AuthStore::new(ExecutionContext::Browser(storage));
        let receiver = store.subscribe();

        assert_eq!(receiver.borrow().token(), Some("persisted"));
        assert_eq!(store.current(), Session::with_token("persisted"));
    }

    #[test]
    fn hydration_survives_reload_through_file_storage() {
        let temp = TempPath::new();
        let first = AuthStore::new(ExecutionContext::browser(FileStorage::new(&temp.0)));
        first.login("persisted").unwrap();

        let reloaded = AuthStore::new(ExecutionContext::browser(FileStorage::new(&temp.0)));
        assert_eq!(reloaded.current().token(), Some("persisted"));

        reloaded.logout().unwrap();
        let after_logout = AuthStore::new(ExecutionContext::browser(FileStorage::new(&temp.0)));
        assert!(!after_logout.current().is_authenticated());
    }

    #[test]
    fn empty_or_unreadable_token_hydrates_anonymous() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(ACCESS_TOKEN_KEY, "").unwrap();
        let store = AuthStore::new(ExecutionContext::Browser(storage));
        assert!(!store.current().is_authenticated());

        let store = AuthStore::new(ExecutionContext::browser(BrokenStorage));
        assert!(!store.current().is_authenticated());

        let temp = TempPath::new();
        if let Some(parent) = temp.0.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&temp.0, "not json at all").unwrap();
        let store = AuthStore::new(ExecutionContext::browser(FileStorage::new(&temp.0)));
        assert!(!store.current().is_authenticated());
    }

    #[test]
    fn storage_failures_reach_the_caller() {
        let store = AuthStore::new(ExecutionContext::browser(BrokenStorage));

        assert!(matches!(store.login("abc"), Err(AppError::Storage(_))));
        assert!(!store.current().is_authenticated());

        assert!(matches!(store.logout(), Err(AppError::Storage(_))));
        assert!(!store.current().is_authenticated());
    }

    #[test]
    fn server_context_never_touches_storage() {
        let store = AuthStore::new(ExecutionContext::Server);
        assert!(!store.current().is_authenticated());

        store.login("memory-only").unwrap();
        assert_eq!(store.current().token(), Some("memory-only"));

        store.logout().unwrap();
        assert!(!store.current().is_authenticated());
    }

    #[tokio::test]
    async fn subscribers_observe_every_change() {
        let (store, _) = browser_store();
        let mut receiver = store.subscribe();

        store.login("abc").unwrap();
        receiver.changed().await.unwrap();
        {
            let session = receiver.borrow_and_update();
            assert!(session.is_authenticated());
            assert_eq!(session.token(), Some("abc"));
        }

        store.logout().unwrap();
        receiver.changed().await.unwrap();
        assert_eq!(*receiver.borrow_and_update(), Session::anonymous());
    }

    #[test]
    fn debug_output_redacts_token() {
        let session = Session::with_token("super-secret");
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
