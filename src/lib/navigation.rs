//! Client-side navigation. Pages and interceptors never switch views
//! themselves; they ask the [`Navigator`] for a full navigation and the
//! browser shell applies it once the current handler has finished.

use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Entry point unauthenticated visitors are sent to.
pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Forces a full navigation from client code.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

#[derive(Debug, Default)]
struct HistoryState {
    entries: Vec<String>,
    pending: Option<String>,
}

/// Location history of one browser context.
///
/// `navigate` only records a pending target; repeated requests before it is
/// applied collapse into one, the latest target winning.
#[derive(Debug, Default)]
pub struct History {
    state: Mutex<HistoryState>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current location, `None` before the first page is committed.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.entries.last().cloned()
    }

    /// Records `path` as the rendered location.
    pub fn commit(&self, path: &str) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.entries.push(path.to_string());
    }

    /// Takes the pending forced navigation, if any.
    pub fn take_pending(&self) -> Option<String> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.pending.take()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.entries.clone()
    }
}

impl Navigator for History {
    fn navigate(&self, path: &str) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(target_path = path, "navigation requested");
        state.pending = Some(path.to_string());
    }
}
