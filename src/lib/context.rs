//! Execution context capability. Code that needs durable storage asks the
//! context for it instead of probing the environment; in a server-side
//! context there is no storage and the session stays anonymous.

use super::storage::DurableStorage;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub enum ExecutionContext {
    /// Interactive context with durable storage available.
    Browser(Arc<dyn DurableStorage>),
    /// Prerendering or other non-interactive context; storage is never touched.
    Server,
}

impl ExecutionContext {
    pub fn browser(storage: impl DurableStorage + 'static) -> Self {
        Self::Browser(Arc::new(storage))
    }

    #[must_use]
    pub fn storage(&self) -> Option<&dyn DurableStorage> {
        match self {
            Self::Browser(storage) => Some(storage.as_ref()),
            Self::Server => None,
        }
    }

    #[must_use]
    pub fn is_browser(&self) -> bool {
        matches!(self, Self::Browser(_))
    }
}
