//! Auth feature module covering the bearer-token session: the store that
//! persists and broadcasts it, the interceptors that attach it to API calls
//! and react to `401`s, the route guard, and the API operations used by the
//! login, register and change-password pages. This module touches security
//! boundaries and must avoid logging tokens or passwords.
//!
//! Flow Overview: Register posts `UserCreate` and sends the user to `/login`.
//! Login posts the form credentials, stores the returned token and opens `/`.
//! Any `401` from the API ends the session and returns the user to `/login`.

pub mod client;
pub mod guards;
pub mod interceptors;
pub mod state;
pub mod types;
pub mod validation;

pub use guards::{require_auth, GuardOutcome};
pub use interceptors::{BearerAuth, UnauthorizedGuard};
pub use state::{AuthStore, Session};
