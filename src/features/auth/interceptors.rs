//! Interceptors wiring the session into the API pipeline: one attaches the
//! bearer token to outgoing requests, the other reacts to `401` responses by
//! ending the session and sending the user back to the login page.

use super::state::AuthStore;
use crate::app_lib::{Navigator, RequestInterceptor, ResponseInterceptor, LOGIN_PATH};
use reqwest::{
    header::{HeaderValue, AUTHORIZATION},
    Request, StatusCode,
};
use std::sync::Arc;
use tracing::{error, warn};

/// Attaches `Authorization: Bearer <token>` while a session exists.
pub struct BearerAuth {
    store: AuthStore,
}

impl BearerAuth {
    #[must_use]
    pub fn new(store: AuthStore) -> Self {
        Self { store }
    }
}

impl RequestInterceptor for BearerAuth {
    fn on_request(&self, request: &mut Request) {
        if !self.store.context().is_browser() {
            return;
        }

        let session = self.store.current();
        let Some(token) = session.token() else {
            return;
        };

        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(_) => warn!(
                "Stored access token is not a valid header value, sending request without it"
            ),
        }
    }
}

/// Ends the session on `401 Unauthorized` and forces navigation to the login page.
pub struct UnauthorizedGuard {
    store: AuthStore,
    navigator: Arc<dyn Navigator>,
}

impl UnauthorizedGuard {
    #[must_use]
    pub fn new(store: AuthStore, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }
}

impl ResponseInterceptor for UnauthorizedGuard {
    fn on_response(&self, status: StatusCode) {
        if status != StatusCode::UNAUTHORIZED {
            return;
        }

        warn!("API rejected credentials, ending session");
        if let Err(err) = self.store.logout() {
            error!("Failed to clear persisted session: {err}");
        }
        self.navigator.navigate(LOGIN_PATH);
    }
}
