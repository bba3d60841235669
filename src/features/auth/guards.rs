use super::state::Session;
use crate::app_lib::LOGIN_PATH;
use reqwest::StatusCode;

/// Decision taken before a protected view renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    Render,
    Redirect { status: StatusCode, location: String },
}

/// Lets authenticated sessions through and sends everyone else to the login
/// page with a temporary redirect. Runs synchronously against the hydrated
/// session; it never calls the API.
// UX-only guard; real access control must live on the API.
#[must_use]
pub fn require_auth(session: &Session) -> GuardOutcome {
    if session.is_authenticated() {
        GuardOutcome::Render
    } else {
        GuardOutcome::Redirect {
            status: StatusCode::FOUND,
            location: LOGIN_PATH.to_string(),
        }
    }
}
