pub mod health;
pub use self::health::health;

pub mod register;
pub use self::register::register;

pub mod login;
pub use self::login::login;

pub mod me;
pub use self::me::me;

pub mod password;
pub use self::password::change_password;

// common functions for the handlers
use super::state::ApiState;
use crate::features::auth::types::{ErrorBody, ErrorDetail, UserPublic, ValidationError};
use axum::{
    http::{
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};

pub const CREDENTIALS_DETAIL: &str = "Could not validate credentials";

/// `{"detail": "<message>"}` with the given status.
pub fn detail(status: StatusCode, message: &str) -> Response {
    let body = ErrorBody {
        detail: ErrorDetail::Message(message.to_string()),
    };
    (status, Json(body)).into_response()
}

/// `422` with a single validation entry, shaped like the list form of `detail`.
pub fn validation_error(loc: &[&str], message: &str) -> Response {
    let body = ErrorBody {
        detail: ErrorDetail::Validation(vec![ValidationError {
            loc: loc.iter().map(ToString::to_string).collect(),
            msg: message.to_string(),
            kind: "value_error".to_string(),
        }]),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

/// `401` carrying `WWW-Authenticate: Bearer`.
pub fn unauthorized(message: &str) -> Response {
    let mut response = detail(StatusCode::UNAUTHORIZED, message);
    response
        .headers_mut()
        .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Resolves the bearer token to its account or produces the `401` response.
pub async fn require_user(headers: &HeaderMap, state: &ApiState) -> Result<UserPublic, Response> {
    let Some(token) = bearer_token(headers) else {
        return Err(unauthorized("Not authenticated"));
    };
    state
        .user_for_token(token)
        .await
        .ok_or_else(|| unauthorized(CREDENTIALS_DETAIL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer   abc "));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn unauthorized_sets_challenge() {
        let response = unauthorized(CREDENTIALS_DETAIL);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE),
            Some(&HeaderValue::from_static("Bearer"))
        );
    }
}
