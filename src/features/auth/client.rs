//! Client wrappers for the authentication endpoints. Tokens are attached by
//! the pipeline's interceptors, never here, and payloads holding passwords
//! must not be logged.

use super::types::{LoginForm, PasswordChange, Token, UserCreate, UserPublic};
use crate::app_lib::{errors::EMPTY_BODY_MESSAGE, ApiClient, AppError};
use tracing::instrument;

pub const REGISTER_ENDPOINT: &str = "/api/register";
pub const LOGIN_ENDPOINT: &str = "/api/login";
pub const CURRENT_USER_ENDPOINT: &str = "/api/users/me/";
pub const PASSWORD_ENDPOINT: &str = "/api/users/me/password";

/// Creates an account.
///
/// # Errors
/// Returns an `AppError` on transport failures or when the API rejects the payload.
#[instrument(skip_all)]
pub async fn register_user(api: &ApiClient, request: &UserCreate) -> Result<UserPublic, AppError> {
    api.post_json(REGISTER_ENDPOINT, request).await
}

/// Exchanges credentials for an access token.
///
/// # Errors
/// Returns an `AppError` on transport failures or rejected credentials.
#[instrument(skip_all)]
pub async fn login_user(api: &ApiClient, email: &str, password: &str) -> Result<Token, AppError> {
    let form = LoginForm {
        username: email.to_string(),
        password: password.to_string(),
    };
    api.post_form(LOGIN_ENDPOINT, &form).await
}

/// Fetches the account behind the current session.
///
/// # Errors
/// Returns an `AppError`; a `401` also ends the session through the pipeline.
#[instrument(skip_all)]
pub async fn read_current_user(api: &ApiClient) -> Result<UserPublic, AppError> {
    api.get_json(CURRENT_USER_ENDPOINT).await
}

/// Replaces the password of the current account.
///
/// # Errors
/// Returns an `AppError` on transport failures or when the API rejects the change.
#[instrument(skip_all)]
pub async fn change_password(api: &ApiClient, request: &PasswordChange) -> Result<(), AppError> {
    api.post_json_empty(PASSWORD_ENDPOINT, request).await
}

/// Registration with the generic fallback message used by the register page.
///
/// # Errors
/// Same as [`register_user`], with HTTP errors lacking a detail reported as
/// "Registration failed".
pub async fn register_api(
    api: &ApiClient,
    email: &str,
    password: &str,
) -> Result<UserPublic, AppError> {
    let request = UserCreate {
        email: email.to_string(),
        password: password.to_string(),
    };
    register_user(api, &request)
        .await
        .map_err(|err| with_fallback(err, "Registration failed"))
}

/// Login with the generic fallback message used by the login page.
///
/// # Errors
/// Same as [`login_user`], with HTTP errors lacking a detail reported as "Login failed".
pub async fn login_api(api: &ApiClient, email: &str, password: &str) -> Result<Token, AppError> {
    login_user(api, email, password)
        .await
        .map_err(|err| with_fallback(err, "Login failed"))
}

fn with_fallback(err: AppError, fallback: &str) -> AppError {
    match err {
        AppError::Http { status, message } if message == EMPTY_BODY_MESSAGE => AppError::Http {
            status,
            message: fallback.to_string(),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_only_replaces_empty_http_messages() {
        let empty = AppError::Http {
            status: 500,
            message: EMPTY_BODY_MESSAGE.to_string(),
        };
        assert_eq!(
            with_fallback(empty, "Login failed"),
            AppError::Http {
                status: 500,
                message: "Login failed".to_string(),
            }
        );

        let detailed = AppError::Http {
            status: 401,
            message: "Incorrect email or password".to_string(),
        };
        assert_eq!(with_fallback(detailed.clone(), "Login failed"), detailed);

        let network = AppError::Network("down".to_string());
        assert_eq!(with_fallback(network.clone(), "Login failed"), network);
    }
}
