use super::{detail, validation_error};
use crate::{
    features::auth::{
        types::{ErrorBody, UserCreate, UserPublic},
        validation::{valid_email, valid_password, MIN_PASSWORD_LENGTH},
    },
    server::state::{AccountError, ApiState},
};
use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, instrument};

#[utoipa::path(
    post,
    path= "/api/register",
    request_body = UserCreate,
    responses (
        (status = 200, description = "Account created", body = UserPublic),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 422, description = "Invalid email or password", body = ErrorBody),
    ),
    tag= "auth"
)]
#[instrument(skip_all)]
pub async fn register(
    state: Extension<Arc<ApiState>>,
    payload: Result<Json<UserCreate>, JsonRejection>,
) -> Response {
    let user = match payload {
        Ok(Json(user)) => user,
        Err(rejection) => return validation_error(&["body"], &rejection.body_text()),
    };

    if !valid_email(&user.email) {
        return validation_error(&["body", "email"], "value is not a valid email address");
    }

    if !valid_password(&user.password) {
        return validation_error(
            &["body", "password"],
            &format!("String should have at least {MIN_PASSWORD_LENGTH} characters"),
        );
    }

    match state
        .create_user(&user.email, SecretString::from(user.password))
        .await
    {
        Ok(public) => (StatusCode::OK, Json(public)).into_response(),
        Err(AccountError::AlreadyRegistered) => {
            debug!("registration for an existing email");
            detail(StatusCode::CONFLICT, "Email already registered")
        }
        Err(_) => detail(StatusCode::INTERNAL_SERVER_ERROR, "Registration failed"),
    }
}
