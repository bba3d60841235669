use super::{detail, require_user, validation_error};
use crate::{
    features::auth::{
        types::{ErrorBody, PasswordChange},
        validation::{valid_password, MIN_PASSWORD_LENGTH},
    },
    server::state::{AccountError, ApiState},
};
use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{info, instrument};

#[utoipa::path(
    post,
    path = "/api/users/me/password",
    request_body = PasswordChange,
    responses(
        (status = 204, description = "Password changed."),
        (status = 400, description = "Current password is wrong.", body = ErrorBody),
        (status = 401, description = "Missing, unknown or expired bearer token.", body = ErrorBody),
        (status = 422, description = "New password rejected.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn change_password(
    headers: HeaderMap,
    state: Extension<Arc<ApiState>>,
    payload: Result<Json<PasswordChange>, JsonRejection>,
) -> Response {
    let user = match require_user(&headers, &state).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    let change = match payload {
        Ok(Json(change)) => change,
        Err(rejection) => return validation_error(&["body"], &rejection.body_text()),
    };

    if !valid_password(&change.new_password) {
        return validation_error(
            &["body", "new_password"],
            &format!("String should have at least {MIN_PASSWORD_LENGTH} characters"),
        );
    }

    match state
        .change_password(
            &user.email,
            &change.current_password,
            SecretString::from(change.new_password),
        )
        .await
    {
        Ok(()) => {
            info!(user_id = %user.id, "password changed");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(AccountError::InvalidCredentials) => {
            detail(StatusCode::BAD_REQUEST, "Incorrect password")
        }
        Err(_) => super::unauthorized(super::CREDENTIALS_DETAIL),
    }
}
