use super::require_user;
use crate::{
    features::auth::types::{ErrorBody, UserPublic},
    server::state::ApiState,
};
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/users/me/",
    responses(
        (status = 200, description = "Return the authenticated account.", body = UserPublic),
        (status = 401, description = "Missing, unknown or expired bearer token.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn me(headers: HeaderMap, state: Extension<Arc<ApiState>>) -> Response {
    match require_user(&headers, &state).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(response) => response,
    }
}
