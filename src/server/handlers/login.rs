use super::{detail, unauthorized};
use crate::{
    features::auth::types::{ErrorBody, LoginForm, Token},
    server::state::ApiState,
};
use axum::{
    extract::{rejection::FormRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use std::sync::Arc;
use tracing::{debug, instrument};

#[utoipa::path(
    post,
    path= "/api/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 200, description = "Access token issued", body = Token),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Incorrect email or password", body = ErrorBody),
    ),
    tag= "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    state: Extension<Arc<ApiState>>,
    payload: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let Ok(Form(form)) = payload else {
        return detail(StatusCode::BAD_REQUEST, "Email and password are required");
    };

    if form.username.trim().is_empty() || form.password.is_empty() {
        return detail(StatusCode::BAD_REQUEST, "Email and password are required");
    }

    match state.login(&form.username, &form.password).await {
        Ok(access_token) => {
            let token = Token {
                access_token,
                token_type: "bearer".to_string(),
            };
            (StatusCode::OK, Json(token)).into_response()
        }
        Err(_) => {
            debug!("login rejected");
            unauthorized("Incorrect email or password")
        }
    }
}
