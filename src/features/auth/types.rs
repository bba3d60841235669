use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Registration payload.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
}

/// Login form fields; the email travels as `username`.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Access token issued on login.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// Public view of an account.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
pub struct UserPublic {
    pub id: String,
    pub email: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

/// Error body returned by the API; `detail` is either a message or a list of
/// validation errors.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorBody {
    pub detail: ErrorDetail,
}

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Validation(Vec<ValidationError>),
}

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct ValidationError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}
