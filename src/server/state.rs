//! In-memory account and token registry backing the development API.

use crate::features::auth::types::UserPublic;
use secrecy::{ExposeSecret, SecretString};
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::debug;
use ulid::Ulid;

/// Default lifetime of issued access tokens.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

struct UserRecord {
    id: String,
    email: String,
    password: SecretString,
}

impl UserRecord {
    fn public(&self) -> UserPublic {
        UserPublic {
            id: self.id.clone(),
            email: self.email.clone(),
        }
    }
}

struct IssuedToken {
    email_key: String,
    /// `None` when the lifetime does not fit in an `Instant`.
    expires_at: Option<Instant>,
}

impl IssuedToken {
    fn expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AccountError {
    AlreadyRegistered,
    InvalidCredentials,
    UnknownUser,
}

pub struct ApiState {
    users: RwLock<HashMap<String, UserRecord>>,
    tokens: RwLock<HashMap<String, IssuedToken>>,
    token_ttl: Duration,
}

impl ApiState {
    #[must_use]
    pub fn new(token_ttl: Duration) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            tokens: RwLock::new(HashMap::new()),
            token_ttl,
        }
    }

    /// # Errors
    /// Returns `AccountError::AlreadyRegistered` if the email is taken (case-insensitive).
    pub async fn create_user(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<UserPublic, AccountError> {
        let key = email_key(email);
        let mut users = self.users.write().await;
        if users.contains_key(&key) {
            return Err(AccountError::AlreadyRegistered);
        }

        let record = UserRecord {
            id: Ulid::new().to_string(),
            email: email.trim().to_string(),
            password,
        };
        let public = record.public();
        users.insert(key, record);
        debug!(user_id = %public.id, "user created");

        Ok(public)
    }

    /// Checks credentials and issues a fresh access token. Expired tokens are
    /// pruned on every issue.
    ///
    /// # Errors
    /// Returns `AccountError::InvalidCredentials` for an unknown email or a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AccountError> {
        let key = email_key(email);
        {
            let users = self.users.read().await;
            let record = users.get(&key).ok_or(AccountError::InvalidCredentials)?;
            if record.password.expose_secret() != password {
                return Err(AccountError::InvalidCredentials);
            }
        }

        let now = Instant::now();
        let token = Ulid::new().to_string();
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, issued| !issued.expired(now));
        if tokens.len() < before {
            debug!(pruned = before - tokens.len(), "expired tokens pruned");
        }
        tokens.insert(
            token.clone(),
            IssuedToken {
                email_key: key,
                expires_at: now.checked_add(self.token_ttl),
            },
        );

        Ok(token)
    }

    /// Resolves a bearer token to its account, dropping it if it has expired.
    pub async fn user_for_token(&self, token: &str) -> Option<UserPublic> {
        let key = {
            let mut tokens = self.tokens.write().await;
            let issued = tokens.get(token)?;
            if issued.expired(Instant::now()) {
                tokens.remove(token);
                debug!("expired token rejected");
                return None;
            }
            issued.email_key.clone()
        };

        self.users.read().await.get(&key).map(UserRecord::public)
    }

    /// # Errors
    /// Returns `AccountError::InvalidCredentials` if `current` does not match,
    /// or `AccountError::UnknownUser` if the account no longer exists.
    pub async fn change_password(
        &self,
        email: &str,
        current: &str,
        new: SecretString,
    ) -> Result<(), AccountError> {
        let mut users = self.users.write().await;
        let record = users
            .get_mut(&email_key(email))
            .ok_or(AccountError::UnknownUser)?;
        if record.password.expose_secret() != current {
            return Err(AccountError::InvalidCredentials);
        }
        record.password = new;
        Ok(())
    }
}

impl Default for ApiState {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_TTL)
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}
