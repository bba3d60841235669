//! Shared client utilities: the API pipeline, configuration, durable storage,
//! the execution context capability, navigation and errors.
//!
//! ## Session Flow
//!
//! 1. **Hydrate:** when a browser context starts, the auth store reads the
//!    `access_token` entry from durable storage once, before any route is resolved.
//! 2. **Authenticate:** every API call passes through the request interceptors,
//!    which attach `Authorization: Bearer <token>` while a session exists.
//! 3. **Invalidate:** a `401` observed by the response interceptors clears the
//!    session and forces navigation to `/login`; the error still reaches the caller.
//!
//! Centralizing these helpers keeps network behavior consistent and avoids duplicated
//! logic in routes and features. Callers must avoid logging tokens or passwords.

pub mod api;
pub mod config;
pub mod context;
pub mod errors;
pub mod navigation;
pub mod storage;

pub use api::{ApiClient, RequestInterceptor, ResponseInterceptor};
pub use config::AppConfig;
pub use context::ExecutionContext;
pub use errors::AppError;
pub use navigation::{History, Navigator, HOME_PATH, LOGIN_PATH};
pub use storage::{DurableStorage, FileStorage, MemoryStorage, ACCESS_TOKEN_KEY};
