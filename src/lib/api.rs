//! HTTP pipeline for the JSON API. Every call goes through [`ApiClient::execute`],
//! which runs the registered request interceptors, sends the request with the
//! configured timeout, lets the response interceptors observe the outcome and
//! then hands the untouched outcome back to the caller.

use super::{
    config::AppConfig,
    errors::{error_message, AppError},
};
use reqwest::{Client, Method, Request, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Runs before a request is sent and may mutate it.
pub trait RequestInterceptor: Send + Sync {
    fn on_request(&self, request: &mut Request);
}

/// Observes the outcome of a request. Interceptors cannot replace the
/// outcome; the caller always receives the original response or error.
pub trait ResponseInterceptor: Send + Sync {
    fn on_response(&self, status: StatusCode);

    /// Transport failures. Errors from [`ApiClient::execute`] never carry a
    /// status since reqwest only reports one for `error_for_status`; the
    /// default still forwards it when present.
    fn on_error(&self, error: &reqwest::Error) {
        if let Some(status) = error.status() {
            self.on_response(status);
        }
    }
}

/// API client with an ordered interceptor pipeline registered once at construction.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl ApiClient {
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_request_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.request_interceptors.push(interceptor);
        self
    }

    #[must_use]
    pub fn with_response_interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.response_interceptors.push(interceptor);
        self
    }

    /// Starts a request against the configured API base URL.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, build_url_with_base(&self.base_url, path))
    }

    /// Sends a request through the interceptor pipeline.
    ///
    /// # Errors
    /// Returns `AppError::Timeout` or `AppError::Network` on transport failures.
    #[instrument(skip_all, fields(method = %request.method(), path = %request.url().path()))]
    pub async fn execute(&self, mut request: Request) -> Result<Response, AppError> {
        for interceptor in &self.request_interceptors {
            interceptor.on_request(&mut request);
        }

        let outcome = self.http.execute(request).await;

        match &outcome {
            Ok(response) => {
                debug!(status = %response.status(), "response received");
                for interceptor in &self.response_interceptors {
                    interceptor.on_response(response.status());
                }
            }
            Err(err) => {
                debug!("request failed: {err}");
                for interceptor in &self.response_interceptors {
                    interceptor.on_error(err);
                }
            }
        }

        outcome.map_err(map_request_error)
    }

    /// Fetches JSON.
    ///
    /// # Errors
    /// Returns an `AppError` on transport, HTTP or decoding failures.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let request = build(self.request(Method::GET, path))?;
        let response = self.execute(request).await?;
        handle_json_response(response).await
    }

    /// Posts JSON and parses a JSON response.
    ///
    /// # Errors
    /// Returns an `AppError` on encoding, transport, HTTP or decoding failures.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let request = build(self.request(Method::POST, path).json(body))?;
        let response = self.execute(request).await?;
        handle_json_response(response).await
    }

    /// Posts JSON and expects an empty response body.
    ///
    /// # Errors
    /// Returns an `AppError` on encoding, transport or HTTP failures.
    pub async fn post_json_empty<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), AppError> {
        let request = build(self.request(Method::POST, path).json(body))?;
        let response = self.execute(request).await?;
        handle_empty_response(response).await
    }

    /// Posts a form-encoded body and parses a JSON response.
    ///
    /// # Errors
    /// Returns an `AppError` on encoding, transport, HTTP or decoding failures.
    pub async fn post_form<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        form: &B,
    ) -> Result<T, AppError> {
        let request = build(self.request(Method::POST, path).form(form))?;
        let response = self.execute(request).await?;
        handle_json_response(response).await
    }
}

fn build(builder: RequestBuilder) -> Result<Request, AppError> {
    builder
        .build()
        .map_err(|err| AppError::Serialization(format!("Failed to build request: {err}")))
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Maps network errors into user-facing `AppError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors with their `detail` message.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(response).await)
    }
}

/// Handles empty responses and returns HTTP errors when needed.
async fn handle_empty_response(response: Response) -> Result<(), AppError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(http_error(response).await)
    }
}

async fn http_error(response: Response) -> AppError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    AppError::Http {
        status,
        message: error_message(&body),
    }
}
