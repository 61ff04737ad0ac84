//! Request orchestrator.
//!
//! Every operation flows through the same pipeline: connectivity gate,
//! bearer attachment, dispatch with a per-request timeout, a single
//! refresh-and-retry cycle on 401, classification of the outcome, and
//! exponential-backoff retry for transient failures. Mutating requests
//! issued while offline are diverted into the [`OfflineQueue`] instead
//! of failing outright.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use wayfarer_common::{ApiError, RetryStrategy};

use crate::auth::service::AuthError;
use crate::auth::traits::AccessTokenProvider;
use crate::config::{ClientConfig, ConfigError};
use crate::connectivity::{AlwaysOnline, ConnectivityMonitor};
use crate::queue::core::OfflineQueue;
use crate::queue::types::{MultipartPayload, ReplayTicket, RequestBody};

use super::classify::{classify_status, classify_transport};
use super::reporter::{ErrorReporter, TracingReporter};
use super::response::ApiResponse;

/// Token provider for clients without an auth layer. Requests go out
/// without a bearer; a 401 cannot be recovered from.
struct AnonymousTokens;

#[async_trait]
impl AccessTokenProvider for AnonymousTokens {
    async fn access_token(&self) -> Result<Option<String>, AuthError> {
        Ok(None)
    }

    async fn refresh(&self) -> Result<(), AuthError> {
        Err(AuthError::NotAuthenticated)
    }
}

/// Builder wiring the orchestrator's collaborators.
///
/// Only the configuration is required; auth defaults to anonymous,
/// connectivity to always-online, and reporting to `tracing`.
pub struct ApiClientBuilder {
    config: ClientConfig,
    auth: Option<Arc<dyn AccessTokenProvider>>,
    connectivity: Option<Arc<dyn ConnectivityMonitor>>,
    reporter: Option<Arc<dyn ErrorReporter>>,
    retry: Option<RetryStrategy>,
}

impl ApiClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self { config, auth: None, connectivity: None, reporter: None, retry: None }
    }

    /// Sets the token provider consulted for bearer tokens and refresh.
    #[must_use]
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the connectivity signal gating network dispatch.
    #[must_use]
    pub fn connectivity(mut self, monitor: Arc<dyn ConnectivityMonitor>) -> Self {
        self.connectivity = Some(monitor);
        self
    }

    /// Sets the sink receiving every classified error.
    #[must_use]
    pub fn reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Replaces the backoff schedule derived from the configuration.
    #[must_use]
    pub fn retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry = Some(strategy);
        self
    }

    pub fn build(self) -> Result<ApiClient, ConfigError> {
        self.config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        let retry = match self.retry {
            Some(strategy) => strategy,
            None => RetryStrategy::new().with_max_attempts(self.config.max_attempts).map_err(
                |e| ConfigError::InvalidVar {
                    name: "WAYFARER_API_MAX_ATTEMPTS".to_string(),
                    message: e.to_string(),
                },
            )?,
        };

        let queue = OfflineQueue::new(self.config.queue_capacity);

        Ok(ApiClient {
            http,
            auth: self.auth.unwrap_or_else(|| Arc::new(AnonymousTokens)),
            connectivity: self.connectivity.unwrap_or_else(|| Arc::new(AlwaysOnline)),
            reporter: self.reporter.unwrap_or_else(|| Arc::new(TracingReporter)),
            retry,
            queue,
            config: self.config,
        })
    }
}

/// HTTP client for the Wayfarer API.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    auth: Arc<dyn AccessTokenProvider>,
    connectivity: Arc<dyn ConnectivityMonitor>,
    reporter: Arc<dyn ErrorReporter>,
    retry: RetryStrategy,
    queue: OfflineQueue,
}

impl ApiClient {
    /// Starts a builder for the given configuration.
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder::new(config)
    }

    /// Sends a GET request.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResponse<T> {
        self.request(Method::GET, endpoint, None).await
    }

    /// Sends a POST request with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResponse<T> {
        match to_json_body(body) {
            Ok(json) => self.request(Method::POST, endpoint, Some(RequestBody::Json(json))).await,
            Err(err) => self.fail(endpoint, err),
        }
    }

    /// Sends a PUT request with a JSON body.
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResponse<T> {
        match to_json_body(body) {
            Ok(json) => self.request(Method::PUT, endpoint, Some(RequestBody::Json(json))).await,
            Err(err) => self.fail(endpoint, err),
        }
    }

    /// Sends a PATCH request with a JSON body.
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResponse<T> {
        match to_json_body(body) {
            Ok(json) => self.request(Method::PATCH, endpoint, Some(RequestBody::Json(json))).await,
            Err(err) => self.fail(endpoint, err),
        }
    }

    /// Sends a DELETE request.
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResponse<T> {
        self.request(Method::DELETE, endpoint, None).await
    }

    /// Uploads a file as a multipart POST. The bytes are buffered so the
    /// upload can be queued offline and replayed like any other mutation.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) -> ApiResponse<T> {
        let payload = MultipartPayload {
            field_name: field_name.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data,
        };
        self.request(Method::POST, endpoint, Some(RequestBody::Multipart(payload))).await
    }

    /// Sends a request through the full pipeline, discarding the replay
    /// ticket for offline-queued mutations. See [`Self::request_with_replay`]
    /// when the deferred outcome matters.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<RequestBody>,
    ) -> ApiResponse<T> {
        self.request_with_replay(method, endpoint, body).await.0
    }

    /// Sends a request through the full pipeline.
    ///
    /// While offline, mutating requests are buffered and answered with an
    /// immediate `Offline`-kind failure plus a [`ReplayTicket`] resolving
    /// to the eventual replay outcome. Reads, and mutations rejected by a
    /// full queue, fail immediately without a ticket.
    pub async fn request_with_replay<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<RequestBody>,
    ) -> (ApiResponse<T>, Option<ReplayTicket>) {
        if !self.connectivity.is_online() {
            if is_mutating(&method) {
                return match self.queue.enqueue(method, endpoint, body).await {
                    Ok(ticket) => {
                        let err = ApiError::offline("Request queued while offline");
                        self.reporter.report(endpoint, &err);
                        let response = ApiResponse::fail(err)
                            .with_message("Queued for replay when connectivity returns");
                        (response, Some(ticket))
                    }
                    Err(e) => {
                        let err = ApiError::offline(e.to_string());
                        (self.fail(endpoint, err), None)
                    }
                };
            }
            let err = ApiError::offline("Device is offline");
            return (self.fail(endpoint, err), None);
        }

        match self.perform(method, endpoint, body.as_ref()).await {
            Ok(value) => match serde_json::from_value(value) {
                Ok(data) => (ApiResponse::ok(data), None),
                Err(e) => {
                    let err =
                        ApiError::unknown("Failed to decode response body").with_source(e);
                    (self.fail(endpoint, err), None)
                }
            },
            Err(err) => (self.fail(endpoint, err), None),
        }
    }

    /// Replays all queued requests through the pipeline, resolving their
    /// replay tickets. A no-op while offline. Returns the number of
    /// entries replayed.
    ///
    /// Each entry is drained before replay, so it runs at most once even
    /// if its replay fails; the failure is delivered through the ticket
    /// rather than re-queued.
    pub async fn flush(&self) -> usize {
        if !self.connectivity.is_online() {
            debug!("Skipping offline queue flush, device is offline");
            return 0;
        }

        let entries = self.queue.drain().await;
        if entries.is_empty() {
            return 0;
        }

        let total = entries.len();
        info!(total, "Flushing offline queue");

        for entry in entries {
            debug!(id = %entry.id, endpoint = %entry.endpoint, "Replaying queued request");
            let response = match self
                .perform(entry.method.clone(), &entry.endpoint, entry.body.as_ref())
                .await
            {
                Ok(value) => ApiResponse::ok(value),
                Err(err) => {
                    self.reporter.report(&entry.endpoint, &err);
                    ApiResponse::fail(err)
                }
            };
            // The caller may have dropped its ticket; the replay itself
            // already happened either way.
            let _ = entry.responder.send(response);
        }

        total
    }

    /// Number of requests currently buffered for offline replay.
    pub async fn queued_requests(&self) -> usize {
        self.queue.len().await
    }

    /// Runs the online pipeline: backoff retry around classified attempts.
    async fn perform(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&RequestBody>,
    ) -> Result<Value, ApiError> {
        self.retry
            .execute(endpoint, || self.attempt(method.clone(), endpoint, body))
            .await
    }

    /// A single classified attempt, including the 401 refresh cycle.
    async fn attempt(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&RequestBody>,
    ) -> Result<Value, ApiError> {
        let token = self.bearer_token().await?;
        let response = self.send_once(&method, endpoint, body, token.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!(endpoint, "Received 401, refreshing session");
            self.auth.refresh().await.map_err(|e| {
                ApiError::authentication("Session refresh failed").with_source(e)
            })?;
            let token = self.bearer_token().await?;
            let retried = self.send_once(&method, endpoint, body, token.as_deref()).await?;
            // A second 401 classifies as Authentication below; the
            // refresh cycle runs once per request.
            return handle_response(retried).await;
        }

        handle_response(response).await
    }

    async fn bearer_token(&self) -> Result<Option<String>, ApiError> {
        self.auth
            .access_token()
            .await
            .map_err(|e| ApiError::authentication("Failed to obtain access token").with_source(e))
    }

    /// Dispatches one HTTP request, classifying transport failures.
    async fn send_once(
        &self,
        method: &Method,
        endpoint: &str,
        body: Option<&RequestBody>,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let mut request = self.http.request(method.clone(), &url);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request = match body {
            Some(RequestBody::Json(json)) => request.json(json),
            Some(RequestBody::Multipart(payload)) => {
                request.multipart(build_form(payload)?)
            }
            None => request,
        };

        request.send().await.map_err(classify_transport)
    }

    fn fail<T>(&self, endpoint: &str, err: ApiError) -> ApiResponse<T> {
        self.reporter.report(endpoint, &err);
        ApiResponse::fail(err)
    }
}

/// Decodes a response body, classifying non-success statuses.
async fn handle_response(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_status(status, &body));
    }

    let text = response.text().await.map_err(classify_transport)?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text)
        .map_err(|e| ApiError::unknown("Failed to decode response body").with_source(e))
}

/// Multipart forms are rebuilt per attempt from the buffered payload, so
/// retries never depend on a cloneable request body.
fn build_form(payload: &MultipartPayload) -> Result<Form, ApiError> {
    let part = Part::bytes(payload.data.clone())
        .file_name(payload.file_name.clone())
        .mime_str(&payload.mime_type)
        .map_err(|e| ApiError::unknown("Invalid MIME type for upload").with_source(e))?;
    Ok(Form::new().part(payload.field_name.clone(), part))
}

fn to_json_body<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::unknown("Failed to serialize request body").with_source(e))
}

fn is_mutating(method: &Method) -> bool {
    *method == Method::POST
        || *method == Method::PUT
        || *method == Method::PATCH
        || *method == Method::DELETE
}
