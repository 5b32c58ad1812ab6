//! HTTP gateway for the user-management REST API. Every feature client goes
//! through one `Gateway` so credential propagation, timeouts, envelope
//! decoding and the session-renewal policy stay in one place.
//!
//! Session renewal: a request answered with 401 that has not been renewed yet
//! triggers exactly one `POST /auth/refresh`, then the request is replayed
//! once. If the refresh fails, the `SessionExpiry` hook runs and the caller
//! gets the refresh error. Nothing else is retried: timeouts, 5xx and network
//! failures surface immediately.
//!
//! The gateway never reads or writes credential material; the server sets and
//! rotates cookies and the client's cookie store replays them.

use super::{
    config::ConsoleConfig,
    envelope::{Envelope, ErrorBody},
    errors::AppError,
};
use reqwest::{Client, Method, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{Instrument, debug, info_span, warn};
use ulid::Ulid;

/// Session renewal endpoint, called with an empty JSON object.
pub const REFRESH_PATH: &str = "/auth/refresh";
/// Correlation header attached to every request.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// Maximum number of renew-and-replay rounds per request.
const MAX_RENEWALS: u8 = 1;
/// Maximum number of error body characters kept for diagnostics.
const MAX_ERROR_CHARS: usize = 200;

/// Hook invoked when session renewal fails. Implementors discard local
/// session state and route the operator back to login.
pub trait SessionExpiry: Send + Sync {
    fn session_expired(&self);
}

/// An outgoing request plus the number of renewals already spent on it.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Value>,
    renewals: u8,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            renewals: 0,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attaches a JSON body.
    ///
    /// # Errors
    /// Returns `AppError::Serialization` if the body cannot be encoded.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, AppError> {
        let value = serde_json::to_value(body)
            .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;
        self.body = Some(value);
        Ok(self)
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    #[must_use]
    pub fn renewals(&self) -> u8 {
        self.renewals
    }

    /// Whether a 401 on this request may still trigger a renewal.
    #[must_use]
    pub fn can_renew(&self) -> bool {
        self.renewals < MAX_RENEWALS
    }

    /// The replay of this request after a successful renewal.
    #[must_use]
    pub fn renewed(&self) -> Self {
        Self {
            renewals: self.renewals.saturating_add(1),
            ..self.clone()
        }
    }
}

/// Configured request client shared by all features.
pub struct Gateway {
    client: Client,
    config: ConsoleConfig,
    expiry: Arc<dyn SessionExpiry>,
}

impl Gateway {
    /// Builds the gateway with a cookie-backed HTTP client.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: ConsoleConfig, expiry: Arc<dyn SessionExpiry>) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            config,
            expiry,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Fetches `path` and returns the envelope payload.
    ///
    /// # Errors
    /// Returns an `AppError` for transport, HTTP or decoding failures.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let body = self.execute(ApiRequest::get(path)).await?;
        decode_data(&body)
    }

    /// Posts a JSON body and returns the envelope payload.
    ///
    /// # Errors
    /// Returns an `AppError` for transport, HTTP or decoding failures.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .execute(ApiRequest::post(path).with_json(body)?)
            .await?;
        decode_data(&body)
    }

    /// Posts a JSON body and ignores the response payload.
    ///
    /// # Errors
    /// Returns an `AppError` for transport or HTTP failures.
    pub async fn post_discard<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), AppError> {
        self.execute(ApiRequest::post(path).with_json(body)?)
            .await
            .map(drop)
    }

    /// Posts without a body and ignores the response payload.
    ///
    /// # Errors
    /// Returns an `AppError` for transport or HTTP failures.
    pub async fn post_empty(&self, path: &str) -> Result<(), AppError> {
        self.execute(ApiRequest::post(path)).await.map(drop)
    }

    /// Puts a JSON body and ignores the response payload.
    ///
    /// # Errors
    /// Returns an `AppError` for transport or HTTP failures.
    pub async fn put_discard<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), AppError> {
        self.execute(ApiRequest::put(path).with_json(body)?)
            .await
            .map(drop)
    }

    /// Deletes `path` and ignores the response payload.
    ///
    /// # Errors
    /// Returns an `AppError` for transport or HTTP failures.
    pub async fn delete(&self, path: &str) -> Result<(), AppError> {
        self.execute(ApiRequest::delete(path)).await.map(drop)
    }

    /// Sends `request`, applying the one-shot renewal policy, and returns the
    /// raw body of the final successful response.
    ///
    /// # Errors
    /// Returns the HTTP error of the final attempt, or the renewal error when
    /// the refresh call itself fails.
    pub async fn execute(&self, request: ApiRequest) -> Result<String, AppError> {
        let response = self.send(&request).await?;

        if response.status() != StatusCode::UNAUTHORIZED || !request.can_renew() {
            return read_body(response).await;
        }

        debug!(path = %request.path, "received 401, renewing session");
        if let Err(err) = self.renew().await {
            warn!(path = %request.path, "session renewal failed, login required");
            self.expiry.session_expired();
            return Err(err);
        }

        let replay = request.renewed();
        let response = self.send(&replay).await?;
        read_body(response).await
    }

    /// Calls the refresh endpoint directly, outside the renewal policy, so a
    /// failing refresh can never recurse.
    async fn renew(&self) -> Result<(), AppError> {
        let request = ApiRequest::post(REFRESH_PATH).with_json(&json!({}))?;
        let response = self.send(&request).await?;
        read_body(response).await.map(drop)
    }

    async fn send(&self, request: &ApiRequest) -> Result<Response, AppError> {
        let url = self.config.endpoint(&request.path);
        let request_id = Ulid::new().to_string();
        let span = info_span!(
            "api.request",
            http.method = %request.method,
            path = %request.path,
            renewals = request.renewals,
            request_id = %request_id
        );

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(REQUEST_ID_HEADER, &request_id);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)
    }
}

/// Decodes the `data` member of a success envelope.
///
/// # Errors
/// Returns `AppError::Parse` when the body does not match `{data: T}`.
pub fn decode_data<T: DeserializeOwned>(body: &str) -> Result<T, AppError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(|envelope| envelope.data)
        .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
}

/// Maps transport errors into user-facing variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Returns the body of a 2xx response, or the HTTP error otherwise.
async fn read_body(response: Response) -> Result<String, AppError> {
    let status = response.status();
    if status.is_success() {
        response.text().await.map_err(map_request_error)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(http_error(status.as_u16(), &body))
    }
}

fn http_error(status: u16, body: &str) -> AppError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|message| !message.trim().is_empty());

    AppError::Http {
        status,
        message,
        detail: sanitize_body(body),
    }
}

/// Trims and truncates error bodies before they reach logs or the operator.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{ApiRequest, AppError, decode_data, http_error, sanitize_body};
    use crate::test_support::{can_bind_localhost, gateway_for};
    use anyhow::Result;
    use serde_json::{Value, json};
    use std::sync::atomic::Ordering;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn renewed_request_cannot_renew_again() {
        let request = ApiRequest::get("/users/me");
        assert!(request.can_renew());
        assert_eq!(request.renewals(), 0);

        let replay = request.renewed();
        assert_eq!(replay.renewals(), 1);
        assert_eq!(replay.path(), "/users/me");
        assert!(!replay.can_renew());
        assert!(!replay.renewed().can_renew());
    }

    #[test]
    fn http_error_reads_message_envelope() {
        let err = http_error(400, r#"{"success":false,"message":"Invalid verification code"}"#);
        assert_eq!(err.server_message(), Some("Invalid verification code"));
        assert_eq!(err.status(), Some(400));

        let err = http_error(502, "<html>Bad Gateway</html>");
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn sanitize_body_truncates() {
        assert_eq!(sanitize_body("   "), "Request failed.");
        assert_eq!(sanitize_body(&"x".repeat(500)).len(), 200);
    }

    #[test]
    fn decode_data_rejects_missing_envelope() {
        let result = decode_data::<Value>(r#"{"secret":"abc"}"#);
        assert!(matches!(result, Err(AppError::Parse(_))));
    }

    #[tokio::test]
    async fn replays_once_after_successful_renewal() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": "u-1" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, expiry) = gateway_for(&server);
        let data: Value = gateway.get("/users/me").await?;
        assert_eq!(data["id"], "u-1");
        assert_eq!(expiry.calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn second_unauthorized_is_not_renewed_again() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roles"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })),
            )
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, expiry) = gateway_for(&server);
        let result = gateway.get::<Value>("/roles").await;
        assert_eq!(result.unwrap_err().status(), Some(401));
        assert_eq!(expiry.calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn failed_renewal_expires_session_and_returns_renewal_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/permissions"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({ "message": "Refresh token revoked" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, expiry) = gateway_for(&server);
        let err = gateway.get::<Value>("/permissions").await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.server_message(), Some("Refresh token revoked"));
        assert_eq!(expiry.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn server_errors_are_not_retried() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/users/u-1"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (gateway, _expiry) = gateway_for(&server);
        let err = gateway.delete("/users/u-1").await.unwrap_err();
        assert_eq!(
            err,
            AppError::Http {
                status: 503,
                message: None,
                detail: "upstream unavailable".to_string(),
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn session_cookies_ride_along_on_later_requests() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "access_token=abc123; Path=/; HttpOnly")
                    .set_body_json(json!({ "data": { "accessToken": "ignored" } })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .and(header("cookie", "access_token=abc123"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": "u-7" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, _expiry) = gateway_for(&server);
        gateway
            .post_discard("/auth/login", &json!({ "usernameOrEmail": "admin" }))
            .await?;
        let me: Value = gateway.get("/users/me").await?;
        assert_eq!(me["id"], "u-7");
        Ok(())
    }

    #[tokio::test]
    async fn discard_accepts_empty_success_body() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/roles/r-1/permissions"))
            .and(body_json(json!(["p-1", "p-2"])))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, _expiry) = gateway_for(&server);
        gateway
            .put_discard("/roles/r-1/permissions", &["p-1", "p-2"])
            .await?;
        Ok(())
    }
}
