/*
[INPUT]:  HTTP configuration (base URL, timeouts), credentials, request parts
[OUTPUT]: Decoded JSON responses from the NOWPayments REST API
[POS]:    HTTP layer - request transport shared by all resource clients
[UPDATE]: When adding connection options or changing header/decoding behavior
*/

use std::fmt;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::http::{NowPaymentsError, Result};

/// Production API root
pub const PRODUCTION_BASE_URL: &str = "https://api.nowpayments.io/v1/";
/// Sandbox API root
pub const SANDBOX_BASE_URL: &str = "https://api-sandbox.nowpayments.io/v1/";

/// Header carrying the merchant API key
pub const API_KEY_HEADER: &str = "x-api-key";
/// Plaintext body returned by payout verification
const OK_SENTINEL: &str = "OK";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: PRODUCTION_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at the sandbox environment
    pub fn sandbox() -> Self {
        Self {
            base_url: SANDBOX_BASE_URL.to_string(),
            ..Self::default()
        }
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Credentials attached to every request
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Session token, treating an empty string as absent
    pub fn session_token(&self) -> Option<&str> {
        self.session_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// How per-call headers combine with the default header set
#[derive(Debug, Clone, Default)]
pub enum HeaderPolicy {
    /// Content-Type, x-api-key and (when held) the bearer token
    #[default]
    Default,
    /// Defaults, with the given entries replacing same-named defaults
    Merge(HeaderMap),
    /// Only the given headers are sent
    Replace(HeaderMap),
}

impl HeaderPolicy {
    fn resolve(self, mut defaults: HeaderMap) -> HeaderMap {
        match self {
            HeaderPolicy::Default => defaults,
            HeaderPolicy::Merge(explicit) => {
                for name in explicit.keys() {
                    defaults.remove(name);
                }
                defaults.extend(explicit);
                defaults
            }
            HeaderPolicy::Replace(explicit) => explicit,
        }
    }
}

/// Low-level transport: one call, one HTTP request, one decoded response
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: Url,
    timeout: Duration,
    credentials: Credentials,
}

impl ApiClient {
    /// Create a new client with default configuration
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: normalize_base_url(&config.base_url)?,
            timeout: config.timeout,
            credentials,
        })
    }

    /// Set credentials for subsequent requests
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = credentials;
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for an API path such as `payment/123`
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Header set sent when no policy overrides it
    pub fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, header_value(&self.credentials.api_key)?);
        if let Some(token) = self.credentials.session_token() {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {token}"))?);
        }
        Ok(headers)
    }

    /// GET with query parameters
    pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.send(Method::GET, path, query, None, HeaderPolicy::Default)
            .await
    }

    /// POST with an optional JSON body
    pub async fn post(&self, path: &str, body: Option<&Value>) -> Result<Value> {
        self.send(Method::POST, path, &[], body, HeaderPolicy::Default)
            .await
    }

    /// Send one request and decode its response.
    ///
    /// Non-2xx responses with a JSON body are returned as `Ok` carrying the
    /// remote error document.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
        headers: HeaderPolicy,
    ) -> Result<Value> {
        let url = self.url(path)?;
        let headers = headers.resolve(self.default_headers()?);
        debug!(method = %method, url = %url, "sending request");

        let mut builder = self.http_client.request(method, url).headers(headers);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        decode_body(status, &text)
    }

    fn transport_error(&self, err: reqwest::Error) -> NowPaymentsError {
        if err.is_timeout() {
            NowPaymentsError::Timeout {
                duration: self.timeout,
            }
        } else {
            NowPaymentsError::Http(err)
        }
    }
}

/// Decode a response body: the `OK` sentinel, otherwise JSON.
pub(crate) fn decode_body(status: StatusCode, text: &str) -> Result<Value> {
    if text == OK_SENTINEL {
        return Ok(json!({ "status": "OK" }));
    }
    if text.trim().is_empty() && status.is_success() {
        return Ok(Value::Null);
    }

    match serde_json::from_str::<Value>(text) {
        Ok(value) => {
            if !status.is_success() {
                warn!(status = %status, body = %text, "NOWPayments API returned an error");
            }
            Ok(value)
        }
        Err(err) if status.is_success() => Err(NowPaymentsError::InvalidResponse(format!(
            "expected JSON body: {err}"
        ))),
        Err(_) => {
            warn!(status = %status, body = %text, "NOWPayments API returned a non-JSON error");
            Err(NowPaymentsError::remote(status, text))
        }
    }
}

/// Validate an identifier interpolated into a path such as `payout/{id}`
pub(crate) fn id_segment<'a>(field: &str, id: &'a str) -> Result<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(NowPaymentsError::invalid_argument(format!(
            "`{field}` must not be empty"
        )));
    }
    if id.contains(['/', '?', '#']) {
        return Err(NowPaymentsError::invalid_argument(format!(
            "`{field}` contains a reserved path character"
        )));
    }
    if id == "." || id == ".." {
        return Err(NowPaymentsError::invalid_argument(format!(
            "`{field}` must not be a dot segment"
        )));
    }
    Ok(id)
}

fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut base = raw.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?)
}

fn header_value(raw: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(raw).map_err(|e| NowPaymentsError::InvalidHeader(e.to_string()))
}
