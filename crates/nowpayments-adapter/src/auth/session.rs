/*
[INPUT]:  Account email/password and the HTTP transport
[OUTPUT]: Session token (JWT) for gated endpoints
[POS]:    Auth layer - login exchange
[UPDATE]: When the auth endpoint or its payload changes
*/

use std::fmt;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::http::{ApiClient, HeaderPolicy, NowPaymentsError, Result};

const AUTH_PATH: &str = "auth";

/// Body of POST /auth
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login response
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// POST /auth with only a Content-Type header; returns the raw response.
pub async fn login_raw(client: &ApiClient, email: &str, password: &str) -> Result<Value> {
    if email.is_empty() || password.is_empty() {
        return Err(NowPaymentsError::invalid_argument(
            "login requires a non-empty email and password",
        ));
    }
    let body = serde_json::to_value(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    debug!("requesting session token");
    client
        .send(
            Method::POST,
            AUTH_PATH,
            &[],
            Some(&body),
            HeaderPolicy::Replace(headers),
        )
        .await
}

/// Log in and extract the session token.
///
/// A response without a `token` field (wrong credentials, 2FA required) is
/// reported as `Authentication` carrying the remote message.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<LoginResponse> {
    let response = login_raw(client, email, password).await?;
    parse_login_response(response)
}

pub(crate) fn parse_login_response(response: Value) -> Result<LoginResponse> {
    match response.get("token").and_then(Value::as_str) {
        Some(token) if !token.is_empty() => Ok(LoginResponse {
            token: token.to_string(),
        }),
        _ => {
            let message = response
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| response.to_string());
            Err(NowPaymentsError::Authentication { message })
        }
    }
}
