/*
[INPUT]:  Login details, withdrawals, payout ids and verification codes
[OUTPUT]: Session tokens, payout batches, payout status and balances
[POS]:    HTTP layer - payout endpoints (create/verify require session token)
[UPDATE]: When adding new payout endpoints or changing payout flow
*/

use serde_json::Value;

use crate::auth::session::{self, LoginResponse};
use crate::auth::{GatedOperation, require_session};
use crate::http::client::id_segment;
use crate::http::{ApiClient, Result};
use crate::types::{ApiRequest, CreatePayoutRequest, VerifyPayoutRequest};

/// Payout resource client
#[derive(Debug, Clone)]
pub struct PayoutApi {
    client: ApiClient,
}

impl PayoutApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange account email/password for a session token
    ///
    /// POST /auth (Content-Type header only)
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        session::login(&self.client, email, password).await
    }

    /// Same exchange, returning the raw response document
    pub async fn login_raw(&self, email: &str, password: &str) -> Result<Value> {
        session::login_raw(&self.client, email, password).await
    }

    /// Create a payout batch
    ///
    /// POST /payout
    /// Requires: session token
    pub async fn create_payout(&self, req: &CreatePayoutRequest) -> Result<Value> {
        require_session(self.client.credentials(), GatedOperation::CreatePayout)?;
        let body = req.to_body()?;
        self.client.post("payout", Some(&body)).await
    }

    /// Confirm a payout batch with the 2FA verification code
    ///
    /// POST /payout/{id}/verify
    /// Requires: session token
    pub async fn verify_payout(&self, payout_id: &str, verification_code: &str) -> Result<Value> {
        require_session(self.client.credentials(), GatedOperation::VerifyPayout)?;
        let id = id_segment("payout_id", payout_id)?;
        let body = VerifyPayoutRequest {
            verification_code: verification_code.to_string(),
        }
        .to_body()?;
        self.client
            .post(&format!("payout/{id}/verify"), Some(&body))
            .await
    }

    /// Payout status
    ///
    /// GET /payout/{id}
    pub async fn payout_status(&self, payout_id: &str) -> Result<Value> {
        let id = id_segment("payout_id", payout_id)?;
        self.client.get(&format!("payout/{id}"), &[]).await
    }

    /// Custody balance
    ///
    /// GET /balance
    pub async fn balance(&self) -> Result<Value> {
        self.client.get("balance", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ClientConfig, Credentials, NowPaymentsError};
    use crate::types::Withdrawal;
    use rust_decimal::Decimal;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn payout_api(server: &MockServer, credentials: Credentials) -> PayoutApi {
        let config = ClientConfig::default().with_base_url(format!("{}/v1/", server.uri()));
        PayoutApi::new(ApiClient::with_config(credentials, config).expect("client init"))
    }

    fn withdrawal() -> Withdrawal {
        Withdrawal::new(
            "TEmGwPeRTPiLFLVfBxXkSP91yc5GMNQhfS",
            "TRX",
            Decimal::new(50, 1),
            "https://nowpayments.io",
        )
    }

    #[tokio::test]
    async fn test_login_sends_no_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth"))
            .and(header("content-type", "application/json"))
            .and(|request: &Request| !request.headers.contains_key("x-api-key"))
            .and(body_json(json!({
                "email": "merchant@example.com",
                "password": "secret"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "jwt-token"})))
            .expect(1)
            .mount(&server)
            .await;

        let api = payout_api(&server, Credentials::new("test-key"));
        let login = api
            .login("merchant@example.com", "secret")
            .await
            .expect("login failed");
        assert_eq!(login.token, "jwt-token");
    }

    #[tokio::test]
    async fn test_login_failure_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "status": false,
                "statusCode": 401,
                "code": "AUTH_REQUIRED",
                "message": "Authorization header is empty (Bearer JWTtoken is required)"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = payout_api(&server, Credentials::new("test-key"));
        let err = api.login("merchant@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, NowPaymentsError::Authentication { .. }));
    }

    #[tokio::test]
    async fn test_create_payout_requires_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payout"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let api = payout_api(&server, Credentials::new("test-key"));
        let request = CreatePayoutRequest::new(vec![withdrawal()]);
        let err = api.create_payout(&request).await.unwrap_err();
        assert!(matches!(
            err,
            NowPaymentsError::AuthenticationRequired {
                operation: "create_payout",
                field: "session_token"
            }
        ));
    }

    #[tokio::test]
    async fn test_create_payout_body_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payout"))
            .and(header("authorization", "Bearer jwt-token"))
            .and(header("x-api-key", "test-key"))
            .and(body_json(json!({
                "ipn_callback_url": "https://nowpayments.io",
                "withdrawals": [{
                    "address": "TEmGwPeRTPiLFLVfBxXkSP91yc5GMNQhfS",
                    "currency": "TRX",
                    "amount": "5.0",
                    "ipn_callback_url": "https://nowpayments.io"
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "5000000713",
                "withdrawals": [{"id": "5000000000", "status": "WAITING"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = payout_api(
            &server,
            Credentials::new("test-key").with_session_token("jwt-token"),
        );
        let request =
            CreatePayoutRequest::new(vec![withdrawal()]).with_ipn_callback_url("https://nowpayments.io");
        let payout = api.create_payout(&request).await.expect("create_payout failed");
        assert_eq!(payout["id"], "5000000713");
    }

    #[tokio::test]
    async fn test_create_payout_rejects_empty_batch() {
        let server = MockServer::start().await;
        let api = payout_api(
            &server,
            Credentials::new("test-key").with_session_token("jwt-token"),
        );
        let err = api
            .create_payout(&CreatePayoutRequest::new(Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, NowPaymentsError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_verify_payout_ok_sentinel() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payout/5000000713/verify"))
            .and(body_json(json!({"verification_code": "123456"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&server)
            .await;

        let api = payout_api(
            &server,
            Credentials::new("test-key").with_session_token("jwt-token"),
        );
        let verified = api
            .verify_payout("5000000713", "123456")
            .await
            .expect("verify_payout failed");
        assert_eq!(verified, json!({"status": "OK"}));
    }

    #[tokio::test]
    async fn test_verify_payout_requires_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payout/5000000713/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(0)
            .mount(&server)
            .await;

        for credentials in [
            Credentials::new("test-key"),
            Credentials::new("test-key").with_session_token(""),
        ] {
            let api = payout_api(&server, credentials);
            let err = api.verify_payout("5000000713", "123456").await.unwrap_err();
            assert!(matches!(
                err,
                NowPaymentsError::AuthenticationRequired {
                    operation: "verify_payout",
                    field: "session_token"
                }
            ));
        }
    }

    #[tokio::test]
    async fn test_payout_status_rejects_dot_segments() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "OK"})))
            .expect(0)
            .mount(&server)
            .await;

        let api = payout_api(&server, Credentials::new("test-key"));
        for id in ["..", "."] {
            let err = api.payout_status(id).await.unwrap_err();
            assert!(matches!(err, NowPaymentsError::InvalidArgument(_)));
        }
    }

    #[tokio::test]
    async fn test_payout_status_and_balance() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/payout/5000000713"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": "5000000000", "status": "FINISHED"}])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/balance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "trx": {"amount": 1000.5, "pendingAmount": 0}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = payout_api(&server, Credentials::new("test-key"));
        let status = api.payout_status("5000000713").await.expect("payout_status failed");
        assert_eq!(status[0]["status"], "FINISHED");
        let balance = api.balance().await.expect("balance failed");
        assert_eq!(balance["trx"]["pendingAmount"], 0);
    }
}
