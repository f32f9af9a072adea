/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for nowpayments-adapter tests

use nowpayments_adapter::{ClientConfig, NowPayments};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Facade pointed at the mock server's `/v1/` root
#[allow(dead_code)]
pub fn mock_client(server: &MockServer) -> NowPayments {
    let config = ClientConfig::default().with_base_url(format!("{}/v1/", server.uri()));
    NowPayments::with_config(mock_api_key(), config).expect("client init")
}

pub fn mock_api_key() -> String {
    "TEST-API-KEY-0000".to_string()
}

/// Mock JWT token for testing
#[allow(dead_code)]
pub fn mock_jwt_token() -> String {
    "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test.signature".to_string()
}
