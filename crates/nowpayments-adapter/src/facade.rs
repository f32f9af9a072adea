/*
[INPUT]:  API key, optional session token, client settings
[OUTPUT]: Resource clients sharing one connection pool and current credentials
[POS]:    Crate entry point - groups payment, currency, payout and billing APIs
[UPDATE]: When adding resource clients or session handling
*/

use serde_json::Value;
use tracing::debug;

use crate::auth::IpnVerifier;
use crate::config::Settings;
use crate::http::{
    ApiClient, BillingApi, ClientConfig, Credentials, CurrencyApi, NowPaymentsError, PaymentApi,
    PayoutApi, Result,
};

/// NOWPayments client
///
/// Each accessor hands out a resource client carrying a snapshot of the
/// current credentials. Changing the session token affects clients built
/// afterwards.
#[derive(Debug, Clone)]
pub struct NowPayments {
    client: ApiClient,
    ipn: Option<IpnVerifier>,
}

impl NowPayments {
    /// Client against the production API
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, ClientConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: ApiClient::with_config(Credentials::new(api_key), config)?,
            ipn: None,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = ApiClient::with_config(settings.credentials(), settings.client_config())?;
        let ipn = settings
            .ipn_secret
            .as_deref()
            .map(IpnVerifier::new)
            .transpose()?;
        Ok(Self { client, ipn })
    }

    /// Attach the IPN secret used by [`NowPayments::verify_ipn`]
    pub fn with_ipn_secret(mut self, secret: impl Into<String>) -> Result<Self> {
        self.ipn = Some(IpnVerifier::new(secret)?);
        Ok(self)
    }

    pub fn payment(&self) -> PaymentApi {
        PaymentApi::new(self.client.clone())
    }

    pub fn currency(&self) -> CurrencyApi {
        CurrencyApi::new(self.client.clone())
    }

    pub fn payout(&self) -> PayoutApi {
        PayoutApi::new(self.client.clone())
    }

    pub fn billing(&self) -> BillingApi {
        BillingApi::new(self.client.clone())
    }

    pub fn credentials(&self) -> &Credentials {
        self.client.credentials()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.client.credentials().session_token()
    }

    pub fn set_session_token(&mut self, token: impl Into<String>) {
        let credentials = self.client.credentials().clone().with_session_token(token);
        self.client.set_credentials(credentials);
    }

    pub fn clear_session_token(&mut self) {
        let mut credentials = self.client.credentials().clone();
        credentials.session_token = None;
        self.client.set_credentials(credentials);
    }

    /// GET /status
    pub async fn api_status(&self) -> Result<Value> {
        self.payment().api_status().await
    }

    /// Log in and keep the returned token for later gated calls
    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let response = self.payout().login(email, password).await?;
        debug!("session token refreshed");
        self.set_session_token(response.token);
        Ok(())
    }

    /// Verify a raw IPN body against its `x-nowpayments-sig` header
    pub fn verify_ipn(&self, body: &[u8], signature: &str) -> Result<Value> {
        let verifier = self
            .ipn
            .as_ref()
            .ok_or_else(|| NowPaymentsError::Config("IPN secret is not configured".to_string()))?;
        verifier.verify_body(body, signature)
    }
}
