/*
[INPUT]:  Optional fixed-rate flag
[OUTPUT]: Available currency listings
[POS]:    HTTP layer - currency endpoints (API key only)
[UPDATE]: When adding new currency endpoints or changing query parameters
*/

use serde_json::Value;

use crate::http::{ApiClient, Result};

/// Currency resource client
#[derive(Debug, Clone)]
pub struct CurrencyApi {
    client: ApiClient,
}

impl CurrencyApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Cryptocurrencies available for payments
    ///
    /// GET /currencies?fixed_rate={fixed_rate}
    pub async fn currencies(&self, fixed_rate: Option<bool>) -> Result<Value> {
        self.client.get("currencies", &fixed_rate_query(fixed_rate)).await
    }

    /// Detailed information for every available currency
    ///
    /// GET /full-currencies
    pub async fn full_currencies(&self) -> Result<Value> {
        self.client.get("full-currencies", &[]).await
    }

    /// Currencies enabled in the merchant's coin settings
    ///
    /// GET /merchant/coins?fixed_rate={fixed_rate}
    pub async fn merchant_coins(&self, fixed_rate: Option<bool>) -> Result<Value> {
        self.client
            .get("merchant/coins", &fixed_rate_query(fixed_rate))
            .await
    }
}

fn fixed_rate_query(fixed_rate: Option<bool>) -> Vec<(String, String)> {
    fixed_rate
        .map(|flag| vec![("fixed_rate".to_string(), flag.to_string())])
        .unwrap_or_default()
}
