/*
[INPUT]:  Payment, invoice and estimate parameters
[OUTPUT]: Decoded API responses (payments, invoices, estimates)
[POS]:    HTTP layer - payment endpoints
[UPDATE]: When adding new payment endpoints or changing parameters
*/

use serde_json::Value;

use crate::auth::{GatedOperation, require_session};
use crate::http::client::id_segment;
use crate::http::{ApiClient, Result};
use crate::types::{
    ApiRequest, CreateInvoiceRequest, CreatePaymentRequest, EstimateQuery, InvoicePaymentRequest,
    MinAmountQuery, PaymentListQuery, QueryRequest,
};

/// Payment resource client
#[derive(Debug, Clone)]
pub struct PaymentApi {
    client: ApiClient,
}

impl PaymentApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// API status
    ///
    /// GET /status
    pub async fn api_status(&self) -> Result<Value> {
        self.client.get("status", &[]).await
    }

    /// Estimated crypto amount for a fiat (or crypto) amount
    ///
    /// GET /estimate?amount=&currency_from=&currency_to=
    pub async fn estimated_price(&self, query: &EstimateQuery) -> Result<Value> {
        let pairs = query.to_query()?;
        self.client.get("estimate", &pairs).await
    }

    /// Create a payment
    ///
    /// POST /payment
    pub async fn create_payment(&self, req: &CreatePaymentRequest) -> Result<Value> {
        let body = req.to_body()?;
        self.client.post("payment", Some(&body)).await
    }

    /// Create an invoice (hosted checkout page)
    ///
    /// POST /invoice
    pub async fn create_invoice(&self, req: &CreateInvoiceRequest) -> Result<Value> {
        let body = req.to_body()?;
        self.client.post("invoice", Some(&body)).await
    }

    /// Create a payment for an existing invoice
    ///
    /// POST /invoice-payment
    pub async fn create_invoice_payment(&self, req: &InvoicePaymentRequest) -> Result<Value> {
        let body = req.to_body()?;
        self.client.post("invoice-payment", Some(&body)).await
    }

    /// Refresh the merchant estimate for a fixed-rate payment
    ///
    /// POST /payment/{id}/update-merchant-estimate
    pub async fn update_merchant_estimate(&self, payment_id: &str) -> Result<Value> {
        let id = id_segment("payment_id", payment_id)?;
        let path = format!("payment/{id}/update-merchant-estimate");
        self.client.post(&path, None).await
    }

    /// Payment status
    ///
    /// GET /payment/{id}
    pub async fn payment_status(&self, payment_id: &str) -> Result<Value> {
        let id = id_segment("payment_id", payment_id)?;
        self.client.get(&format!("payment/{id}"), &[]).await
    }

    /// Minimum payment amount for a currency pair
    ///
    /// GET /min-amount?currency_from=&currency_to=&fiat_equivalent=
    pub async fn minimum_amount(&self, query: &MinAmountQuery) -> Result<Value> {
        let pairs = query.to_query()?;
        self.client.get("min-amount", &pairs).await
    }

    /// List payments
    ///
    /// GET /payment?limit=&page=&sortBy=&orderBy=&dateFrom=&dateTo=
    /// Requires: session token
    pub async fn list_payments(&self, query: &PaymentListQuery) -> Result<Value> {
        require_session(self.client.credentials(), GatedOperation::ListPayments)?;
        let pairs = query.to_query()?;
        self.client.get("payment", &pairs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ClientConfig, Credentials, NowPaymentsError};
    use rust_decimal::Decimal;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payment_api(server: &MockServer, credentials: Credentials) -> PaymentApi {
        let config = ClientConfig::default().with_base_url(format!("{}/v1/", server.uri()));
        PaymentApi::new(ApiClient::with_config(credentials, config).expect("client init"))
    }

    #[tokio::test]
    async fn test_api_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/status"))
            .and(header("x-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "OK"})))
            .expect(1)
            .mount(&server)
            .await;

        let api = payment_api(&server, Credentials::new("test-key"));
        let status = api.api_status().await.expect("api_status failed");
        assert_eq!(status, json!({"message": "OK"}));
    }

    #[tokio::test]
    async fn test_create_payment_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "price_amount": 10,
                "price_currency": "USD",
                "pay_currency": "TRX",
                "order_id": "74364712",
                "ipn_callback_url": "https://nowpayments.io"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "payment_id": "5745459419",
                "payment_status": "waiting",
                "pay_address": "TNDFkiSmBQorNFacb3735q8MnT29sn8BLn",
                "price_amount": 10,
                "price_currency": "usd",
                "pay_currency": "trx",
                "order_id": "74364712"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = payment_api(&server, Credentials::new("test-key"));
        let request = CreatePaymentRequest::new(
            Decimal::from(10),
            "USD",
            "TRX",
            "https://nowpayments.io",
            "74364712",
        );
        let payment = api.create_payment(&request).await.expect("create_payment failed");
        assert_eq!(payment["payment_status"], "waiting");
    }

    #[tokio::test]
    async fn test_estimated_price_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/estimate"))
            .and(query_param("amount", "3999.5"))
            .and(query_param("currency_from", "usd"))
            .and(query_param("currency_to", "btc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "currency_from": "usd",
                "amount_from": 3999.5,
                "currency_to": "btc",
                "estimated_amount": 0.17061637
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = payment_api(&server, Credentials::new("test-key"));
        let query = EstimateQuery::new(Decimal::new(39995, 1), "usd", "btc");
        let estimate = api.estimated_price(&query).await.expect("estimate failed");
        assert_eq!(estimate["currency_to"], "btc");
    }

    #[tokio::test]
    async fn test_update_merchant_estimate_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment/4455667788/update-merchant-estimate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "4455667788",
                "token_id": "5566778899",
                "pay_amount": 0.04671013,
                "expiration_estimate_date": "2022-08-12T13:14:28.536Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = payment_api(&server, Credentials::new("test-key"));
        let estimate = api
            .update_merchant_estimate("4455667788")
            .await
            .expect("update_merchant_estimate failed");
        assert_eq!(estimate["token_id"], "5566778899");
    }

    #[tokio::test]
    async fn test_list_payments_requires_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/payment"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let api = payment_api(&server, Credentials::new("test-key"));
        let err = api
            .list_payments(&PaymentListQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NowPaymentsError::AuthenticationRequired {
                operation: "list_payments",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_list_payments_with_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/payment"))
            .and(header("authorization", "Bearer jwt-token"))
            .and(query_param("limit", "10"))
            .and(query_param("orderBy", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [],
                "limit": 10,
                "page": 0,
                "pagesCount": 0,
                "total": 0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = payment_api(
            &server,
            Credentials::new("test-key").with_session_token("jwt-token"),
        );
        let query = PaymentListQuery {
            limit: Some(10),
            order_by: Some(crate::types::SortOrder::Desc),
            ..PaymentListQuery::default()
        };
        let list = api.list_payments(&query).await.expect("list_payments failed");
        assert_eq!(list["total"], 0);
    }

    #[tokio::test]
    async fn test_payment_status_rejects_empty_id() {
        let server = MockServer::start().await;
        let api = payment_api(&server, Credentials::new("test-key"));
        let err = api.payment_status("").await.unwrap_err();
        assert!(matches!(err, NowPaymentsError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_remote_error_body_passes_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/payment/123"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": false,
                "statusCode": 400,
                "code": "INVALID_REQUEST_PARAMS",
                "message": "paymentId must be a number"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = payment_api(&server, Credentials::new("test-key"));
        let body = api.payment_status("123").await.expect("error body should pass through");
        assert_eq!(body["code"], "INVALID_REQUEST_PARAMS");
    }
}
