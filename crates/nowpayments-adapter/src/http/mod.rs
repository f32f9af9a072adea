/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: Decoded JSON responses per resource
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new resource clients or changing client behavior
*/

pub mod billing;
pub mod client;
pub mod currency;
pub mod error;
pub mod payment;
pub mod payout;

pub use error::{NowPaymentsError, Result};

pub use billing::BillingApi;
pub use client::{
    API_KEY_HEADER, ApiClient, ClientConfig, Credentials, HeaderPolicy, PRODUCTION_BASE_URL,
    SANDBOX_BASE_URL,
};
pub use currency::CurrencyApi;
pub use payment::PaymentApi;
pub use payout::PayoutApi;
