/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public NOWPayments adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod config;
pub mod facade;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    GatedOperation,
    IPN_SIGNATURE_HEADER,
    IpnVerifier,
    LoginResponse,
    compute_signature,
    verify_signature,
};

pub use config::Settings;
pub use facade::NowPayments;

// Re-export commonly used types from http
pub use http::{
    ApiClient,
    BillingApi,
    ClientConfig,
    Credentials,
    CurrencyApi,
    HeaderPolicy,
    NowPaymentsError,
    PaymentApi,
    PayoutApi,
    Result,
};

// Re-export all types
pub use types::*;
