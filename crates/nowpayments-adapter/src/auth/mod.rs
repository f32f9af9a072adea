/*
[INPUT]:  Credentials, login details, IPN payloads and secrets
[OUTPUT]: Session tokens, gate decisions, and IPN signature checks
[POS]:    Auth layer - handles NOWPayments authentication concerns
[UPDATE]: When auth flow or signature methods change
*/

pub mod gate;
pub mod ipn;
pub mod session;

pub use gate::{GatedOperation, SESSION_TOKEN_FIELD, require_session};
pub use ipn::{
    IPN_SIGNATURE_HEADER, IpnVerifier, canonical_json, compute_signature, verify_signature,
};
pub use session::{LoginRequest, LoginResponse};
