/*
[INPUT]:  IPN payload (JSON object) and the merchant's IPN secret
[OUTPUT]: HMAC-SHA512 hex signatures and verification results
[POS]:    Auth layer - webhook (IPN) authenticity checks
[UPDATE]: When the canonical serialization or digest algorithm changes
*/

use std::fmt;

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha512;
use tracing::debug;

use crate::http::{NowPaymentsError, Result};

type HmacSha512 = Hmac<Sha512>;

/// Header carrying the IPN signature on webhook requests
pub const IPN_SIGNATURE_HEADER: &str = "x-nowpayments-sig";

/// Serialize a payload with keys sorted ascending and no whitespace.
///
/// Nested objects are sorted as well; array order is preserved.
pub fn canonical_json(payload: &Value) -> Result<String> {
    if !payload.is_object() {
        return Err(NowPaymentsError::invalid_argument(
            "IPN payload must be a JSON object",
        ));
    }
    let mut out = String::new();
    write_canonical(payload, &mut out)?;
    Ok(out)
}

fn write_canonical(value: &Value, out: &mut String) -> Result<()> {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (index, (key, item)) in entries.into_iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key)?);
                out.push(':');
                write_canonical(item, out)?;
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        scalar => out.push_str(&serde_json::to_string(scalar)?),
    }
    Ok(())
}

fn keyed_mac(secret: &str, payload: &Value) -> Result<HmacSha512> {
    let message = canonical_json(payload)?;
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|e| NowPaymentsError::invalid_argument(format!("invalid IPN secret: {e}")))?;
    mac.update(message.as_bytes());
    Ok(mac)
}

/// Compute the lowercase hex HMAC-SHA512 of the canonical payload.
pub fn compute_signature(payload: &Value, secret: &str) -> Result<String> {
    let mac = keyed_mac(secret, payload)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a signature header against the payload in constant time.
///
/// A header that is not valid hex never matches.
pub fn verify_signature(payload: &Value, secret: &str, signature: &str) -> Result<bool> {
    let mac = keyed_mac(secret, payload)?;
    let Ok(provided) = hex::decode(signature.trim()) else {
        debug!("IPN signature header is not valid hex");
        return Ok(false);
    };
    Ok(mac.verify_slice(&provided).is_ok())
}

/// Verifier bound to one IPN secret
#[derive(Clone)]
pub struct IpnVerifier {
    secret: String,
}

impl IpnVerifier {
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(NowPaymentsError::Config(
                "IPN secret must not be empty".to_string(),
            ));
        }
        Ok(Self { secret })
    }

    pub fn sign(&self, payload: &Value) -> Result<String> {
        compute_signature(payload, &self.secret)
    }

    pub fn verify(&self, payload: &Value, signature: &str) -> Result<bool> {
        verify_signature(payload, &self.secret, signature)
    }

    /// Parse a raw webhook body and return it only if the signature matches.
    pub fn verify_body(&self, body: &[u8], signature: &str) -> Result<Value> {
        let payload: Value = serde_json::from_slice(body)?;
        if self.verify(&payload, signature)? {
            Ok(payload)
        } else {
            Err(NowPaymentsError::InvalidSignature)
        }
    }
}

impl fmt::Debug for IpnVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpnVerifier")
            .field("secret", &"<redacted>")
            .finish()
    }
}
