/*
[INPUT]:  IPN callback documents sent by NOWPayments
[OUTPUT]: Typed payment notification
[POS]:    Data layer - typed view over verified IPN payloads
[UPDATE]: When the IPN document gains or renames fields
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::enums::PaymentStatus;

/// Payment status change delivered by IPN.
///
/// Fields not modelled here stay available in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentNotification {
    #[serde(deserialize_with = "id_as_string")]
    pub payment_id: String,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub pay_address: Option<String>,
    #[serde(default)]
    pub price_amount: Option<Decimal>,
    #[serde(default)]
    pub price_currency: Option<String>,
    #[serde(default)]
    pub pay_amount: Option<Decimal>,
    #[serde(default)]
    pub actually_paid: Option<Decimal>,
    #[serde(default)]
    pub pay_currency: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub order_description: Option<String>,
    #[serde(default)]
    pub outcome_amount: Option<Decimal>,
    #[serde(default)]
    pub outcome_currency: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentNotification {
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(raw) => Ok(raw),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected payment id, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn notification_from_ipn_payload() {
        let notification = PaymentNotification::from_value(json!({
            "payment_id": 5077125051u64,
            "payment_status": "finished",
            "pay_address": "TAbc",
            "price_amount": 10,
            "price_currency": "usd",
            "pay_amount": 52.5,
            "actually_paid": 52.5,
            "pay_currency": "trx",
            "order_id": "74364712",
            "order_description": null,
            "outcome_amount": 52.1,
            "outcome_currency": "trx",
            "purchase_id": "6084744717"
        }))
        .unwrap();

        assert_eq!(notification.payment_id, "5077125051");
        assert_eq!(notification.payment_status, PaymentStatus::Finished);
        assert_eq!(notification.price_amount, Some(Decimal::from(10)));
        assert_eq!(notification.actually_paid, Some(Decimal::new(525, 1)));
        assert_eq!(notification.order_description, None);
        assert_eq!(notification.extra["purchase_id"], "6084744717");
    }

    #[test]
    fn notification_requires_status() {
        assert!(PaymentNotification::from_value(json!({"payment_id": "1"})).is_err());
    }
}
