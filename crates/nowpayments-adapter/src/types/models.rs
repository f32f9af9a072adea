/*
[INPUT]:  Payout line items supplied by the caller
[OUTPUT]: Flat string mappings accepted by the payout endpoint
[POS]:    Data layer - payout withdrawal model and decimal serde helpers
[UPDATE]: When withdrawal fields change
*/

use std::collections::BTreeMap;

use rust_decimal::Decimal;

/// One payout line item
#[derive(Debug, Clone, PartialEq)]
pub struct Withdrawal {
    pub address: String,
    pub currency: String,
    pub amount: Decimal,
    pub ipn_callback_url: String,
    pub extra_id: Option<String>,
    pub fiat_amount: Option<Decimal>,
    pub fiat_currency: Option<String>,
}

impl Withdrawal {
    pub fn new(
        address: impl Into<String>,
        currency: impl Into<String>,
        amount: Decimal,
        ipn_callback_url: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            currency: currency.into(),
            amount,
            ipn_callback_url: ipn_callback_url.into(),
            extra_id: None,
            fiat_amount: None,
            fiat_currency: None,
        }
    }

    /// Memo / destination tag for currencies that need one
    pub fn with_extra_id(mut self, extra_id: impl Into<String>) -> Self {
        self.extra_id = Some(extra_id.into());
        self
    }

    /// Denominate the payout in fiat; the crypto amount is derived remotely
    pub fn with_fiat(mut self, fiat_amount: Decimal, fiat_currency: impl Into<String>) -> Self {
        self.fiat_amount = Some(fiat_amount);
        self.fiat_currency = Some(fiat_currency.into());
        self
    }

    /// Present fields only, every value stringified.
    pub fn to_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("address".to_string(), self.address.clone());
        params.insert("currency".to_string(), self.currency.clone());
        params.insert("amount".to_string(), self.amount.to_string());
        params.insert("ipn_callback_url".to_string(), self.ipn_callback_url.clone());
        if let Some(extra_id) = &self.extra_id {
            params.insert("extra_id".to_string(), extra_id.clone());
        }
        if let Some(fiat_amount) = &self.fiat_amount {
            params.insert("fiat_amount".to_string(), fiat_amount.to_string());
        }
        if let Some(fiat_currency) = &self.fiat_currency {
            params.insert("fiat_currency".to_string(), fiat_currency.clone());
        }
        params
    }
}

pub(crate) mod serde_helpers {
    use serde::Serializer;

    use super::Withdrawal;

    pub fn serialize_withdrawals<S>(values: &[Withdrawal], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(values.iter().map(Withdrawal::to_params))
    }
}
