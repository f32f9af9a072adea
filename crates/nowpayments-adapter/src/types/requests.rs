/*
[INPUT]:  Caller-supplied operation arguments
[OUTPUT]: Validated JSON bodies and query pairs for each endpoint
[POS]:    Data layer - request definitions for API communication
[UPDATE]: When API schema changes or new request types added
*/

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

use super::enums::{PaymentSortField, PaymentStatus, SortOrder, TransferStatus};
use super::models::{Withdrawal, serde_helpers};
use crate::http::{NowPaymentsError, Result};

/// Pass-through fields merged at the top level of a request body
pub type Extra = Map<String, Value>;

/// Query string pairs, in the order they are sent
pub type QueryPairs = Vec<(String, String)>;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A JSON request body
pub trait ApiRequest: Serialize {
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn to_body(&self) -> Result<Value> {
        self.validate()?;
        Ok(serde_json::to_value(self)?)
    }
}

/// A set of query-string filters
pub trait QueryRequest {
    fn to_query(&self) -> Result<QueryPairs>;
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(NowPaymentsError::invalid_argument(format!(
            "`{field}` must not be empty"
        )))
    } else {
        Ok(())
    }
}

/// `extra` may only add keys; it never overrides a typed field.
fn reject_shadowed(extra: &Extra, fields: &[&str]) -> Result<()> {
    match fields.iter().find(|field| extra.contains_key(**field)) {
        Some(field) => Err(NowPaymentsError::invalid_argument(format!(
            "extra field `{field}` collides with a typed field; set it directly"
        ))),
        None => Ok(()),
    }
}

fn push(pairs: &mut QueryPairs, key: &str, value: impl ToString) {
    pairs.push((key.to_string(), value.to_string()));
}

fn push_opt<T: ToString>(pairs: &mut QueryPairs, key: &str, value: Option<T>) {
    if let Some(value) = value {
        push(pairs, key, value);
    }
}

fn push_date(pairs: &mut QueryPairs, key: &str, value: Option<NaiveDate>) {
    push_opt(pairs, key, value.map(|date| date.format(DATE_FORMAT)));
}

fn push_ids(pairs: &mut QueryPairs, ids: Option<&[u64]>) -> Result<()> {
    if let Some(ids) = ids {
        if ids.is_empty() {
            return Err(NowPaymentsError::invalid_argument(
                "`id` filter must contain at least one id",
            ));
        }
        let joined = ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",");
        push(pairs, "id", joined);
    }
    Ok(())
}

fn push_extra(pairs: &mut QueryPairs, extra: &BTreeMap<String, String>) {
    for (key, value) in extra {
        push(pairs, key, value);
    }
}

// ### Payment requests

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePaymentRequest {
    #[serde(serialize_with = "rust_decimal::serde::arbitrary_precision::serialize")]
    pub price_amount: Decimal,
    pub price_currency: String,
    pub pay_currency: String,
    pub ipn_callback_url: String,
    pub order_id: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::arbitrary_precision_option::serialize"
    )]
    pub pay_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fixed_rate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fee_paid_by_user: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl CreatePaymentRequest {
    pub fn new(
        price_amount: Decimal,
        price_currency: impl Into<String>,
        pay_currency: impl Into<String>,
        ipn_callback_url: impl Into<String>,
        order_id: impl Into<String>,
    ) -> Self {
        Self {
            price_amount,
            price_currency: price_currency.into(),
            pay_currency: pay_currency.into(),
            ipn_callback_url: ipn_callback_url.into(),
            order_id: order_id.into(),
            pay_amount: None,
            order_description: None,
            is_fixed_rate: None,
            is_fee_paid_by_user: None,
            extra: Extra::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl ApiRequest for CreatePaymentRequest {
    fn validate(&self) -> Result<()> {
        reject_shadowed(
            &self.extra,
            &[
                "price_amount",
                "price_currency",
                "pay_currency",
                "ipn_callback_url",
                "order_id",
                "pay_amount",
                "order_description",
                "is_fixed_rate",
                "is_fee_paid_by_user",
            ],
        )?;
        require_non_empty("price_currency", &self.price_currency)?;
        require_non_empty("pay_currency", &self.pay_currency)?;
        require_non_empty("ipn_callback_url", &self.ipn_callback_url)?;
        require_non_empty("order_id", &self.order_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateInvoiceRequest {
    #[serde(serialize_with = "rust_decimal::serde::arbitrary_precision::serialize")]
    pub price_amount: Decimal,
    pub price_currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipn_callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fixed_rate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fee_paid_by_user: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl CreateInvoiceRequest {
    pub fn new(price_amount: Decimal, price_currency: impl Into<String>) -> Self {
        Self {
            price_amount,
            price_currency: price_currency.into(),
            pay_currency: None,
            ipn_callback_url: None,
            order_id: None,
            order_description: None,
            success_url: None,
            cancel_url: None,
            is_fixed_rate: None,
            is_fee_paid_by_user: None,
            extra: Extra::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl ApiRequest for CreateInvoiceRequest {
    fn validate(&self) -> Result<()> {
        reject_shadowed(
            &self.extra,
            &[
                "price_amount",
                "price_currency",
                "pay_currency",
                "ipn_callback_url",
                "order_id",
                "order_description",
                "success_url",
                "cancel_url",
                "is_fixed_rate",
                "is_fee_paid_by_user",
            ],
        )?;
        require_non_empty("price_currency", &self.price_currency)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoicePaymentRequest {
    #[serde(rename = "iid")]
    pub invoice_id: String,
    pub pay_currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_currency: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl InvoicePaymentRequest {
    pub fn new(invoice_id: impl Into<String>, pay_currency: impl Into<String>) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            pay_currency: pay_currency.into(),
            purchase_id: None,
            order_description: None,
            customer_email: None,
            payout_address: None,
            payout_currency: None,
            extra: Extra::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl ApiRequest for InvoicePaymentRequest {
    fn validate(&self) -> Result<()> {
        reject_shadowed(
            &self.extra,
            &[
                "iid",
                "pay_currency",
                "purchase_id",
                "order_description",
                "customer_email",
                "payout_address",
                "payout_currency",
            ],
        )?;
        require_non_empty("invoice_id", &self.invoice_id)?;
        require_non_empty("pay_currency", &self.pay_currency)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EstimateQuery {
    pub amount: Decimal,
    pub currency_from: String,
    pub currency_to: String,
    pub extra: BTreeMap<String, String>,
}

impl EstimateQuery {
    pub fn new(
        amount: Decimal,
        currency_from: impl Into<String>,
        currency_to: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            currency_from: currency_from.into(),
            currency_to: currency_to.into(),
            extra: BTreeMap::new(),
        }
    }
}

impl QueryRequest for EstimateQuery {
    fn to_query(&self) -> Result<QueryPairs> {
        require_non_empty("currency_from", &self.currency_from)?;
        require_non_empty("currency_to", &self.currency_to)?;
        let mut pairs = QueryPairs::new();
        push(&mut pairs, "amount", self.amount);
        push(&mut pairs, "currency_from", &self.currency_from);
        push(&mut pairs, "currency_to", &self.currency_to);
        push_extra(&mut pairs, &self.extra);
        Ok(pairs)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinAmountQuery {
    pub currency_from: String,
    pub currency_to: String,
    pub fiat_equivalent: Option<String>,
    pub is_fixed_rate: Option<bool>,
    pub is_fee_paid_by_user: Option<bool>,
    pub extra: BTreeMap<String, String>,
}

impl MinAmountQuery {
    /// Minimum amount query with `fiat_equivalent=usd`
    pub fn new(currency_from: impl Into<String>, currency_to: impl Into<String>) -> Self {
        Self {
            currency_from: currency_from.into(),
            currency_to: currency_to.into(),
            fiat_equivalent: Some("usd".to_string()),
            is_fixed_rate: None,
            is_fee_paid_by_user: None,
            extra: BTreeMap::new(),
        }
    }
}

impl QueryRequest for MinAmountQuery {
    fn to_query(&self) -> Result<QueryPairs> {
        require_non_empty("currency_from", &self.currency_from)?;
        require_non_empty("currency_to", &self.currency_to)?;
        let mut pairs = QueryPairs::new();
        push(&mut pairs, "currency_from", &self.currency_from);
        push(&mut pairs, "currency_to", &self.currency_to);
        push_opt(&mut pairs, "fiat_equivalent", self.fiat_equivalent.as_ref());
        push_opt(&mut pairs, "is_fixed_rate", self.is_fixed_rate);
        push_opt(&mut pairs, "is_fee_paid_by_user", self.is_fee_paid_by_user);
        push_extra(&mut pairs, &self.extra);
        Ok(pairs)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaymentListQuery {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub sort_by: Option<PaymentSortField>,
    pub order_by: Option<SortOrder>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub extra: BTreeMap<String, String>,
}

impl QueryRequest for PaymentListQuery {
    fn to_query(&self) -> Result<QueryPairs> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(NowPaymentsError::invalid_argument(
                    "`date_from` must not be after `date_to`",
                ));
            }
        }
        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "limit", self.limit);
        push_opt(&mut pairs, "page", self.page);
        push_opt(&mut pairs, "sortBy", self.sort_by.map(PaymentSortField::as_str));
        push_opt(&mut pairs, "orderBy", self.order_by.map(SortOrder::as_str));
        push_date(&mut pairs, "dateFrom", self.date_from);
        push_date(&mut pairs, "dateTo", self.date_to);
        push_extra(&mut pairs, &self.extra);
        Ok(pairs)
    }
}

// ### Payout requests

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePayoutRequest {
    #[serde(serialize_with = "serde_helpers::serialize_withdrawals")]
    pub withdrawals: Vec<Withdrawal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipn_callback_url: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl CreatePayoutRequest {
    pub fn new(withdrawals: Vec<Withdrawal>) -> Self {
        Self {
            withdrawals,
            ipn_callback_url: None,
            extra: Extra::new(),
        }
    }

    pub fn with_ipn_callback_url(mut self, url: impl Into<String>) -> Self {
        self.ipn_callback_url = Some(url.into());
        self
    }
}

impl ApiRequest for CreatePayoutRequest {
    fn validate(&self) -> Result<()> {
        reject_shadowed(&self.extra, &["withdrawals", "ipn_callback_url"])?;
        if self.withdrawals.is_empty() {
            return Err(NowPaymentsError::invalid_argument(
                "payout requires at least one withdrawal",
            ));
        }
        for withdrawal in &self.withdrawals {
            require_non_empty("address", &withdrawal.address)?;
            require_non_empty("currency", &withdrawal.currency)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyPayoutRequest {
    pub verification_code: String,
}

impl ApiRequest for VerifyPayoutRequest {
    fn validate(&self) -> Result<()> {
        require_non_empty("verification_code", &self.verification_code)
    }
}

// ### Billing (sub-partner) requests

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateSubPartnerRequest {
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl CreateSubPartnerRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Extra::new(),
        }
    }
}

impl ApiRequest for CreateSubPartnerRequest {
    fn validate(&self) -> Result<()> {
        reject_shadowed(&self.extra, &["name"])?;
        require_non_empty("name", &self.name)?;
        if self.name.chars().count() > 30 {
            return Err(NowPaymentsError::invalid_argument(
                "`name` must not exceed 30 characters",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringPaymentRequest {
    pub subscription_plan_id: u64,
    pub sub_partner_id: u64,
    #[serde(flatten)]
    pub extra: Extra,
}

impl RecurringPaymentRequest {
    pub fn new(subscription_plan_id: u64, sub_partner_id: u64) -> Self {
        Self {
            subscription_plan_id,
            sub_partner_id,
            extra: Extra::new(),
        }
    }
}

impl ApiRequest for RecurringPaymentRequest {
    fn validate(&self) -> Result<()> {
        reject_shadowed(&self.extra, &["subscription_plan_id", "sub_partner_id"])
    }
}

/// Transfer between two sub-partner accounts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRequest {
    pub currency: String,
    #[serde(serialize_with = "rust_decimal::serde::arbitrary_precision::serialize")]
    pub amount: Decimal,
    pub from_id: String,
    pub to_id: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl TransferRequest {
    pub fn new(
        currency: impl Into<String>,
        amount: Decimal,
        from_id: impl ToString,
        to_id: impl ToString,
    ) -> Self {
        Self {
            currency: currency.into(),
            amount,
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
            extra: Extra::new(),
        }
    }
}

impl ApiRequest for TransferRequest {
    fn validate(&self) -> Result<()> {
        reject_shadowed(&self.extra, &["currency", "amount", "from_id", "to_id"])?;
        require_non_empty("currency", &self.currency)?;
        require_non_empty("from_id", &self.from_id)?;
        require_non_empty("to_id", &self.to_id)
    }
}

/// Top up a sub-partner with a general payment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositWithPaymentRequest {
    pub currency: String,
    #[serde(serialize_with = "rust_decimal::serde::arbitrary_precision::serialize")]
    pub amount: Decimal,
    pub sub_partner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fixed_rate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fee_paid_by_user: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipn_callback_url: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl DepositWithPaymentRequest {
    pub fn new(currency: impl Into<String>, amount: Decimal, sub_partner_id: impl ToString) -> Self {
        Self {
            currency: currency.into(),
            amount,
            sub_partner_id: sub_partner_id.to_string(),
            is_fixed_rate: None,
            is_fee_paid_by_user: None,
            ipn_callback_url: None,
            extra: Extra::new(),
        }
    }
}

impl ApiRequest for DepositWithPaymentRequest {
    fn validate(&self) -> Result<()> {
        reject_shadowed(
            &self.extra,
            &[
                "currency",
                "amount",
                "sub_partner_id",
                "is_fixed_rate",
                "is_fee_paid_by_user",
                "ipn_callback_url",
            ],
        )?;
        require_non_empty("currency", &self.currency)?;
        require_non_empty("sub_partner_id", &self.sub_partner_id)
    }
}

/// Master-account deposit to, or write-off from, a sub-partner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubPartnerAmountRequest {
    pub currency: String,
    #[serde(serialize_with = "rust_decimal::serde::arbitrary_precision::serialize")]
    pub amount: Decimal,
    pub sub_partner_id: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl SubPartnerAmountRequest {
    pub fn new(currency: impl Into<String>, amount: Decimal, sub_partner_id: impl ToString) -> Self {
        Self {
            currency: currency.into(),
            amount,
            sub_partner_id: sub_partner_id.to_string(),
            extra: Extra::new(),
        }
    }
}

impl ApiRequest for SubPartnerAmountRequest {
    fn validate(&self) -> Result<()> {
        reject_shadowed(&self.extra, &["currency", "amount", "sub_partner_id"])?;
        require_non_empty("currency", &self.currency)?;
        require_non_empty("sub_partner_id", &self.sub_partner_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubPartnerQuery {
    pub ids: Option<Vec<u64>>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub order: Option<SortOrder>,
}

impl QueryRequest for SubPartnerQuery {
    fn to_query(&self) -> Result<QueryPairs> {
        let mut pairs = QueryPairs::new();
        push_ids(&mut pairs, self.ids.as_deref())?;
        push_opt(&mut pairs, "offset", self.offset);
        push_opt(&mut pairs, "limit", self.limit);
        push_opt(&mut pairs, "order", self.order.map(SortOrder::as_upper));
        Ok(pairs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransfersQuery {
    pub ids: Option<Vec<u64>>,
    pub statuses: Option<Vec<TransferStatus>>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order: Option<SortOrder>,
}

impl QueryRequest for TransfersQuery {
    fn to_query(&self) -> Result<QueryPairs> {
        let mut pairs = QueryPairs::new();
        push_ids(&mut pairs, self.ids.as_deref())?;
        if let Some(statuses) = &self.statuses {
            if statuses.is_empty() {
                return Err(NowPaymentsError::invalid_argument(
                    "`status` filter must contain at least one status",
                ));
            }
            let joined = statuses
                .iter()
                .map(|status| status.as_str())
                .collect::<Vec<_>>()
                .join(",");
            push(&mut pairs, "status", joined);
        }
        push_opt(&mut pairs, "limit", self.limit);
        push_opt(&mut pairs, "offset", self.offset);
        push_opt(&mut pairs, "order", self.order.map(SortOrder::as_upper));
        Ok(pairs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubPartnerPaymentsQuery {
    pub sub_partner_id: u64,
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub payment_id: Option<u64>,
    pub pay_currency: Option<String>,
    pub status: Option<PaymentStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub order_by: Option<SortOrder>,
    pub sort_by: Option<PaymentSortField>,
}

impl SubPartnerPaymentsQuery {
    pub fn new(sub_partner_id: u64) -> Self {
        Self {
            sub_partner_id,
            limit: None,
            page: None,
            payment_id: None,
            pay_currency: None,
            status: None,
            date_from: None,
            date_to: None,
            order_by: None,
            sort_by: None,
        }
    }
}

impl QueryRequest for SubPartnerPaymentsQuery {
    fn to_query(&self) -> Result<QueryPairs> {
        let mut pairs = QueryPairs::new();
        push(&mut pairs, "sub_partner_id", self.sub_partner_id);
        push_opt(&mut pairs, "limit", self.limit);
        push_opt(&mut pairs, "page", self.page);
        push_opt(&mut pairs, "id", self.payment_id);
        push_opt(&mut pairs, "pay_currency", self.pay_currency.as_ref());
        push_opt(&mut pairs, "status", self.status.map(PaymentStatus::as_str));
        push_date(&mut pairs, "date_from", self.date_from);
        push_date(&mut pairs, "date_to", self.date_to);
        push_opt(&mut pairs, "orderBy", self.order_by.map(SortOrder::as_str));
        push_opt(&mut pairs, "sortBy", self.sort_by.map(PaymentSortField::as_str));
        Ok(pairs)
    }
}
