/*
[INPUT]:  Sub-partner ids, amounts, transfer and payment filters
[OUTPUT]: Sub-partner accounts, balances, transfers and subscriptions
[POS]:    HTTP layer - billing (custody sub-partner) endpoints
[UPDATE]: When adding new billing endpoints or changing gating
*/

use serde_json::Value;

use crate::auth::{GatedOperation, require_session};
use crate::http::client::id_segment;
use crate::http::{ApiClient, Result};
use crate::types::{
    ApiRequest, CreateSubPartnerRequest, DepositWithPaymentRequest, QueryRequest,
    RecurringPaymentRequest, SubPartnerAmountRequest, SubPartnerPaymentsQuery, SubPartnerQuery,
    TransferRequest, TransfersQuery,
};

/// Billing (sub-partner) resource client
#[derive(Debug, Clone)]
pub struct BillingApi {
    client: ApiClient,
}

impl BillingApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn gate(&self, operation: GatedOperation) -> Result<()> {
        require_session(self.client.credentials(), operation).map(|_| ())
    }

    /// Create a sub-partner account
    ///
    /// POST /sub-partner/balance
    /// Requires: session token
    pub async fn create_sub_partner(&self, req: &CreateSubPartnerRequest) -> Result<Value> {
        self.gate(GatedOperation::CreateSubPartner)?;
        let body = req.to_body()?;
        self.client.post("sub-partner/balance", Some(&body)).await
    }

    /// Subscribe a sub-partner to a recurring plan
    ///
    /// POST /subscriptions
    /// Requires: session token
    pub async fn create_recurring_payment(&self, req: &RecurringPaymentRequest) -> Result<Value> {
        self.gate(GatedOperation::CreateRecurringPayment)?;
        let body = req.to_body()?;
        self.client.post("subscriptions", Some(&body)).await
    }

    /// Balance of one sub-partner
    ///
    /// GET /sub-partner/balance/{id}
    pub async fn sub_partner_balance(&self, sub_partner_id: &str) -> Result<Value> {
        let id = id_segment("sub_partner_id", sub_partner_id)?;
        self.client
            .get(&format!("sub-partner/balance/{id}"), &[])
            .await
    }

    /// List sub-partners
    ///
    /// GET /sub-partner?id=&offset=&limit=&order=
    /// Requires: session token
    pub async fn list_sub_partners(&self, query: &SubPartnerQuery) -> Result<Value> {
        self.gate(GatedOperation::ListSubPartners)?;
        let pairs = query.to_query()?;
        self.client.get("sub-partner", &pairs).await
    }

    /// List transfers between sub-partners
    ///
    /// GET /sub-partner/transfers?id=&status=&limit=&offset=&order=
    pub async fn list_transfers(&self, query: &TransfersQuery) -> Result<Value> {
        let pairs = query.to_query()?;
        self.client.get("sub-partner/transfers", &pairs).await
    }

    /// Status of one transfer
    ///
    /// GET /sub-partner/transfer/{id}
    pub async fn transfer_status(&self, transfer_id: &str) -> Result<Value> {
        let id = id_segment("transfer_id", transfer_id)?;
        self.client
            .get(&format!("sub-partner/transfer/{id}"), &[])
            .await
    }

    /// Move funds between two sub-partner accounts
    ///
    /// POST /sub-partner/transfer
    /// Requires: session token
    pub async fn transfer(&self, req: &TransferRequest) -> Result<Value> {
        self.gate(GatedOperation::Transfer)?;
        let body = req.to_body()?;
        self.client.post("sub-partner/transfer", Some(&body)).await
    }

    /// Top up a sub-partner through a general payment
    ///
    /// POST /sub-partner/payment
    /// Requires: session token
    pub async fn deposit_with_payment(&self, req: &DepositWithPaymentRequest) -> Result<Value> {
        self.gate(GatedOperation::DepositWithPayment)?;
        let body = req.to_body()?;
        self.client.post("sub-partner/payment", Some(&body)).await
    }

    /// Payments made by sub-partners
    ///
    /// GET /sub-partner/payments
    /// Requires: session token
    pub async fn sub_partner_payments(&self, query: &SubPartnerPaymentsQuery) -> Result<Value> {
        self.gate(GatedOperation::SubPartnerPayments)?;
        let pairs = query.to_query()?;
        self.client.get("sub-partner/payments", &pairs).await
    }

    /// Deposit from the master account to a sub-partner
    ///
    /// POST /sub-partner/deposit
    /// Requires: session token
    pub async fn deposit(&self, req: &SubPartnerAmountRequest) -> Result<Value> {
        self.gate(GatedOperation::Deposit)?;
        let body = req.to_body()?;
        self.client.post("sub-partner/deposit", Some(&body)).await
    }

    /// Write off a sub-partner balance to the master account
    ///
    /// POST /sub-partner/write-off
    /// Requires: session token
    pub async fn write_off(&self, req: &SubPartnerAmountRequest) -> Result<Value> {
        self.gate(GatedOperation::WriteOff)?;
        let body = req.to_body()?;
        self.client.post("sub-partner/write-off", Some(&body)).await
    }
}
