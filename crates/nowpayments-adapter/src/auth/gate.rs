/*
[INPUT]:  Client credentials and the operation being attempted
[OUTPUT]: The session token, or AuthenticationRequired before any I/O
[POS]:    Auth layer - session gating for privileged endpoints
[UPDATE]: When an endpoint starts or stops requiring a session token
*/

use crate::http::{Credentials, NowPaymentsError, Result};

/// Configuration field callers must populate to pass the gate
pub const SESSION_TOKEN_FIELD: &str = "session_token";

/// Operations that require a session token obtained via `login`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatedOperation {
    ListPayments,
    CreatePayout,
    VerifyPayout,
    CreateSubPartner,
    CreateRecurringPayment,
    ListSubPartners,
    Transfer,
    DepositWithPayment,
    SubPartnerPayments,
    Deposit,
    WriteOff,
}

impl GatedOperation {
    pub const ALL: [GatedOperation; 11] = [
        GatedOperation::ListPayments,
        GatedOperation::CreatePayout,
        GatedOperation::VerifyPayout,
        GatedOperation::CreateSubPartner,
        GatedOperation::CreateRecurringPayment,
        GatedOperation::ListSubPartners,
        GatedOperation::Transfer,
        GatedOperation::DepositWithPayment,
        GatedOperation::SubPartnerPayments,
        GatedOperation::Deposit,
        GatedOperation::WriteOff,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GatedOperation::ListPayments => "list_payments",
            GatedOperation::CreatePayout => "create_payout",
            GatedOperation::VerifyPayout => "verify_payout",
            GatedOperation::CreateSubPartner => "create_sub_partner",
            GatedOperation::CreateRecurringPayment => "create_recurring_payment",
            GatedOperation::ListSubPartners => "list_sub_partners",
            GatedOperation::Transfer => "transfer",
            GatedOperation::DepositWithPayment => "deposit_with_payment",
            GatedOperation::SubPartnerPayments => "sub_partner_payments",
            GatedOperation::Deposit => "deposit",
            GatedOperation::WriteOff => "write_off",
        }
    }
}

/// Return the held session token or fail with `AuthenticationRequired`.
pub fn require_session(credentials: &Credentials, operation: GatedOperation) -> Result<&str> {
    credentials
        .session_token()
        .ok_or(NowPaymentsError::AuthenticationRequired {
            operation: operation.name(),
            field: SESSION_TOKEN_FIELD,
        })
}
