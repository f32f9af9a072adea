/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - filter and status enumerations
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Form used by the payment list endpoints
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// Form used by the sub-partner endpoints
    pub fn as_upper(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSortField {
    Id,
    Status,
    PayCurrency,
    CreatedAt,
    UpdatedAt,
}

impl PaymentSortField {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentSortField::Id => "id",
            PaymentSortField::Status => "status",
            PaymentSortField::PayCurrency => "pay_currency",
            PaymentSortField::CreatedAt => "created_at",
            PaymentSortField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Waiting,
    Confirming,
    Confirmed,
    Sending,
    PartiallyPaid,
    Finished,
    Failed,
    Refunded,
    Expired,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Waiting => "waiting",
            PaymentStatus::Confirming => "confirming",
            PaymentStatus::Confirmed => "confirmed",
            PaymentStatus::Sending => "sending",
            PaymentStatus::PartiallyPaid => "partially_paid",
            PaymentStatus::Finished => "finished",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Expired => "expired",
        }
    }

    /// No further status changes are expected
    pub fn is_final(self) -> bool {
        matches!(
            self,
            PaymentStatus::Finished
                | PaymentStatus::Failed
                | PaymentStatus::Refunded
                | PaymentStatus::Expired
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferStatus {
    Created,
    Waiting,
    Finished,
    Rejected,
}

impl TransferStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TransferStatus::Created => "CREATED",
            TransferStatus::Waiting => "WAITING",
            TransferStatus::Finished => "FINISHED",
            TransferStatus::Rejected => "REJECTED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_matches_wire_form() {
        let parsed: PaymentStatus = serde_json::from_str(r#""partially_paid""#).unwrap();
        assert_eq!(parsed, PaymentStatus::PartiallyPaid);
        assert_eq!(parsed.as_str(), "partially_paid");
        assert!(!parsed.is_final());
        assert!(PaymentStatus::Expired.is_final());
    }

    #[test]
    fn transfer_status_is_uppercase() {
        let json = serde_json::to_string(&TransferStatus::Rejected).unwrap();
        assert_eq!(json, r#""REJECTED""#);
    }
}
