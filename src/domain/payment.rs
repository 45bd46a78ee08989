use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Verified,
    Submitted,
    Completed,
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Verified => "verified",
            PaymentStatus::Submitted => "submitted",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "verified" => Some(PaymentStatus::Verified),
            "submitted" => Some(PaymentStatus::Submitted),
            "completed" => Some(PaymentStatus::Completed),
            "rejected" => Some(PaymentStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::Rejected)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    pub staff_id: Uuid,
    pub employee_id: String,
    pub decided_at: DateTime<Utc>,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub staff_id: Uuid,
    pub employee_id: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDetails {
    pub transaction_id: String,
    pub submitted_at: DateTime<Utc>,
    pub status: NetworkStatus,
    pub response_code: String,
    pub response_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub payment_id: Uuid,
    pub customer_id: Uuid,
    pub amount: String,
    pub currency: String,
    pub provider: String,
    pub beneficiary_name: String,
    pub beneficiary_account: String,
    pub swift_code: String,
    pub status: PaymentStatus,
    pub verification: Option<VerificationRecord>,
    pub submission: Option<SubmissionRecord>,
    pub network: Option<NetworkDetails>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub amount: String,
    pub currency: String,
    pub provider: String,
    pub beneficiary_name: String,
    pub beneficiary_account: String,
    pub swift_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecideAction {
    Verify,
    Reject,
}

impl DecideAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecideAction::Verify => "verify",
            DecideAction::Reject => "reject",
        }
    }
}
