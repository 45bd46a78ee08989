use crate::domain::payment::{
    CreatePaymentRequest, DecideAction, NetworkDetails, NetworkStatus, Payment, PaymentStatus,
    SubmissionRecord, VerificationRecord,
};
use crate::domain::principal::{CustomerIdentity, StaffIdentity};
use crate::error::{PortalError, StoreError};
use crate::repo::store::{InsertOutcome, PaymentStore, TransitionOutcome, TransitionUpdate};
use crate::validate::{validate_fields, FieldKind};
use chrono::Utc;
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const TXN_SUFFIX_LEN: usize = 8;
const TXN_SUFFIX_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Owns the payment status state machine. Every status mutation goes through
/// a conditional store update against the expected current status, so two
/// concurrent staff actions on the same payment can never both land.
#[derive(Clone)]
pub struct PaymentService {
    payments: Arc<dyn PaymentStore>,
    store_timeout: Duration,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatusView {
    pub payment_id: Uuid,
    pub status: PaymentStatus,
    pub network: NetworkDetails,
}

impl PaymentService {
    pub fn new(payments: Arc<dyn PaymentStore>, store_timeout: Duration) -> Self {
        Self {
            payments,
            store_timeout,
        }
    }

    pub async fn create(
        &self,
        customer: &CustomerIdentity,
        req: &CreatePaymentRequest,
    ) -> Result<Uuid, PortalError> {
        let mut fields = validate_fields(&[
            ("amount", FieldKind::Amount, &req.amount),
            ("currency", FieldKind::CurrencyCode, &req.currency),
            ("provider", FieldKind::Provider, &req.provider),
            ("beneficiaryName", FieldKind::PersonName, &req.beneficiary_name),
            ("beneficiaryAccount", FieldKind::AccountNumber, &req.beneficiary_account),
            ("swiftCode", FieldKind::SwiftCode, &req.swift_code),
        ])
        .map_err(PortalError::ValidationFailed)?;

        let payment = Payment {
            payment_id: Uuid::new_v4(),
            customer_id: customer.customer_id,
            amount: fields.remove("amount").unwrap_or_default(),
            currency: fields.remove("currency").unwrap_or_default(),
            provider: fields.remove("provider").unwrap_or_default(),
            beneficiary_name: fields.remove("beneficiaryName").unwrap_or_default(),
            beneficiary_account: fields.remove("beneficiaryAccount").unwrap_or_default(),
            swift_code: fields.remove("swiftCode").unwrap_or_default(),
            status: PaymentStatus::Pending,
            verification: None,
            submission: None,
            network: None,
            created_at: Utc::now(),
        };

        let payment_id = payment.payment_id;
        match self.store(self.payments.insert(&payment)).await? {
            InsertOutcome::Inserted => {
                tracing::info!(%payment_id, customer_id = %customer.customer_id, "payment created");
                Ok(payment_id)
            }
            InsertOutcome::DuplicateKey => Err(PortalError::Conflict(
                "a payment for this beneficiary account already exists".to_string(),
            )),
        }
    }

    pub async fn decide(
        &self,
        payment_id: Uuid,
        actor: &StaffIdentity,
        action: DecideAction,
        notes: Option<String>,
    ) -> Result<Payment, PortalError> {
        let notes = notes.unwrap_or_default();
        let mut fields = validate_fields(&[("notes", FieldKind::Notes, &notes)])
            .map_err(PortalError::ValidationFailed)?;

        let new_status = match action {
            DecideAction::Verify => PaymentStatus::Verified,
            DecideAction::Reject => PaymentStatus::Rejected,
        };
        let update = TransitionUpdate {
            new_status,
            verification: Some(VerificationRecord {
                staff_id: actor.staff_id,
                employee_id: actor.employee_id.clone(),
                decided_at: Utc::now(),
                notes: fields.remove("notes").unwrap_or_default(),
            }),
            submission: None,
            network: None,
        };

        let outcome = self
            .store(
                self.payments
                    .apply_transition(payment_id, PaymentStatus::Pending, update),
            )
            .await?;

        match outcome {
            TransitionOutcome::Applied(payment) => {
                tracing::info!(
                    %payment_id,
                    status = %payment.status,
                    employee_id = %actor.employee_id,
                    "payment decision recorded"
                );
                Ok(payment)
            }
            TransitionOutcome::Missing => Err(PortalError::NotFound),
            TransitionOutcome::StatusMismatch(from) => Err(PortalError::InvalidTransition {
                from,
                action: action.as_str(),
            }),
        }
    }

    pub async fn submit_to_network(
        &self,
        payment_id: Uuid,
        actor: &StaffIdentity,
    ) -> Result<Payment, PortalError> {
        let now = Utc::now();
        let update = TransitionUpdate {
            new_status: PaymentStatus::Submitted,
            verification: None,
            submission: Some(SubmissionRecord {
                staff_id: actor.staff_id,
                employee_id: actor.employee_id.clone(),
                submitted_at: now,
            }),
            network: Some(NetworkDetails {
                transaction_id: network_transaction_id(now.timestamp_millis()),
                submitted_at: now,
                status: NetworkStatus::Pending,
                response_code: "PROCESSING".to_string(),
                response_message: "Payment is being processed by the settlement network"
                    .to_string(),
            }),
        };

        let outcome = self
            .store(
                self.payments
                    .apply_transition(payment_id, PaymentStatus::Verified, update),
            )
            .await?;

        match outcome {
            TransitionOutcome::Applied(payment) => {
                tracing::info!(
                    %payment_id,
                    employee_id = %actor.employee_id,
                    "payment submitted to settlement network"
                );
                Ok(payment)
            }
            TransitionOutcome::Missing => Err(PortalError::NotFound),
            TransitionOutcome::StatusMismatch(from) => Err(PortalError::InvalidTransition {
                from,
                action: "submit",
            }),
        }
    }

    pub async fn network_status(&self, payment_id: Uuid) -> Result<NetworkStatusView, PortalError> {
        let payment = self
            .store(self.payments.get(payment_id))
            .await?
            .ok_or(PortalError::NotFound)?;

        match payment.network {
            Some(network) => Ok(NetworkStatusView {
                payment_id: payment.payment_id,
                status: payment.status,
                network,
            }),
            None => Err(PortalError::NotSubmitted),
        }
    }

    pub async fn list(&self, filter: Option<PaymentStatus>) -> Result<Vec<Payment>, PortalError> {
        self.store(self.payments.list(filter)).await
    }

    pub async fn list_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<Payment>, PortalError> {
        self.store(self.payments.list_for_customer(customer_id)).await
    }

    async fn store<T>(
        &self,
        op: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, PortalError> {
        crate::repo::store::bounded(self.store_timeout, op).await
    }
}

fn network_transaction_id(timestamp_millis: i64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..TXN_SUFFIX_LEN)
        .map(|_| TXN_SUFFIX_CHARS[rng.gen_range(0..TXN_SUFFIX_CHARS.len())] as char)
        .collect();
    format!("SWIFT{timestamp_millis}{suffix}")
}
