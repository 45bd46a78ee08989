use crate::domain::payment::{
    NetworkDetails, Payment, PaymentStatus, SubmissionRecord, VerificationRecord,
};
use crate::domain::principal::{Customer, Staff};
use crate::error::{PortalError, StoreError};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct TransitionUpdate {
    pub new_status: PaymentStatus,
    pub verification: Option<VerificationRecord>,
    pub submission: Option<SubmissionRecord>,
    pub network: Option<NetworkDetails>,
}

#[derive(Debug)]
pub enum TransitionOutcome {
    Applied(Payment),
    Missing,
    StatusMismatch(PaymentStatus),
}

#[derive(Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    DuplicateKey,
}

/// Runs a store round trip under the configured time bound. A stalled
/// collaborator surfaces as `Timeout` rather than hanging the request.
pub async fn bounded<T>(
    limit: Duration,
    op: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, PortalError> {
    match tokio::time::timeout(limit, op).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "store failure");
            Err(PortalError::StoreUnavailable(e))
        }
        Err(_) => Err(PortalError::Timeout),
    }
}

/// Persistence collaborator for payments. Implementations must make
/// `apply_transition` an atomic check-then-update: the write happens only if
/// the payment is still in the expected status.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn insert(&self, payment: &Payment) -> Result<InsertOutcome, StoreError>;
    async fn get(&self, payment_id: Uuid) -> Result<Option<Payment>, StoreError>;
    async fn list(&self, filter: Option<PaymentStatus>) -> Result<Vec<Payment>, StoreError>;
    async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<Payment>, StoreError>;
    async fn apply_transition(
        &self,
        payment_id: Uuid,
        expected: PaymentStatus,
        update: TransitionUpdate,
    ) -> Result<TransitionOutcome, StoreError>;
}

/// Persistence collaborator for both principal kinds, keyed by id and by
/// each unique field. Inserts carry insert-if-absent semantics on the
/// unique keys.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    async fn insert_customer(&self, customer: &Customer) -> Result<InsertOutcome, StoreError>;
    async fn find_customer_by_id(&self, customer_id: Uuid) -> Result<Option<Customer>, StoreError>;
    async fn find_customer_by_account(
        &self,
        account_number: &str,
    ) -> Result<Option<Customer>, StoreError>;
    async fn insert_staff(&self, staff: &Staff) -> Result<InsertOutcome, StoreError>;
    async fn find_staff_by_id(&self, staff_id: Uuid) -> Result<Option<Staff>, StoreError>;
    async fn find_staff_by_username(&self, username: &str) -> Result<Option<Staff>, StoreError>;
}
