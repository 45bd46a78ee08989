use crate::domain::payment::{Payment, PaymentStatus};
use crate::domain::principal::{Customer, Staff};
use crate::error::StoreError;
use crate::repo::store::{
    InsertOutcome, PaymentStore, PrincipalStore, TransitionOutcome, TransitionUpdate,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// In-memory store backing tests and local runs without Postgres. The
/// per-store mutex makes check-then-update transitions atomic, matching the
/// conditional-update contract of the SQL implementation.
#[derive(Clone, Default)]
pub struct MemoryStore {
    payments: Arc<Mutex<HashMap<Uuid, Payment>>>,
    customers: Arc<Mutex<HashMap<Uuid, Customer>>>,
    staff: Arc<Mutex<HashMap<Uuid, Staff>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for MemoryStore {
    async fn insert(&self, payment: &Payment) -> Result<InsertOutcome, StoreError> {
        let mut payments = self.payments.lock().unwrap_or_else(|e| e.into_inner());
        let duplicate = payments.values().any(|p| {
            p.customer_id == payment.customer_id
                && p.beneficiary_account == payment.beneficiary_account
        });
        if duplicate {
            return Ok(InsertOutcome::DuplicateKey);
        }
        payments.insert(payment.payment_id, payment.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn get(&self, payment_id: Uuid) -> Result<Option<Payment>, StoreError> {
        let payments = self.payments.lock().unwrap_or_else(|e| e.into_inner());
        Ok(payments.get(&payment_id).cloned())
    }

    async fn list(&self, filter: Option<PaymentStatus>) -> Result<Vec<Payment>, StoreError> {
        let payments = self.payments.lock().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<Payment> = payments
            .values()
            .filter(|p| filter.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<Payment>, StoreError> {
        let payments = self.payments.lock().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<Payment> = payments
            .values()
            .filter(|p| p.customer_id == customer_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn apply_transition(
        &self,
        payment_id: Uuid,
        expected: PaymentStatus,
        update: TransitionUpdate,
    ) -> Result<TransitionOutcome, StoreError> {
        let mut payments = self.payments.lock().unwrap_or_else(|e| e.into_inner());
        let Some(payment) = payments.get_mut(&payment_id) else {
            return Ok(TransitionOutcome::Missing);
        };
        if payment.status != expected {
            return Ok(TransitionOutcome::StatusMismatch(payment.status));
        }

        payment.status = update.new_status;
        if let Some(verification) = update.verification {
            payment.verification = Some(verification);
        }
        if let Some(submission) = update.submission {
            payment.submission = Some(submission);
        }
        if let Some(network) = update.network {
            payment.network = Some(network);
        }
        Ok(TransitionOutcome::Applied(payment.clone()))
    }
}

#[async_trait]
impl PrincipalStore for MemoryStore {
    async fn insert_customer(&self, customer: &Customer) -> Result<InsertOutcome, StoreError> {
        let mut customers = self.customers.lock().unwrap_or_else(|e| e.into_inner());
        if customers
            .values()
            .any(|c| c.account_number == customer.account_number)
        {
            return Ok(InsertOutcome::DuplicateKey);
        }
        customers.insert(customer.customer_id, customer.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn find_customer_by_id(&self, customer_id: Uuid) -> Result<Option<Customer>, StoreError> {
        let customers = self.customers.lock().unwrap_or_else(|e| e.into_inner());
        Ok(customers.get(&customer_id).cloned())
    }

    async fn find_customer_by_account(
        &self,
        account_number: &str,
    ) -> Result<Option<Customer>, StoreError> {
        let customers = self.customers.lock().unwrap_or_else(|e| e.into_inner());
        Ok(customers
            .values()
            .find(|c| c.account_number == account_number)
            .cloned())
    }

    async fn insert_staff(&self, staff: &Staff) -> Result<InsertOutcome, StoreError> {
        let mut members = self.staff.lock().unwrap_or_else(|e| e.into_inner());
        if members
            .values()
            .any(|s| s.username == staff.username || s.employee_id == staff.employee_id)
        {
            return Ok(InsertOutcome::DuplicateKey);
        }
        members.insert(staff.staff_id, staff.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn find_staff_by_id(&self, staff_id: Uuid) -> Result<Option<Staff>, StoreError> {
        let members = self.staff.lock().unwrap_or_else(|e| e.into_inner());
        Ok(members.get(&staff_id).cloned())
    }

    async fn find_staff_by_username(&self, username: &str) -> Result<Option<Staff>, StoreError> {
        let members = self.staff.lock().unwrap_or_else(|e| e.into_inner());
        Ok(members.values().find(|s| s.username == username).cloned())
    }
}
