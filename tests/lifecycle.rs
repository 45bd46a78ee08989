use payments_portal::domain::payment::{
    CreatePaymentRequest, DecideAction, NetworkStatus, Payment, PaymentStatus,
};
use payments_portal::domain::principal::{CustomerIdentity, StaffIdentity};
use payments_portal::error::{PortalError, StoreError};
use payments_portal::repo::memory::MemoryStore;
use payments_portal::repo::store::{
    InsertOutcome, PaymentStore, TransitionOutcome, TransitionUpdate,
};
use payments_portal::service::payment_service::PaymentService;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

fn service() -> PaymentService {
    PaymentService::new(Arc::new(MemoryStore::new()), Duration::from_millis(500))
}

fn customer() -> CustomerIdentity {
    CustomerIdentity {
        customer_id: Uuid::new_v4(),
        account_number: "1122334455".to_string(),
    }
}

fn staff() -> StaffIdentity {
    StaffIdentity {
        staff_id: Uuid::new_v4(),
        employee_id: "EMP000042".to_string(),
        username: "reviewer".to_string(),
    }
}

fn transfer_request(beneficiary_account: &str) -> CreatePaymentRequest {
    CreatePaymentRequest {
        amount: "100.00".to_string(),
        currency: "ZAR".to_string(),
        provider: "SWIFT".to_string(),
        beneficiary_name: "Jane Smith".to_string(),
        beneficiary_account: beneficiary_account.to_string(),
        swift_code: "SBZAZAJJ".to_string(),
    }
}

#[tokio::test]
async fn full_lifecycle_pending_verified_submitted() {
    let svc = service();
    let owner = customer();
    let reviewer = staff();

    let payment_id = svc.create(&owner, &transfer_request("1234567890")).await.unwrap();

    let listed = svc.list(Some(PaymentStatus::Pending)).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].payment_id, payment_id);
    assert!(listed[0].verification.is_none());
    assert!(listed[0].submission.is_none());
    assert!(listed[0].network.is_none());

    let verified = svc
        .decide(payment_id, &reviewer, DecideAction::Verify, Some("looks fine".to_string()))
        .await
        .unwrap();
    assert_eq!(verified.status, PaymentStatus::Verified);
    let record = verified.verification.expect("verification record");
    assert_eq!(record.employee_id, "EMP000042");
    assert_eq!(record.notes, "looks fine");

    let submitted = svc.submit_to_network(payment_id, &reviewer).await.unwrap();
    assert_eq!(submitted.status, PaymentStatus::Submitted);
    assert!(submitted.submission.is_some());
    let network = submitted.network.expect("network details");
    assert_eq!(network.status, NetworkStatus::Pending);
    assert!(!network.transaction_id.is_empty());

    let view = svc.network_status(payment_id).await.unwrap();
    assert_eq!(view.status, PaymentStatus::Submitted);
    assert_eq!(view.network.transaction_id, network.transaction_id);
}

#[tokio::test]
async fn amount_survives_round_trip_verbatim() {
    let svc = service();
    let owner = customer();

    let payment_id = svc.create(&owner, &transfer_request("1234567890")).await.unwrap();
    let fetched = &svc.list(None).await.unwrap()[0];

    assert_eq!(fetched.payment_id, payment_id);
    assert_eq!(fetched.amount, "100.00");
    assert_eq!(fetched.currency, "ZAR");
    assert_eq!(fetched.beneficiary_name, "Jane Smith");
    assert_eq!(fetched.beneficiary_account, "1234567890");
    assert_eq!(fetched.swift_code, "SBZAZAJJ");
}

#[tokio::test]
async fn reject_is_terminal() {
    let svc = service();
    let owner = customer();
    let reviewer = staff();

    let payment_id = svc.create(&owner, &transfer_request("1234567890")).await.unwrap();
    let rejected = svc
        .decide(payment_id, &reviewer, DecideAction::Reject, None)
        .await
        .unwrap();
    assert_eq!(rejected.status, PaymentStatus::Rejected);
    assert_eq!(rejected.verification.unwrap().notes, "");

    let err = svc
        .decide(payment_id, &reviewer, DecideAction::Verify, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PortalError::InvalidTransition {
            from: PaymentStatus::Rejected,
            ..
        }
    ));

    let err = svc.submit_to_network(payment_id, &reviewer).await.unwrap_err();
    assert!(matches!(err, PortalError::InvalidTransition { .. }));
}

#[tokio::test]
async fn submit_requires_verified_and_writes_nothing_otherwise() {
    let svc = service();
    let owner = customer();
    let reviewer = staff();

    let payment_id = svc.create(&owner, &transfer_request("1234567890")).await.unwrap();
    let err = svc.submit_to_network(payment_id, &reviewer).await.unwrap_err();
    assert!(matches!(
        err,
        PortalError::InvalidTransition {
            from: PaymentStatus::Pending,
            ..
        }
    ));

    let unchanged = &svc.list(None).await.unwrap()[0];
    assert_eq!(unchanged.status, PaymentStatus::Pending);
    assert!(unchanged.submission.is_none());
    assert!(unchanged.network.is_none());
}

#[tokio::test]
async fn unknown_payment_is_not_found() {
    let svc = service();
    let reviewer = staff();
    let missing = Uuid::new_v4();

    assert!(matches!(
        svc.decide(missing, &reviewer, DecideAction::Verify, None).await,
        Err(PortalError::NotFound)
    ));
    assert!(matches!(
        svc.submit_to_network(missing, &reviewer).await,
        Err(PortalError::NotFound)
    ));
    assert!(matches!(
        svc.network_status(missing).await,
        Err(PortalError::NotFound)
    ));
}

#[tokio::test]
async fn network_status_before_submission_fails() {
    let svc = service();
    let owner = customer();

    let payment_id = svc.create(&owner, &transfer_request("1234567890")).await.unwrap();
    assert!(matches!(
        svc.network_status(payment_id).await,
        Err(PortalError::NotSubmitted)
    ));
}

#[tokio::test]
async fn duplicate_beneficiary_binding_conflicts() {
    let svc = service();
    let owner = customer();

    svc.create(&owner, &transfer_request("1234567890")).await.unwrap();
    let err = svc
        .create(&owner, &transfer_request("1234567890"))
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Conflict(_)));

    // A different customer may bind the same beneficiary account.
    svc.create(&customer(), &transfer_request("1234567890"))
        .await
        .unwrap();
}

#[tokio::test]
async fn invalid_fields_reject_without_partial_state() {
    let svc = service();
    let owner = customer();

    let mut bad = transfer_request("1234567890");
    bad.amount = "100.001".to_string();
    bad.currency = "zar".to_string();

    let err = svc.create(&owner, &bad).await.unwrap_err();
    let PortalError::ValidationFailed(violations) = err else {
        panic!("expected validation failure");
    };
    let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
    assert!(fields.contains(&"amount"));
    assert!(fields.contains(&"currency"));

    assert!(svc.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_decisions_land_exactly_once() {
    let svc = service();
    let owner = customer();
    let first = StaffIdentity {
        staff_id: Uuid::new_v4(),
        employee_id: "EMP000001".to_string(),
        username: "first_reviewer".to_string(),
    };
    let second = StaffIdentity {
        staff_id: Uuid::new_v4(),
        employee_id: "EMP000002".to_string(),
        username: "second_reviewer".to_string(),
    };

    let payment_id = svc.create(&owner, &transfer_request("1234567890")).await.unwrap();

    let (a, b) = tokio::join!(
        svc.decide(payment_id, &first, DecideAction::Verify, None),
        svc.decide(payment_id, &second, DecideAction::Reject, None),
    );

    let winners = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(winners, 1, "exactly one concurrent decision may land");

    let settled = &svc.list(None).await.unwrap()[0];
    let record = settled.verification.as_ref().expect("single audit record");
    match settled.status {
        PaymentStatus::Verified => assert_eq!(record.employee_id, first.employee_id),
        PaymentStatus::Rejected => assert_eq!(record.employee_id, second.employee_id),
        other => panic!("unexpected status {other}"),
    }
}

#[tokio::test]
async fn transaction_ids_are_unique_across_payments() {
    let svc = service();
    let reviewer = staff();
    let mut seen = std::collections::HashSet::new();

    for i in 0..20 {
        let owner = customer();
        let payment_id = svc
            .create(&owner, &transfer_request(&format!("90000000{i:02}")))
            .await
            .unwrap();
        svc.decide(payment_id, &reviewer, DecideAction::Verify, None)
            .await
            .unwrap();
        let submitted = svc.submit_to_network(payment_id, &reviewer).await.unwrap();
        let txn = submitted.network.unwrap().transaction_id;
        assert!(seen.insert(txn), "transaction id collided");
    }
}

struct StalledStore;

#[async_trait::async_trait]
impl PaymentStore for StalledStore {
    async fn insert(&self, _payment: &Payment) -> Result<InsertOutcome, StoreError> {
        std::future::pending().await
    }

    async fn get(&self, _payment_id: Uuid) -> Result<Option<Payment>, StoreError> {
        std::future::pending().await
    }

    async fn list(&self, _filter: Option<PaymentStatus>) -> Result<Vec<Payment>, StoreError> {
        std::future::pending().await
    }

    async fn list_for_customer(&self, _customer_id: Uuid) -> Result<Vec<Payment>, StoreError> {
        std::future::pending().await
    }

    async fn apply_transition(
        &self,
        _payment_id: Uuid,
        _expected: PaymentStatus,
        _update: TransitionUpdate,
    ) -> Result<TransitionOutcome, StoreError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn stalled_store_surfaces_timeout() {
    let svc = PaymentService::new(Arc::new(StalledStore), Duration::from_millis(50));
    let owner = customer();
    let reviewer = staff();

    assert!(matches!(
        svc.create(&owner, &transfer_request("1234567890")).await,
        Err(PortalError::Timeout)
    ));
    assert!(matches!(
        svc.decide(Uuid::new_v4(), &reviewer, DecideAction::Verify, None).await,
        Err(PortalError::Timeout)
    ));
    assert!(matches!(svc.list(None).await, Err(PortalError::Timeout)));
}

#[tokio::test]
async fn list_is_newest_first_and_filterable() {
    let svc = service();
    let reviewer = staff();

    let first_owner = customer();
    let first = svc.create(&first_owner, &transfer_request("1000000001")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = svc.create(&customer(), &transfer_request("1000000002")).await.unwrap();

    let all = svc.list(None).await.unwrap();
    assert_eq!(all[0].payment_id, second);
    assert_eq!(all[1].payment_id, first);

    svc.decide(first, &reviewer, DecideAction::Verify, None).await.unwrap();
    let pending = svc.list(Some(PaymentStatus::Pending)).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].payment_id, second);

    let mine = svc.list_for_customer(first_owner.customer_id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].payment_id, first);
}
