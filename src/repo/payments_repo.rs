use crate::domain::payment::{Payment, PaymentStatus};
use crate::error::StoreError;
use crate::repo::store::{InsertOutcome, PaymentStore, TransitionOutcome, TransitionUpdate};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

const PAYMENT_COLUMNS: &str = r#"
    payment_id, customer_id, amount, currency, provider,
    beneficiary_name, beneficiary_account, swift_code,
    status, verification, submission, network, created_at
"#;

#[async_trait]
impl PaymentStore for PaymentsRepo {
    async fn insert(&self, payment: &Payment) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO payments (
                payment_id, customer_id, amount, currency, provider,
                beneficiary_name, beneficiary_account, swift_code, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (customer_id, beneficiary_account) DO NOTHING
            "#,
        )
        .bind(payment.payment_id)
        .bind(payment.customer_id)
        .bind(&payment.amount)
        .bind(&payment.currency)
        .bind(&payment.provider)
        .bind(&payment.beneficiary_name)
        .bind(&payment.beneficiary_account)
        .bind(&payment.swift_code)
        .bind(payment.status.as_str())
        .bind(payment.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(InsertOutcome::DuplicateKey)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }

    async fn get(&self, payment_id: Uuid) -> Result<Option<Payment>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE payment_id = $1"
        ))
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_payment(&r)).transpose()
    }

    async fn list(&self, filter: Option<PaymentStatus>) -> Result<Vec<Payment>, StoreError> {
        let rows = match filter {
            Some(status) => {
                sqlx::query(&format!(
                    "SELECT {PAYMENT_COLUMNS} FROM payments WHERE status = $1 ORDER BY created_at DESC"
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {PAYMENT_COLUMNS} FROM payments ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(row_to_payment).collect()
    }

    async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<Payment>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE customer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_payment).collect()
    }

    async fn apply_transition(
        &self,
        payment_id: Uuid,
        expected: PaymentStatus,
        update: TransitionUpdate,
    ) -> Result<TransitionOutcome, StoreError> {
        let verification = update
            .verification
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;
        let submission = update
            .submission
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;
        let network = update.network.as_ref().map(serde_json::to_value).transpose()?;

        // Conditional update: the status check and the write are one
        // statement, so a lost race shows up as zero rows touched.
        let row = sqlx::query(&format!(
            r#"
            UPDATE payments SET
                status = $3,
                verification = COALESCE($4, verification),
                submission = COALESCE($5, submission),
                network = COALESCE($6, network)
            WHERE payment_id = $1 AND status = $2
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(payment_id)
        .bind(expected.as_str())
        .bind(update.new_status.as_str())
        .bind(verification)
        .bind(submission)
        .bind(network)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(r) = row {
            return Ok(TransitionOutcome::Applied(row_to_payment(&r)?));
        }

        let current = sqlx::query("SELECT status FROM payments WHERE payment_id = $1")
            .bind(payment_id)
            .fetch_optional(&self.pool)
            .await?;

        match current {
            Some(r) => {
                let status: String = r.get("status");
                Ok(TransitionOutcome::StatusMismatch(parse_status(&status)?))
            }
            None => Ok(TransitionOutcome::Missing),
        }
    }
}

fn parse_status(raw: &str) -> Result<PaymentStatus, StoreError> {
    Ok(serde_json::from_value(serde_json::Value::String(
        raw.to_string(),
    ))?)
}

fn row_to_payment(row: &PgRow) -> Result<Payment, StoreError> {
    let status: String = row.get("status");
    let verification = row
        .get::<Option<serde_json::Value>, _>("verification")
        .map(serde_json::from_value)
        .transpose()?;
    let submission = row
        .get::<Option<serde_json::Value>, _>("submission")
        .map(serde_json::from_value)
        .transpose()?;
    let network = row
        .get::<Option<serde_json::Value>, _>("network")
        .map(serde_json::from_value)
        .transpose()?;

    Ok(Payment {
        payment_id: row.get("payment_id"),
        customer_id: row.get("customer_id"),
        amount: row.get("amount"),
        currency: row.get("currency"),
        provider: row.get("provider"),
        beneficiary_name: row.get("beneficiary_name"),
        beneficiary_account: row.get("beneficiary_account"),
        swift_code: row.get("swift_code"),
        status: parse_status(&status)?,
        verification,
        submission,
        network,
        created_at: row.get("created_at"),
    })
}
