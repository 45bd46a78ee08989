use crate::domain::principal::{Customer, Staff, StaffRole};
use crate::error::StoreError;
use crate::repo::store::{InsertOutcome, PrincipalStore};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct PrincipalsRepo {
    pub pool: PgPool,
}

#[async_trait]
impl PrincipalStore for PrincipalsRepo {
    async fn insert_customer(&self, customer: &Customer) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO customers (customer_id, full_name, national_id, account_number, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (account_number) DO NOTHING
            "#,
        )
        .bind(customer.customer_id)
        .bind(&customer.full_name)
        .bind(&customer.national_id)
        .bind(&customer.account_number)
        .bind(&customer.password_hash)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(InsertOutcome::DuplicateKey)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }

    async fn find_customer_by_id(&self, customer_id: Uuid) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query(
            "SELECT customer_id, full_name, national_id, account_number, password_hash, created_at
             FROM customers WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_customer(&r)))
    }

    async fn find_customer_by_account(
        &self,
        account_number: &str,
    ) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query(
            "SELECT customer_id, full_name, national_id, account_number, password_hash, created_at
             FROM customers WHERE account_number = $1",
        )
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_customer(&r)))
    }

    async fn insert_staff(&self, staff: &Staff) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO staff (staff_id, username, employee_id, full_name, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(staff.staff_id)
        .bind(&staff.username)
        .bind(&staff.employee_id)
        .bind(&staff.full_name)
        .bind(&staff.password_hash)
        .bind("admin")
        .bind(staff.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(InsertOutcome::DuplicateKey)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }

    async fn find_staff_by_id(&self, staff_id: Uuid) -> Result<Option<Staff>, StoreError> {
        let row = sqlx::query(
            "SELECT staff_id, username, employee_id, full_name, password_hash, created_at
             FROM staff WHERE staff_id = $1",
        )
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_staff(&r)))
    }

    async fn find_staff_by_username(&self, username: &str) -> Result<Option<Staff>, StoreError> {
        let row = sqlx::query(
            "SELECT staff_id, username, employee_id, full_name, password_hash, created_at
             FROM staff WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_staff(&r)))
    }
}

fn row_to_customer(row: &PgRow) -> Customer {
    Customer {
        customer_id: row.get("customer_id"),
        full_name: row.get("full_name"),
        national_id: row.get("national_id"),
        account_number: row.get("account_number"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

fn row_to_staff(row: &PgRow) -> Staff {
    Staff {
        staff_id: row.get("staff_id"),
        username: row.get("username"),
        employee_id: row.get("employee_id"),
        full_name: row.get("full_name"),
        password_hash: row.get("password_hash"),
        role: StaffRole::Admin,
        created_at: row.get("created_at"),
    }
}
