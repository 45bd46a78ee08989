use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Customer,
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: Uuid,
    pub full_name: String,
    pub national_id: String,
    pub account_number: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub staff_id: Uuid,
    pub username: String,
    pub employee_id: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: StaffRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CustomerIdentity {
    pub customer_id: Uuid,
    pub account_number: String,
}

#[derive(Debug, Clone)]
pub struct StaffIdentity {
    pub staff_id: Uuid,
    pub employee_id: String,
    pub username: String,
}

impl From<&Customer> for CustomerIdentity {
    fn from(c: &Customer) -> Self {
        Self {
            customer_id: c.customer_id,
            account_number: c.account_number.clone(),
        }
    }
}

impl From<&Staff> for StaffIdentity {
    fn from(s: &Staff) -> Self {
        Self {
            staff_id: s.staff_id,
            employee_id: s.employee_id.clone(),
            username: s.username.clone(),
        }
    }
}
