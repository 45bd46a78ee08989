use anyhow::{bail, Result};
use chrono::Utc;
use payments_portal::auth::credentials::CredentialHasher;
use payments_portal::config::AppConfig;
use payments_portal::domain::principal::{Staff, StaffRole};
use payments_portal::repo::principals_repo::PrincipalsRepo;
use payments_portal::repo::store::{InsertOutcome, PrincipalStore};
use payments_portal::validate::{validate_fields, FieldKind};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let username = std::env::var("STAFF_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let employee_id = std::env::var("STAFF_EMPLOYEE_ID").unwrap_or_else(|_| "EMP000001".to_string());
    let full_name =
        std::env::var("STAFF_FULL_NAME").unwrap_or_else(|_| "System Administrator".to_string());
    let Ok(password) = std::env::var("STAFF_PASSWORD") else {
        bail!("STAFF_PASSWORD must be set");
    };

    if let Err(violations) = validate_fields(&[
        ("username", FieldKind::StaffUsername, &username),
        ("employeeId", FieldKind::EmployeeId, &employee_id),
        ("fullName", FieldKind::PersonName, &full_name),
        ("password", FieldKind::Password, &password),
    ]) {
        for v in violations {
            tracing::error!(field = %v.field, reason = %v.reason, "invalid staff field");
        }
        bail!("staff provisioning aborted");
    }

    let cfg = AppConfig::from_env();
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&cfg.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let hasher = CredentialHasher::new();
    let Ok(password_hash) = hasher.hash(&password) else {
        bail!("password hashing failed");
    };

    let staff = Staff {
        staff_id: Uuid::new_v4(),
        username: username.clone(),
        employee_id,
        full_name,
        password_hash,
        role: StaffRole::Admin,
        created_at: Utc::now(),
    };

    let repo = PrincipalsRepo { pool };
    match repo.insert_staff(&staff).await? {
        InsertOutcome::Inserted => {
            tracing::info!(%username, "staff member created");
            Ok(())
        }
        InsertOutcome::DuplicateKey => bail!("username or employee id already taken"),
    }
}
