use crate::auth::session::{CUSTOMER_COOKIE, CUSTOMER_SESSION_HOURS};
use crate::domain::principal::{Customer, CustomerIdentity, StaffIdentity};
use crate::error::PortalError;
use crate::http::cookies::session_cookie;
use crate::http::error::internal_error;
use crate::repo::store::{bounded, InsertOutcome};
use crate::validate::{validate_fields, FieldKind};
use crate::AppState;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub id_number: String,
    pub account_number: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub account_number: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, PortalError> {
    let mut fields = validate_fields(&[
        ("fullName", FieldKind::PersonName, &req.full_name),
        ("idNumber", FieldKind::NationalId, &req.id_number),
        ("accountNumber", FieldKind::AccountNumber, &req.account_number),
        ("password", FieldKind::Password, &req.password),
    ])
    .map_err(PortalError::ValidationFailed)?;

    let Ok(password_hash) = state.hasher.hash(&req.password) else {
        tracing::error!("password hashing failed during registration");
        return Ok(internal_error());
    };

    let customer = Customer {
        customer_id: Uuid::new_v4(),
        full_name: fields.remove("fullName").unwrap_or_default(),
        national_id: fields.remove("idNumber").unwrap_or_default(),
        account_number: fields.remove("accountNumber").unwrap_or_default(),
        password_hash,
        created_at: Utc::now(),
    };

    match bounded(state.store_timeout, state.principals.insert_customer(&customer)).await? {
        InsertOutcome::Inserted => Ok((
            axum::http::StatusCode::CREATED,
            Json(serde_json::json!({"message": "Registered"})),
        )
            .into_response()),
        InsertOutcome::DuplicateKey => Err(PortalError::Conflict(
            "account number already registered".to_string(),
        )),
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, PortalError> {
    validate_fields(&[
        ("username", FieldKind::PersonName, &req.username),
        ("accountNumber", FieldKind::AccountNumber, &req.account_number),
    ])
    .map_err(PortalError::ValidationFailed)?;

    let customer = bounded(
        state.store_timeout,
        state
            .principals
            .find_customer_by_account(req.account_number.trim()),
    )
    .await?;

    // One failure path for unknown account, wrong name, and wrong password.
    let Some(customer) = customer else {
        return Err(PortalError::Unauthenticated);
    };
    if customer.full_name != req.username.trim()
        || !state.hasher.verify(&req.password, &customer.password_hash)
    {
        return Err(PortalError::Unauthenticated);
    }

    let token = state.sessions.issue_customer(customer.customer_id)?;
    state.csrf.rotate(customer.customer_id);

    let cookie = session_cookie(
        CUSTOMER_COOKIE,
        &token,
        CUSTOMER_SESSION_HOURS * 3600,
        state.secure_cookies,
    );
    Ok((
        [(SET_COOKIE, cookie)],
        Json(serde_json::json!({"message": "Logged in"})),
    )
        .into_response())
}

pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<CustomerIdentity>,
) -> Result<Response, PortalError> {
    let customer = bounded(
        state.store_timeout,
        state.principals.find_customer_by_id(identity.customer_id),
    )
    .await?
    .ok_or(PortalError::Unauthenticated)?;

    Ok(Json(serde_json::json!({
        "user": {
            "id": customer.customer_id,
            "fullName": customer.full_name,
            "accountNumber": customer.account_number,
        }
    }))
    .into_response())
}

pub async fn csrf_token(
    State(state): State<AppState>,
    customer: Option<Extension<CustomerIdentity>>,
    staff: Option<Extension<StaffIdentity>>,
) -> Result<Response, PortalError> {
    let principal_id = staff
        .map(|Extension(s)| s.staff_id)
        .or_else(|| customer.map(|Extension(c)| c.customer_id))
        .ok_or(PortalError::Unauthenticated)?;

    let token = state.csrf.token_for(principal_id);
    Ok(Json(serde_json::json!({"csrfToken": token})).into_response())
}
