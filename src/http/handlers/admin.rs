use crate::auth::session::{STAFF_COOKIE, STAFF_SESSION_HOURS};
use crate::domain::payment::{DecideAction, PaymentStatus};
use crate::domain::principal::StaffIdentity;
use crate::error::PortalError;
use crate::http::cookies::{clear_cookie, session_cookie};
use crate::repo::store::bounded;
use crate::validate::{validate_fields, FieldKind, FieldViolation};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub action: DecideAction,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Response, PortalError> {
    validate_fields(&[("username", FieldKind::StaffUsername, &req.username)])
        .map_err(PortalError::ValidationFailed)?;

    let staff = bounded(
        state.store_timeout,
        state.principals.find_staff_by_username(req.username.trim()),
    )
    .await?;

    let Some(staff) = staff else {
        return Err(PortalError::Unauthenticated);
    };
    if !state.hasher.verify(&req.password, &staff.password_hash) {
        return Err(PortalError::Unauthenticated);
    }

    let token = state.sessions.issue_staff(staff.staff_id)?;
    state.csrf.rotate(staff.staff_id);

    let cookie = session_cookie(
        STAFF_COOKIE,
        &token,
        STAFF_SESSION_HOURS * 3600,
        state.secure_cookies,
    );
    Ok((
        [(SET_COOKIE, cookie)],
        Json(serde_json::json!({
            "message": "Logged in",
            "admin": {
                "username": staff.username,
                "employeeId": staff.employee_id,
                "fullName": staff.full_name,
            }
        })),
    )
        .into_response())
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
) -> Result<Response, PortalError> {
    state.csrf.clear(staff.staff_id);
    let cookie = clear_cookie(STAFF_COOKIE, state.secure_cookies);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(serde_json::json!({"message": "Logged out"})),
    )
        .into_response())
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, PortalError> {
    let filter = match query.status.as_deref() {
        Some(raw) => Some(PaymentStatus::parse(raw).ok_or_else(|| {
            PortalError::ValidationFailed(vec![FieldViolation {
                field: "status".to_string(),
                reason: "unknown payment status".to_string(),
            }])
        })?),
        None => None,
    };

    let payments = state.payment_service.list(filter).await?;
    Ok(Json(payments).into_response())
}

pub async fn decide(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Path(payment_id): Path<Uuid>,
    Json(req): Json<DecisionRequest>,
) -> Result<Response, PortalError> {
    let payment = state
        .payment_service
        .decide(payment_id, &staff, req.action, req.notes)
        .await?;

    Ok(Json(serde_json::json!({
        "message": format!("Payment {} successfully", if req.action == DecideAction::Verify { "verified" } else { "rejected" }),
        "payment": payment,
    }))
    .into_response())
}

pub async fn submit(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffIdentity>,
    Path(payment_id): Path<Uuid>,
) -> Result<Response, PortalError> {
    let payment = state
        .payment_service
        .submit_to_network(payment_id, &staff)
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Payment submitted to settlement network",
        "payment": payment,
    }))
    .into_response())
}

pub async fn network_status(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<Response, PortalError> {
    let view = state.payment_service.network_status(payment_id).await?;
    Ok(Json(view).into_response())
}
