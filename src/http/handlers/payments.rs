use crate::domain::payment::CreatePaymentRequest;
use crate::domain::principal::CustomerIdentity;
use crate::error::PortalError;
use crate::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};

pub async fn create_payment(
    State(state): State<AppState>,
    Extension(customer): Extension<CustomerIdentity>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<Response, PortalError> {
    let payment_id = state.payment_service.create(&customer, &req).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::json!({"message": "Payment created", "id": payment_id})),
    )
        .into_response())
}

pub async fn my_payments(
    State(state): State<AppState>,
    Extension(customer): Extension<CustomerIdentity>,
) -> Result<Response, PortalError> {
    let payments = state
        .payment_service
        .list_for_customer(customer.customer_id)
        .await?;
    Ok(Json(payments).into_response())
}

pub async fn health() -> impl IntoResponse {
    (axum::http::StatusCode::OK, "ok")
}
