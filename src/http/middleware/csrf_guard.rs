use crate::auth::csrf::{AntiForgeryGate, CSRF_HEADER};
use crate::domain::principal::{CustomerIdentity, StaffIdentity};
use crate::error::PortalError;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

#[derive(Clone)]
pub struct CsrfState {
    pub gate: AntiForgeryGate,
}

/// Runs after session authentication on every state-mutating route; the
/// business handler is never reached without a matching token.
pub async fn enforce(
    State(state): State<CsrfState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let principal_id = request
        .extensions()
        .get::<StaffIdentity>()
        .map(|s| s.staff_id)
        .or_else(|| {
            request
                .extensions()
                .get::<CustomerIdentity>()
                .map(|c| c.customer_id)
        });

    let Some(principal_id) = principal_id else {
        return PortalError::Unauthenticated.into_response();
    };

    let presented = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    if presented.is_empty() || !state.gate.check(principal_id, presented) {
        tracing::warn!(%principal_id, "anti-forgery token missing or mismatched");
        return PortalError::ForgeryRejected.into_response();
    }

    next.run(request).await
}
