use crate::auth::session::{SessionAuthenticator, CUSTOMER_COOKIE, STAFF_COOKIE};
use crate::domain::principal::{CustomerIdentity, PrincipalKind, StaffIdentity};
use crate::error::PortalError;
use crate::http::cookies::cookie_value;
use crate::repo::store::{bounded, PrincipalStore};
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AuthState {
    pub sessions: SessionAuthenticator,
    pub principals: Arc<dyn PrincipalStore>,
    pub store_timeout: Duration,
}

pub async fn require_customer(
    State(auth): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = session_token(request.headers(), CUSTOMER_COOKIE) else {
        return PortalError::Unauthenticated.into_response();
    };
    let claims = match auth.sessions.verify(&token, PrincipalKind::Customer) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!("customer session rejected");
            return e.into_response();
        }
    };

    // A token for a principal that no longer exists is just as invalid as a
    // bad signature, and indistinguishable to the caller.
    match bounded(
        auth.store_timeout,
        auth.principals.find_customer_by_id(claims.sub),
    )
    .await
    {
        Ok(Some(customer)) => {
            request
                .extensions_mut()
                .insert(CustomerIdentity::from(&customer));
            next.run(request).await
        }
        Ok(None) => PortalError::Unauthenticated.into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn require_staff(
    State(auth): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = session_token(request.headers(), STAFF_COOKIE) else {
        return PortalError::Unauthenticated.into_response();
    };
    let claims = match auth.sessions.verify(&token, PrincipalKind::Staff) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!("staff session rejected");
            return e.into_response();
        }
    };

    match bounded(
        auth.store_timeout,
        auth.principals.find_staff_by_id(claims.sub),
    )
    .await
    {
        Ok(Some(staff)) => {
            request.extensions_mut().insert(StaffIdentity::from(&staff));
            next.run(request).await
        }
        Ok(None) => PortalError::Unauthenticated.into_response(),
        Err(e) => e.into_response(),
    }
}

fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(token) = cookie_value(headers, cookie_name) {
        return Some(token);
    }
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}
