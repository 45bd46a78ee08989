use crate::http::handlers::{admin, auth, payments};
use crate::http::middleware::csrf_guard::{self, CsrfState};
use crate::http::middleware::rate_limit;
use crate::http::middleware::session_auth::{self, AuthState};
use crate::AppState;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

/// Full route table. The rate limiter fronts every route; mutating routes
/// are wrapped session-auth first, then the anti-forgery gate, so the
/// forgery check always sees an authenticated principal and the handler is
/// never reached without both.
pub fn app(state: AppState) -> Router {
    let auth_state = AuthState {
        sessions: state.sessions.clone(),
        principals: state.principals.clone(),
        store_timeout: state.store_timeout,
    };
    let csrf_state = CsrfState {
        gate: state.csrf.clone(),
    };

    let public = Router::new()
        .route("/health", get(payments::health))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/api/admin/login", post(admin::login));

    let customer_reads = Router::new()
        .route("/me", get(auth::me))
        .route("/csrf-token", get(auth::csrf_token))
        .route("/payments/mine", get(payments::my_payments))
        .layer(from_fn_with_state(
            auth_state.clone(),
            session_auth::require_customer,
        ));

    let customer_writes = Router::new()
        .route("/payments", post(payments::create_payment))
        .layer(from_fn_with_state(csrf_state.clone(), csrf_guard::enforce))
        .layer(from_fn_with_state(
            auth_state.clone(),
            session_auth::require_customer,
        ));

    let staff_reads = Router::new()
        .route("/api/admin/payments", get(admin::list_payments))
        .route(
            "/api/admin/payments/:payment_id/network-status",
            get(admin::network_status),
        )
        .route("/api/admin/csrf-token", get(auth::csrf_token))
        .layer(from_fn_with_state(
            auth_state.clone(),
            session_auth::require_staff,
        ));

    let staff_writes = Router::new()
        .route(
            "/api/admin/payments/:payment_id/decision",
            post(admin::decide),
        )
        .route("/api/admin/payments/:payment_id/submit", post(admin::submit))
        .route("/api/admin/logout", post(admin::logout))
        .layer(from_fn_with_state(csrf_state, csrf_guard::enforce))
        .layer(from_fn_with_state(auth_state, session_auth::require_staff));

    Router::new()
        .merge(public)
        .merge(customer_reads)
        .merge(customer_writes)
        .merge(staff_reads)
        .merge(staff_writes)
        .layer(from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit::enforce,
        ))
        .with_state(state)
}
