pub mod config;
pub mod error;
pub mod validate;
pub mod domain {
    pub mod payment;
    pub mod principal;
}
pub mod auth {
    pub mod credentials;
    pub mod csrf;
    pub mod session;
}
pub mod repo {
    pub mod memory;
    pub mod payments_repo;
    pub mod principals_repo;
    pub mod store;
}
pub mod service {
    pub mod payment_service;
}
pub mod http {
    pub mod cookies;
    pub mod error;
    pub mod router;
    pub mod handlers {
        pub mod admin;
        pub mod auth;
        pub mod payments;
    }
    pub mod middleware {
        pub mod csrf_guard;
        pub mod rate_limit;
        pub mod session_auth;
    }
}

use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub payment_service: service::payment_service::PaymentService,
    pub principals: Arc<dyn repo::store::PrincipalStore>,
    pub sessions: auth::session::SessionAuthenticator,
    pub csrf: auth::csrf::AntiForgeryGate,
    pub hasher: auth::credentials::CredentialHasher,
    pub rate_limiter: http::middleware::rate_limit::RateLimiter,
    pub store_timeout: Duration,
    pub secure_cookies: bool,
}
