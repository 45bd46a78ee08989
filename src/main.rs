use payments_portal::auth::credentials::CredentialHasher;
use payments_portal::auth::csrf::AntiForgeryGate;
use payments_portal::auth::session::SessionAuthenticator;
use payments_portal::config::AppConfig;
use payments_portal::http::middleware::rate_limit::RateLimiter;
use payments_portal::http::router::app;
use payments_portal::repo::payments_repo::PaymentsRepo;
use payments_portal::repo::principals_repo::PrincipalsRepo;
use payments_portal::service::payment_service::PaymentService;
use payments_portal::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let payments_repo = PaymentsRepo { pool: pool.clone() };
    let principals_repo = PrincipalsRepo { pool };

    let state = AppState {
        payment_service: PaymentService::new(
            Arc::new(payments_repo),
            Duration::from_millis(cfg.store_timeout_ms),
        ),
        principals: Arc::new(principals_repo),
        sessions: SessionAuthenticator::new(&cfg.session_secret),
        csrf: AntiForgeryGate::new(),
        hasher: CredentialHasher::new(),
        rate_limiter: RateLimiter::new(
            cfg.rate_limit_max,
            Duration::from_secs(cfg.rate_limit_window_secs),
        ),
        store_timeout: Duration::from_millis(cfg.store_timeout_ms),
        secure_cookies: cfg.secure_cookies,
    };

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
