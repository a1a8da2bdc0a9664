use course_checkout::config::AppConfig;
use course_checkout::gateways::http::HttpGateway;
use course_checkout::gateways::mock::{MockBehavior, MockGateway};
use course_checkout::gateways::PaymentGateway;
use course_checkout::http::middleware::rate_limit::RateLimitState;
use course_checkout::http::router::build_router;
use course_checkout::repo::outbox_repo::OutboxRepo;
use course_checkout::repo::sellers_repo::SellersRepo;
use course_checkout::service::notification_dispatcher::{
    EmailGateway, HttpEmailGateway, LogEmailGateway, NotificationDispatcher,
};
use course_checkout::service::outbox_relay::OutboxRelay;
use course_checkout::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
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

    let http_client = reqwest::Client::new();

    let gateway: Arc<dyn PaymentGateway> = if cfg.gateway_adapter.eq_ignore_ascii_case("http") {
        Arc::new(HttpGateway {
            base_url: cfg.gateway_base_url.clone(),
            secret_key: cfg.gateway_secret_key.clone(),
            publishable_key: cfg.gateway_publishable_key.clone(),
            timeout_ms: cfg.gateway_timeout_ms,
            transport_retries: cfg.gateway_transport_retries,
            client: http_client.clone(),
        })
    } else {
        tracing::warn!(adapter = %cfg.gateway_adapter, "using mock payment gateway");
        Arc::new(MockGateway::new(MockBehavior::parse(&cfg.gateway_adapter)))
    };

    let email_gateway: Arc<dyn EmailGateway> = if cfg.email_api_url.is_empty() {
        tracing::warn!("EMAIL_API_URL not set, emails are only logged");
        Arc::new(LogEmailGateway)
    } else {
        Arc::new(HttpEmailGateway {
            api_url: cfg.email_api_url.clone(),
            api_key: cfg.email_api_key.clone(),
            timeout_ms: 5_000,
            client: http_client,
        })
    };
    let notifications = NotificationDispatcher {
        gateway: email_gateway,
        from: cfg.email_from.clone(),
    };

    let relay = OutboxRelay {
        outbox_repo: OutboxRepo { pool: pool.clone() },
        sellers_repo: SellersRepo { pool: pool.clone() },
        notifications: notifications.clone(),
        poll_interval: std::time::Duration::from_millis(500),
    };
    tokio::spawn(relay.run());

    let state = AppState::new(
        pool,
        redis::Client::open(cfg.redis_url.clone())?,
        &cfg,
        gateway,
        notifications,
    );

    let sessions = state.checkout.sessions.clone();
    let ttl = chrono::Duration::minutes(cfg.session_ttl_minutes);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            ticker.tick().await;
            let pruned = sessions.prune_older_than(ttl).await;
            if pruned > 0 {
                tracing::info!(pruned, "expired checkout sessions dropped");
            }
        }
    });

    let app = build_router(
        state,
        cfg.internal_api_key.clone(),
        RateLimitState {
            redis_client: redis::Client::open(cfg.redis_url.clone())?,
            max_per_minute: cfg.rate_limit_per_minute,
        },
    );

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
