pub mod config;
pub mod domain {
    pub mod card;
    pub mod effects;
    pub mod error;
    pub mod order;
    pub mod product;
    pub mod seller;
    pub mod withdrawal;
}
pub mod pricing {
    pub mod installments;
    pub mod money;
}
pub mod checkout {
    pub mod card_input;
    pub mod orchestrator;
    pub mod session;
}
pub mod aggregates {
    pub mod customers;
    pub mod sales;
    pub mod withdrawals;
}
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod checkout;
        pub mod ops;
        pub mod products;
        pub mod reports;
        pub mod sales_links;
        pub mod sellers;
        pub mod webhooks;
    }
    pub mod middleware {
        pub mod admin_auth;
        pub mod rate_limit;
        pub mod seller_auth;
    }
    pub mod reply;
    pub mod router;
}
pub mod repo {
    pub mod orders_repo;
    pub mod outbox_repo;
    pub mod products_repo;
    pub mod sellers_repo;
    pub mod withdrawals_repo;
}
pub mod service {
    pub mod catalog_service;
    pub mod checkout_service;
    pub mod gateway_events;
    pub mod notification_dispatcher;
    pub mod order_ledger;
    pub mod outbox_relay;
    pub mod reports_service;
    pub mod seller_service;
}

#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub redis_client: redis::Client,
    pub checkout: service::checkout_service::CheckoutService,
    pub sellers: service::seller_service::SellerService,
    pub catalog: service::catalog_service::CatalogService,
    pub reports: service::reports_service::ReportsService,
    pub gateway_events: service::gateway_events::GatewayEventsService,
}

impl AppState {
    pub fn new(
        pool: sqlx::PgPool,
        redis_client: redis::Client,
        cfg: &config::AppConfig,
        gateway: std::sync::Arc<dyn gateways::PaymentGateway>,
        notifications: service::notification_dispatcher::NotificationDispatcher,
    ) -> Self {
        let products_repo = repo::products_repo::ProductsRepo { pool: pool.clone() };
        let sellers_repo = repo::sellers_repo::SellersRepo { pool: pool.clone() };
        let orders_repo = repo::orders_repo::OrdersRepo { pool: pool.clone() };
        let ledger = service::order_ledger::OrderLedger { pool: pool.clone() };

        Self {
            checkout: service::checkout_service::CheckoutService {
                sessions: checkout::session::SessionRegistry::default(),
                gateway: gateway.clone(),
                observer: std::sync::Arc::new(checkout::orchestrator::LoggingObserver),
                products_repo: products_repo.clone(),
                sellers_repo: sellers_repo.clone(),
                orders_repo: orders_repo.clone(),
                ledger: ledger.clone(),
                currency: cfg.checkout_currency.clone(),
            },
            sellers: service::seller_service::SellerService {
                sellers_repo,
                notifications: notifications.clone(),
            },
            catalog: service::catalog_service::CatalogService {
                products_repo,
                notifications,
                public_base_url: cfg.public_base_url.clone(),
            },
            reports: service::reports_service::ReportsService { pool: pool.clone() },
            gateway_events: service::gateway_events::GatewayEventsService {
                webhook_secret: cfg.gateway_webhook_secret.clone(),
                gateway,
                orders_repo,
                ledger,
            },
            pool,
            redis_client,
        }
    }
}
