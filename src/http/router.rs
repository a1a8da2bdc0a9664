use crate::http::handlers::{checkout, ops, products, reports, sales_links, sellers, webhooks};
use crate::http::middleware::{admin_auth, rate_limit, seller_auth};
use crate::AppState;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, patch, post};
use axum::Router;

pub fn build_router(
    state: AppState,
    internal_api_key: String,
    rate_limit_state: rate_limit::RateLimitState,
) -> Router {
    let admin_routes = Router::new()
        .route("/admin/sellers/:seller_id/kyc", post(sellers::set_kyc_status))
        .route_layer(from_fn_with_state(
            internal_api_key,
            admin_auth::require_internal_api_key,
        ));

    let seller_routes = Router::new()
        .route("/sellers/me", get(sellers::me))
        .route("/sellers/me/verify-email", post(sellers::verify_email))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/:product_id",
            patch(products::update_product).delete(products::delete_product),
        )
        .route(
            "/products/:product_id/collaborators",
            post(products::invite_collaborator),
        )
        .route(
            "/products/:product_id/links",
            get(sales_links::list_links).post(sales_links::create_link),
        )
        .route(
            "/products/:product_id/links/:link_id",
            delete(sales_links::delete_link),
        )
        .route("/sales", get(reports::sales))
        .route("/customers", get(reports::customers))
        .route(
            "/withdrawals",
            get(reports::withdrawals).post(reports::request_withdrawal),
        )
        .route("/orders/:order_id/sync", post(webhooks::sync_order))
        .route_layer(from_fn_with_state(
            state.sellers.clone(),
            seller_auth::require_seller,
        ));

    let public_routes = Router::new()
        .route("/checkout/quote", get(checkout::quote))
        .route("/checkout/links/:token", get(checkout::preview_link))
        .route("/product/:slug", get(checkout::preview_slug))
        .route("/checkout/sessions", post(checkout::open_session))
        .route(
            "/checkout/sessions/:session_id",
            get(checkout::get_session).delete(checkout::abandon_session),
        )
        .route(
            "/checkout/sessions/:session_id/confirm",
            post(checkout::confirm_session),
        )
        .route("/sellers", post(sellers::register))
        .layer(from_fn_with_state(rate_limit_state, rate_limit::enforce));

    Router::new()
        .route("/health", get(ops::health))
        .route("/ops/readiness", get(ops::readiness))
        .route("/ops/liveness", get(ops::liveness))
        .route("/webhooks/gateway", post(webhooks::gateway_webhook))
        .merge(public_routes)
        .merge(seller_routes)
        .merge(admin_routes)
        .with_state(state)
}
