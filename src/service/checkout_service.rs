use crate::checkout::card_input::CardInput;
use crate::checkout::orchestrator::{CheckoutError, CheckoutObserver};
use crate::checkout::session::{
    CheckoutSession, OpenSessionRequest, SessionItem, SessionRegistry, SessionView,
};
use crate::domain::error::{api_err, internal, not_found, ApiError};
use crate::domain::order::CustomerInfo;
use crate::domain::product::{CheckoutLookup, CheckoutTarget};
use crate::gateways::PaymentGateway;
use crate::pricing::installments::{installment_quote, InstallmentQuote, MAX_INSTALLMENTS};
use crate::repo::orders_repo::{NewOrder, OrdersRepo};
use crate::repo::products_repo::ProductsRepo;
use crate::repo::sellers_repo::SellersRepo;
use crate::service::order_ledger::OrderLedger;
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutPreview {
    pub product_id: Uuid,
    pub sales_link_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub currency: String,
    pub max_installments: u8,
}

#[derive(Clone)]
pub struct CheckoutService {
    pub sessions: SessionRegistry,
    pub gateway: Arc<dyn PaymentGateway>,
    pub observer: Arc<dyn CheckoutObserver>,
    pub products_repo: ProductsRepo,
    pub sellers_repo: SellersRepo,
    pub orders_repo: OrdersRepo,
    pub ledger: OrderLedger,
    pub currency: String,
}

impl CheckoutService {
    pub async fn resolve(&self, lookup: &CheckoutLookup) -> Result<CheckoutTarget, ApiError> {
        let target = match lookup {
            CheckoutLookup::LinkToken(token) => {
                let link = self
                    .products_repo
                    .find_link_by_token(token)
                    .await
                    .map_err(internal)?
                    .filter(|l| l.is_active)
                    .ok_or_else(|| not_found("sales link"))?;
                let product = self
                    .products_repo
                    .find_by_id(link.product_id)
                    .await
                    .map_err(internal)?
                    .ok_or_else(|| not_found("product"))?;
                CheckoutTarget::from_link(product, link)
            }
            CheckoutLookup::Slug(slug) => {
                let product = self
                    .products_repo
                    .find_by_slug(slug)
                    .await
                    .map_err(internal)?
                    .ok_or_else(|| not_found("product"))?;
                CheckoutTarget::from_product(product)
            }
        };

        if !target.product.is_active {
            return Err(not_found("product"));
        }

        let seller = self
            .sellers_repo
            .find_by_id(target.product.seller_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| not_found("seller"))?;
        if !seller.can_sell() {
            return Err(api_err(
                StatusCode::FORBIDDEN,
                "SELLING_DISABLED",
                "this product is not available for purchase right now",
            ));
        }

        Ok(target)
    }

    pub async fn preview(&self, lookup: CheckoutLookup) -> Result<CheckoutPreview, ApiError> {
        let target = self.resolve(&lookup).await?;
        Ok(CheckoutPreview {
            product_id: target.product.product_id,
            sales_link_id: target.sales_link.as_ref().map(|l| l.link_id),
            title: target.title,
            description: target.product.description,
            price: target.price,
            currency: self.currency.clone(),
            max_installments: MAX_INSTALLMENTS,
        })
    }

    pub fn quote(&self, amount: Decimal, installments: u8) -> Result<InstallmentQuote, ApiError> {
        installment_quote(amount, installments)
            .map_err(|e| api_err(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", &e.to_string()))
    }

    pub async fn open(&self, req: OpenSessionRequest) -> Result<SessionView, ApiError> {
        let lookup = match (req.link_token, req.slug) {
            (Some(token), _) => CheckoutLookup::LinkToken(token),
            (None, Some(slug)) => CheckoutLookup::Slug(slug),
            (None, None) => {
                return Err(api_err(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "link_token or slug is required",
                ))
            }
        };
        validate_customer(&req.customer)?;

        let target = self.resolve(&lookup).await?;
        let quote = self.quote(target.price, req.installments)?;

        let item = SessionItem {
            product_id: target.product.product_id,
            seller_id: target.product.seller_id,
            sales_link_id: target.sales_link.as_ref().map(|l| l.link_id),
            title: target.title,
        };
        let mut session = CheckoutSession::new(item, quote, &self.currency, req.customer, req.coupon_code);

        if session.start(self.gateway.as_ref(), self.observer.as_ref()).await.is_ok() {
            let order_id = {
                let ctx = session.context();
                let payment_id = session.payment_id().unwrap_or_default();
                self.orders_repo
                    .insert_pending(&NewOrder {
                        seller_id: session.item.seller_id,
                        product_id: session.item.product_id,
                        product_title: &session.item.title,
                        sales_link_id: session.item.sales_link_id,
                        payment_id,
                        amount_minor: ctx.amount_minor,
                        currency: &ctx.currency,
                        installments: i16::from(session.quote.installments),
                        customer: &ctx.customer,
                        coupon_code: ctx.coupon_code.as_deref(),
                    })
                    .await
                    .map_err(internal)?
            };
            session.order_id = Some(order_id);
        }

        let view = session.view();
        self.sessions.insert(session).await;
        Ok(view)
    }

    pub async fn confirm(&self, session_id: Uuid, card: CardInput) -> Result<SessionView, ApiError> {
        let handle = self
            .sessions
            .get(session_id)
            .await
            .ok_or_else(|| not_found("checkout session"))?;
        let mut session = handle
            .try_lock()
            .map_err(|_| checkout_error(CheckoutError::ConfirmInFlight))?;

        let result = session
            .confirm(self.gateway.as_ref(), card, self.observer.as_ref())
            .await;

        // The ledger follows the gateway even for abandoned sessions; money may
        // have moved. A failed write is left for webhooks and order sync to
        // reconcile, the buyer still sees the approval.
        if let (Ok(outcome), Some(order_id)) = (&result, session.order_id) {
            if let Err(e) = self.ledger.apply_status(order_id, outcome.order_status()).await {
                tracing::error!(
                    session_id = %session_id,
                    order_id = %order_id,
                    payment_id = %outcome.payment_id,
                    "order ledger update failed after gateway approval: {:#}",
                    e
                );
            }
        }

        if !self.sessions.contains(session_id).await {
            tracing::info!(session_id = %session_id, "confirm finished after session was abandoned");
            return Err(not_found("checkout session"));
        }

        match result {
            Ok(_) => Ok(session.view()),
            Err(e) => Err(checkout_error(e)),
        }
    }

    pub async fn get(&self, session_id: Uuid) -> Result<SessionView, ApiError> {
        let handle = self
            .sessions
            .get(session_id)
            .await
            .ok_or_else(|| not_found("checkout session"))?;
        let view = match handle.try_lock() {
            Ok(session) => session.view(),
            Err(_) => SessionView::confirming(session_id),
        };
        Ok(view)
    }

    pub async fn abandon(&self, session_id: Uuid) -> Result<(), ApiError> {
        if self.sessions.abandon(session_id).await {
            Ok(())
        } else {
            Err(not_found("checkout session"))
        }
    }
}

fn validate_customer(customer: &CustomerInfo) -> Result<(), ApiError> {
    let invalid = |msg: &str| api_err(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg);
    if customer.name.trim().is_empty() {
        return Err(invalid("customer name is required"));
    }
    let email = customer.normalized_email();
    if email.is_empty() || !email.contains('@') {
        return Err(invalid("a valid customer email is required"));
    }
    if customer.phone.trim().is_empty() {
        return Err(invalid("customer phone is required"));
    }
    Ok(())
}

pub fn checkout_error(e: CheckoutError) -> ApiError {
    let (status, code) = match &e {
        CheckoutError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        CheckoutError::Gateway { .. } => (StatusCode::PAYMENT_REQUIRED, "GATEWAY_ERROR"),
        CheckoutError::NoIntent => (StatusCode::CONFLICT, "NO_INTENT"),
        CheckoutError::ConfirmInFlight => (StatusCode::CONFLICT, "CONFIRM_IN_FLIGHT"),
        CheckoutError::AlreadyCompleted => (StatusCode::CONFLICT, "ALREADY_COMPLETED"),
        CheckoutError::InvalidState(_) => (StatusCode::CONFLICT, "INVALID_STATE"),
    };
    api_err(status, code, &e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::card_input::CardValidationError;

    #[test]
    fn maps_checkout_errors_to_codes() {
        let (status, body) = checkout_error(CheckoutError::ConfirmInFlight);
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error.code, "CONFIRM_IN_FLIGHT");

        let (status, body) = checkout_error(CheckoutError::Gateway {
            message: "card_declined".to_string(),
        });
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body.error.message, "card_declined");

        let (status, _) = checkout_error(CheckoutError::Validation(CardValidationError::CvvTooShort));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn customer_needs_email_and_phone() {
        let mut customer = CustomerInfo {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: "+55 11 99999-0000".to_string(),
            address: None,
        };
        assert!(validate_customer(&customer).is_ok());
        customer.email = "nope".to_string();
        assert!(validate_customer(&customer).is_err());
    }
}
