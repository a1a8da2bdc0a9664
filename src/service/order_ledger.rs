use crate::domain::order::{OrderRecord, OrderStatus, OrderTransitionError};
use crate::gateways::IntentStatus;
use crate::repo::orders_repo::OrdersRepo;
use crate::repo::outbox_repo::{OutboxRepo, ORDER_RECORDED};
use anyhow::Result;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    Applied { from: OrderStatus, to: OrderStatus },
    Unchanged(OrderStatus),
    Ignored(OrderTransitionError),
}

pub fn order_status_for(status: &IntentStatus) -> Option<OrderStatus> {
    match status {
        IntentStatus::Succeeded => Some(OrderStatus::Paid),
        IntentStatus::RequiresCapture => Some(OrderStatus::Authorized),
        IntentStatus::Canceled => Some(OrderStatus::Canceled),
        IntentStatus::PaymentFailed => Some(OrderStatus::Failed),
        IntentStatus::Refunded => Some(OrderStatus::Refunded),
        IntentStatus::Other(_) => None,
    }
}

pub fn sale_payload(order: &OrderRecord) -> serde_json::Value {
    json!({
        "order_id": order.order_id,
        "seller_id": order.seller_id,
        "product_id": order.product_id,
        "product_title": order.product_title,
        "customer_name": order.customer.name,
        "amount_minor": order.amount_minor,
        "currency": order.currency,
    })
}

/// Single writer for order status. Every change goes through one locked
/// transaction, and the first move into a successful status writes the
/// `order.recorded` outbox event in that same transaction.
#[derive(Clone)]
pub struct OrderLedger {
    pub pool: PgPool,
}

impl OrderLedger {
    pub async fn apply_status(&self, order_id: Uuid, next: OrderStatus) -> Result<Option<StatusChange>> {
        let mut tx = self.pool.begin().await?;

        let Some(order) = OrdersRepo::lock_tx(&mut tx, order_id).await? else {
            tx.rollback().await?;
            return Ok(None);
        };

        let change = match order.status.transition_to(next) {
            Err(e) => {
                tracing::warn!(order_id = %order_id, "order transition ignored: {}", e);
                StatusChange::Ignored(e)
            }
            Ok(false) => StatusChange::Unchanged(order.status),
            Ok(true) => {
                OrdersRepo::update_status_tx(&mut tx, order_id, order.status, next).await?;
                if next.is_successful() && !order.status.is_successful() {
                    OutboxRepo::insert_tx(&mut tx, order_id, ORDER_RECORDED, sale_payload(&order)).await?;
                }
                tracing::info!(
                    order_id = %order_id,
                    from = order.status.as_str(),
                    to = next.as_str(),
                    "order status changed"
                );
                StatusChange::Applied {
                    from: order.status,
                    to: next,
                }
            }
        };

        tx.commit().await?;
        Ok(Some(change))
    }

    pub async fn apply_intent_status(
        &self,
        order_id: Uuid,
        status: &IntentStatus,
    ) -> Result<Option<StatusChange>> {
        match order_status_for(status) {
            Some(next) => self.apply_status(order_id, next).await,
            None => {
                tracing::info!(order_id = %order_id, status = ?status, "intent status carries no order change");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_gateway_statuses() {
        assert_eq!(order_status_for(&IntentStatus::Succeeded), Some(OrderStatus::Paid));
        assert_eq!(
            order_status_for(&IntentStatus::RequiresCapture),
            Some(OrderStatus::Authorized)
        );
        assert_eq!(order_status_for(&IntentStatus::Refunded), Some(OrderStatus::Refunded));
        assert_eq!(
            order_status_for(&IntentStatus::Other("requires_action".to_string())),
            None
        );
    }
}
