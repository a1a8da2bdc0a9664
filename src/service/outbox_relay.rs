use crate::repo::outbox_repo::{OutboxEvent, OutboxRepo, ORDER_RECORDED};
use crate::repo::sellers_repo::SellersRepo;
use crate::service::notification_dispatcher::{Notification, NotificationDispatcher};
use anyhow::Result;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct SalePayload {
    seller_id: Uuid,
    product_title: String,
    customer_name: String,
    amount_minor: i64,
    currency: String,
}

#[derive(Clone)]
pub struct OutboxRelay {
    pub outbox_repo: OutboxRepo,
    pub sellers_repo: SellersRepo,
    pub notifications: NotificationDispatcher,
    pub poll_interval: std::time::Duration,
}

impl OutboxRelay {
    pub async fn run(self) {
        loop {
            if let Err(err) = self.tick().await {
                tracing::error!("outbox relay error: {}", err);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    pub async fn tick(&self) -> Result<usize> {
        let batch = self.outbox_repo.lock_pending(100).await?;
        let count = batch.len();
        for item in batch {
            if let Err(e) = self.dispatch(&item).await {
                tracing::warn!(outbox_id = item.id, event_type = %item.event_type, "outbox dispatch failed: {}", e);
            }
            self.outbox_repo.mark_published(item.id).await?;
        }
        Ok(count)
    }

    async fn dispatch(&self, item: &OutboxEvent) -> Result<()> {
        if item.event_type != ORDER_RECORDED {
            tracing::debug!(event_type = %item.event_type, "no handler for outbox event");
            return Ok(());
        }

        let sale: SalePayload = serde_json::from_value(item.payload_json.clone())?;
        let Some(seller) = self.sellers_repo.find_by_id(sale.seller_id).await? else {
            tracing::warn!(seller_id = %sale.seller_id, "sale recorded for unknown seller");
            return Ok(());
        };

        self.notifications
            .send(Notification::SaleNotification {
                to: seller.email,
                seller_name: seller.name,
                product_title: sale.product_title,
                customer_name: sale.customer_name,
                amount_minor: sale.amount_minor,
                currency: sale.currency,
            })
            .await;
        Ok(())
    }
}
