use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

pub const ORDER_RECORDED: &str = "order.recorded";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: i64,
    pub aggregate_id: Uuid,
    pub event_type: String,
    pub payload_json: serde_json::Value,
}

#[derive(Clone)]
pub struct OutboxRepo {
    pub pool: PgPool,
}

impl OutboxRepo {
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        aggregate_id: Uuid,
        event_type: &str,
        payload_json: serde_json::Value,
    ) -> Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO order_events_outbox (aggregate_id, event_type, payload_json, status)
            VALUES ($1, $2, $3, 'PENDING')
            ON CONFLICT (aggregate_id, event_type) DO NOTHING
            "#,
        )
        .bind(aggregate_id)
        .bind(event_type)
        .bind(payload_json)
        .execute(tx.as_mut())
        .await?;

        Ok(res.rows_affected() == 1)
    }

    /// Claims a batch by moving it to PROCESSING. Claimed rows are never handed
    /// out again, so each event is delivered at most once.
    pub async fn lock_pending(&self, batch_size: i64) -> Result<Vec<OutboxEvent>> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query(
            r#"
            SELECT id, aggregate_id, event_type, payload_json
            FROM order_events_outbox
            WHERE status = 'PENDING'
            ORDER BY id ASC
            LIMIT $1
            FOR UPDATE SKIP LOCKED
            "#,
        )
        .bind(batch_size)
        .fetch_all(tx.as_mut())
        .await?;

        if rows.is_empty() {
            tx.rollback().await?;
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.get("id")).collect();
        sqlx::query(
            "UPDATE order_events_outbox SET status = 'PROCESSING', updated_at = now() WHERE id = ANY($1)",
        )
        .bind(&ids)
        .execute(tx.as_mut())
        .await?;

        tx.commit().await?;

        Ok(rows
            .into_iter()
            .map(|r| OutboxEvent {
                id: r.get("id"),
                aggregate_id: r.get("aggregate_id"),
                event_type: r.get("event_type"),
                payload_json: r.get("payload_json"),
            })
            .collect())
    }

    pub async fn mark_published(&self, id: i64) -> Result<()> {
        sqlx::query(
            "UPDATE order_events_outbox SET status='PUBLISHED', published_at=now(), updated_at=now() WHERE id=$1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
