use crate::domain::withdrawal::{WithdrawalRecord, WithdrawalStatus};
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, Postgres, Row, Transaction};
use uuid::Uuid;

macro_rules! withdrawal_columns {
    () => {
        "withdrawal_id, seller_id, amount_minor, status, requested_at"
    };
}

const WITHDRAWAL_COLUMNS: &str = withdrawal_columns!();
const LIST_FOR_SELLER_SQL: &str = concat!(
    "SELECT ",
    withdrawal_columns!(),
    " FROM withdrawals WHERE seller_id = $1 ORDER BY requested_at ASC"
);

fn to_withdrawal(r: PgRow) -> WithdrawalRecord {
    WithdrawalRecord {
        withdrawal_id: r.get("withdrawal_id"),
        seller_id: r.get("seller_id"),
        amount_minor: r.get("amount_minor"),
        status: WithdrawalStatus::parse(r.get::<String, _>("status").as_str()),
        requested_at: r.get("requested_at"),
    }
}

pub struct WithdrawalsRepo;

impl WithdrawalsRepo {
    pub async fn list_for_seller<'e, E>(executor: E, seller_id: Uuid) -> Result<Vec<WithdrawalRecord>>
    where
        E: PgExecutor<'e>,
    {
        let rows = sqlx::query(LIST_FOR_SELLER_SQL)
            .bind(seller_id)
            .fetch_all(executor)
            .await?;

        Ok(rows.into_iter().map(to_withdrawal).collect())
    }

    pub async fn lock_seller_tx(tx: &mut Transaction<'_, Postgres>, seller_id: Uuid) -> Result<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(seller_id.to_string())
            .execute(tx.as_mut())
            .await?;
        Ok(())
    }

    pub async fn insert_pending_tx(
        tx: &mut Transaction<'_, Postgres>,
        seller_id: Uuid,
        amount_minor: i64,
    ) -> Result<WithdrawalRecord> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO withdrawals (withdrawal_id, seller_id, amount_minor, status)
            VALUES ($1, $2, $3, 'PENDING')
            RETURNING {WITHDRAWAL_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(seller_id)
        .bind(amount_minor)
        .fetch_one(tx.as_mut())
        .await?;

        Ok(to_withdrawal(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seller_listing_selects_shared_columns() {
        assert!(LIST_FOR_SELLER_SQL.contains(WITHDRAWAL_COLUMNS));
        assert!(LIST_FOR_SELLER_SQL.ends_with("WHERE seller_id = $1 ORDER BY requested_at ASC"));
    }
}
