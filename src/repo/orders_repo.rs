use crate::domain::order::{BillingAddress, CustomerInfo, OrderRecord, OrderStatus};
use anyhow::{anyhow, Result};
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrdersRepo {
    pub pool: PgPool,
}

pub struct NewOrder<'a> {
    pub seller_id: Uuid,
    pub product_id: Uuid,
    pub product_title: &'a str,
    pub sales_link_id: Option<Uuid>,
    pub payment_id: &'a str,
    pub amount_minor: i64,
    pub currency: &'a str,
    pub installments: i16,
    pub customer: &'a CustomerInfo,
    pub coupon_code: Option<&'a str>,
}

// Macro form so `concat!` can build `'static` SQL for generic executors.
macro_rules! order_columns {
    () => {
        r#"
    order_id, seller_id, product_id, product_title, sales_link_id, payment_id,
    amount_minor, currency, installments, customer_name, customer_email, customer_phone,
    customer_address, coupon_code, status, created_at, updated_at
"#
    };
}

const ORDER_COLUMNS: &str = order_columns!();
const LIST_FOR_SELLER_SQL: &str = concat!(
    "SELECT ",
    order_columns!(),
    " FROM orders WHERE seller_id = $1 ORDER BY created_at ASC"
);

fn to_order(r: PgRow) -> Result<OrderRecord> {
    let status: String = r.get("status");
    let address: Option<serde_json::Value> = r.get("customer_address");
    let address = address
        .map(serde_json::from_value::<BillingAddress>)
        .transpose()?;

    Ok(OrderRecord {
        order_id: r.get("order_id"),
        seller_id: r.get("seller_id"),
        product_id: r.get("product_id"),
        product_title: r.get("product_title"),
        sales_link_id: r.get("sales_link_id"),
        payment_id: r.get("payment_id"),
        amount_minor: r.get("amount_minor"),
        currency: r.get("currency"),
        installments: r.get("installments"),
        customer: CustomerInfo {
            name: r.get("customer_name"),
            email: r.get("customer_email"),
            phone: r.get("customer_phone"),
            address,
        },
        coupon_code: r.get("coupon_code"),
        status: OrderStatus::parse(&status).ok_or_else(|| anyhow!("unknown order status {}", status))?,
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

impl OrdersRepo {
    pub async fn insert_pending(&self, order: &NewOrder<'_>) -> Result<Uuid> {
        let order_id = Uuid::new_v4();
        let address = order
            .customer
            .address
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                order_id, seller_id, product_id, product_title, sales_link_id, payment_id,
                amount_minor, currency, installments, customer_name, customer_email,
                customer_phone, customer_address, coupon_code, status
            ) VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, $8, $9, $10, $11,
                $12, $13, $14, 'PENDING'
            )
            "#,
        )
        .bind(order_id)
        .bind(order.seller_id)
        .bind(order.product_id)
        .bind(order.product_title)
        .bind(order.sales_link_id)
        .bind(order.payment_id)
        .bind(order.amount_minor)
        .bind(order.currency)
        .bind(order.installments)
        .bind(&order.customer.name)
        .bind(order.customer.normalized_email())
        .bind(&order.customer.phone)
        .bind(address)
        .bind(order.coupon_code)
        .execute(&self.pool)
        .await?;

        Ok(order_id)
    }

    pub async fn list_for_seller<'e, E>(executor: E, seller_id: Uuid) -> Result<Vec<OrderRecord>>
    where
        E: PgExecutor<'e>,
    {
        let rows = sqlx::query(LIST_FOR_SELLER_SQL)
            .bind(seller_id)
            .fetch_all(executor)
            .await?;

        rows.into_iter().map(to_order).collect()
    }

    pub async fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderRecord>> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1"))
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(to_order).transpose()
    }

    pub async fn find_by_payment_id(&self, payment_id: &str) -> Result<Option<OrderRecord>> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE payment_id = $1"))
            .bind(payment_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(to_order).transpose()
    }

    pub async fn lock_tx(
        tx: &mut Transaction<'_, Postgres>,
        order_id: Uuid,
    ) -> Result<Option<OrderRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1 FOR UPDATE"
        ))
        .bind(order_id)
        .fetch_optional(tx.as_mut())
        .await?;

        row.map(to_order).transpose()
    }

    pub async fn update_status_tx(
        tx: &mut Transaction<'_, Postgres>,
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE orders SET status = $3, updated_at = now() WHERE order_id = $1 AND status = $2",
        )
        .bind(order_id)
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(tx.as_mut())
        .await?;

        Ok(res.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seller_listing_selects_shared_columns() {
        assert!(LIST_FOR_SELLER_SQL.contains(ORDER_COLUMNS));
        assert!(LIST_FOR_SELLER_SQL.ends_with("WHERE seller_id = $1 ORDER BY created_at ASC"));
    }
}
