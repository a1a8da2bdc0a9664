use crate::domain::order::{OrderRecord, OrderStatus};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSales {
    pub product_id: Uuid,
    pub product_title: String,
    pub sales: u64,
    pub revenue_minor: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentSale {
    pub order_id: Uuid,
    pub product_title: String,
    pub customer_name: String,
    pub customer_email: String,
    pub amount_minor: i64,
    pub installments: i16,
    pub status: OrderStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesSummary {
    pub total_sales: u64,
    pub total_revenue_minor: i64,
    pub pending_orders: u64,
    pub by_product: Vec<ProductSales>,
    pub recent: Vec<RecentSale>,
}

pub fn total_revenue_minor(orders: &[OrderRecord]) -> i64 {
    orders
        .iter()
        .filter(|o| o.status.is_successful())
        .map(|o| o.amount_minor)
        .sum()
}

pub fn sales_summary(orders: &[OrderRecord], recent_limit: usize) -> SalesSummary {
    let mut by_product: BTreeMap<Uuid, ProductSales> = BTreeMap::new();
    let mut successful: Vec<&OrderRecord> = Vec::new();

    for order in orders.iter().filter(|o| o.status.is_successful()) {
        let entry = by_product.entry(order.product_id).or_insert_with(|| ProductSales {
            product_id: order.product_id,
            product_title: order.product_title.clone(),
            sales: 0,
            revenue_minor: 0,
        });
        entry.sales += 1;
        entry.revenue_minor += order.amount_minor;
        successful.push(order);
    }

    successful.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.order_id.cmp(&b.order_id))
    });

    let mut by_product: Vec<ProductSales> = by_product.into_values().collect();
    by_product.sort_by(|a, b| {
        b.revenue_minor
            .cmp(&a.revenue_minor)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });

    SalesSummary {
        total_sales: successful.len() as u64,
        total_revenue_minor: successful.iter().map(|o| o.amount_minor).sum(),
        pending_orders: orders
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .count() as u64,
        by_product,
        recent: successful
            .into_iter()
            .take(recent_limit)
            .map(|o| RecentSale {
                order_id: o.order_id,
                product_title: o.product_title.clone(),
                customer_name: o.customer.name.clone(),
                customer_email: o.customer.email.clone(),
                amount_minor: o.amount_minor,
                installments: o.installments,
                status: o.status,
                created_at: o.created_at,
            })
            .collect(),
    }
}
