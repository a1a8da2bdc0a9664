use crate::domain::order::OrderRecord;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerSummary {
    pub email: String,
    pub name: String,
    pub total_purchases: u64,
    pub total_spent_minor: i64,
    pub last_purchase: chrono::DateTime<chrono::Utc>,
    pub join_date: chrono::DateTime<chrono::Utc>,
    pub purchased_products: Vec<String>,
}

struct Acc {
    name: String,
    name_seen_at: chrono::DateTime<chrono::Utc>,
    total_purchases: u64,
    total_spent_minor: i64,
    last_purchase: chrono::DateTime<chrono::Utc>,
    join_date: chrono::DateTime<chrono::Utc>,
    products: BTreeSet<String>,
}

pub fn customer_summaries(orders: &[OrderRecord]) -> Vec<CustomerSummary> {
    let mut by_email: BTreeMap<String, Acc> = BTreeMap::new();

    for order in orders.iter().filter(|o| o.status.is_successful()) {
        let email = order.customer.normalized_email();
        let at = order.created_at;
        let acc = by_email.entry(email).or_insert_with(|| Acc {
            name: order.customer.name.clone(),
            name_seen_at: at,
            total_purchases: 0,
            total_spent_minor: 0,
            last_purchase: at,
            join_date: at,
            products: BTreeSet::new(),
        });

        acc.total_purchases += 1;
        acc.total_spent_minor += order.amount_minor;
        acc.last_purchase = acc.last_purchase.max(at);
        acc.join_date = acc.join_date.min(at);
        acc.products.insert(order.product_title.clone());
        if at > acc.name_seen_at || (at == acc.name_seen_at && order.customer.name < acc.name) {
            acc.name = order.customer.name.clone();
            acc.name_seen_at = at;
        }
    }

    by_email
        .into_iter()
        .map(|(email, acc)| CustomerSummary {
            email,
            name: acc.name,
            total_purchases: acc.total_purchases,
            total_spent_minor: acc.total_spent_minor,
            last_purchase: acc.last_purchase,
            join_date: acc.join_date,
            purchased_products: acc.products.into_iter().collect(),
        })
        .collect()
}
