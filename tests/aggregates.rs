use chrono::{Duration, TimeZone, Utc};
use course_checkout::aggregates::customers::customer_summaries;
use course_checkout::aggregates::sales::sales_summary;
use course_checkout::aggregates::withdrawals::{
    check_withdrawal, checked_withdrawal_minor, commission_minor, withdrawal_summary,
    WithdrawalError,
};
use course_checkout::domain::order::{CustomerInfo, OrderRecord, OrderStatus};
use course_checkout::domain::withdrawal::{WithdrawalRecord, WithdrawalStatus};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn product_id(title: &str) -> Uuid {
    Uuid::from_u128(
        title
            .bytes()
            .fold(7u128, |acc, b| acc.wrapping_mul(31).wrapping_add(u128::from(b))),
    )
}

fn order(email: &str, title: &str, amount_minor: i64, status: OrderStatus, day: i64) -> OrderRecord {
    let at = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap() + Duration::days(day);
    OrderRecord {
        order_id: Uuid::new_v4(),
        seller_id: Uuid::nil(),
        product_id: product_id(title),
        product_title: title.to_string(),
        sales_link_id: None,
        payment_id: format!("pi_{}", Uuid::new_v4().simple()),
        amount_minor,
        currency: "BRL".to_string(),
        installments: 1,
        customer: CustomerInfo {
            name: "Ana".to_string(),
            email: email.to_string(),
            phone: "1".to_string(),
            address: None,
        },
        coupon_code: None,
        status,
        created_at: at,
        updated_at: at,
    }
}

fn withdrawal(amount_minor: i64, status: WithdrawalStatus) -> WithdrawalRecord {
    WithdrawalRecord {
        withdrawal_id: Uuid::new_v4(),
        seller_id: Uuid::nil(),
        amount_minor,
        status,
        requested_at: Utc::now(),
    }
}

#[test]
fn customer_with_n_orders_sums_and_is_order_independent() {
    let mut orders = vec![
        order("ana@example.com", "Rust 101", 10000, OrderStatus::Paid, 0),
        order(" ANA@example.com ", "Rust 102", 5000, OrderStatus::Authorized, 3),
        order("ana@example.com", "Rust 101", 2500, OrderStatus::Paid, 7),
    ];

    let forward = customer_summaries(&orders);
    orders.reverse();
    let backward = customer_summaries(&orders);
    assert_eq!(forward, backward);

    assert_eq!(forward.len(), 1);
    let ana = &forward[0];
    assert_eq!(ana.email, "ana@example.com");
    assert_eq!(ana.total_purchases, 3);
    assert_eq!(ana.total_spent_minor, 17500);
    assert_eq!(ana.purchased_products, vec!["Rust 101", "Rust 102"]);
    assert!(ana.join_date < ana.last_purchase);
}

#[test]
fn unsuccessful_orders_do_not_count() {
    let orders = vec![
        order("a@x.com", "Rust 101", 10000, OrderStatus::Pending, 0),
        order("a@x.com", "Rust 101", 10000, OrderStatus::Failed, 1),
        order("b@x.com", "Rust 101", 10000, OrderStatus::Refunded, 2),
    ];
    assert!(customer_summaries(&orders).is_empty());

    let sales = sales_summary(&orders, 10);
    assert_eq!(sales.total_sales, 0);
    assert_eq!(sales.total_revenue_minor, 0);
    assert_eq!(sales.pending_orders, 1);
}

#[test]
fn sales_grouped_by_product_with_recent_first() {
    let orders = vec![
        order("a@x.com", "Rust 101", 10000, OrderStatus::Paid, 0),
        order("b@x.com", "Rust 101", 10000, OrderStatus::Paid, 1),
        order("c@x.com", "Axum Deep Dive", 30000, OrderStatus::Paid, 2),
    ];
    let summary = sales_summary(&orders, 2);

    assert_eq!(summary.total_sales, 3);
    assert_eq!(summary.total_revenue_minor, 50000);
    assert_eq!(summary.by_product[0].product_title, "Axum Deep Dive");
    assert_eq!(summary.by_product[1].sales, 2);
    assert_eq!(summary.recent.len(), 2);
    assert_eq!(summary.recent[0].customer_email, "c@x.com");
}

#[test]
fn commission_rounds_half_up() {
    assert_eq!(commission_minor(10000), 1000);
    assert_eq!(commission_minor(15), 2);
    assert_eq!(commission_minor(14), 1);
}

#[test]
fn available_balance_subtracts_commission_and_reserved_withdrawals() {
    let orders = vec![
        order("a@x.com", "Rust 101", 10000, OrderStatus::Paid, 0),
        order("b@x.com", "Rust 101", 10000, OrderStatus::Authorized, 1),
    ];
    let withdrawals = vec![
        withdrawal(3000, WithdrawalStatus::Completed),
        withdrawal(1000, WithdrawalStatus::Pending),
        withdrawal(9999, WithdrawalStatus::Rejected),
    ];
    let summary = withdrawal_summary(&orders, &withdrawals);

    assert_eq!(summary.total_revenue_minor, 20000);
    assert_eq!(summary.commission_minor, 2000);
    assert_eq!(summary.withdrawn_minor, 4000);
    assert_eq!(summary.available_balance_minor, 14000);
}

#[test]
fn withdrawal_above_available_is_rejected_exact_is_accepted() {
    let available = 14000;
    assert_eq!(
        check_withdrawal(available + 1, available),
        Err(WithdrawalError::InvalidAmount {
            requested_minor: available + 1,
            available_minor: available
        })
    );
    assert_eq!(check_withdrawal(available, available), Ok(()));
    assert!(check_withdrawal(0, available).is_err());
}

#[test]
fn sub_cent_request_over_available_is_not_rounded_into_balance() {
    let available = 14000;
    assert_eq!(
        checked_withdrawal_minor(dec!(140.004), available),
        Err(WithdrawalError::FractionalAmount {
            requested: dec!(140.004)
        })
    );
    assert!(checked_withdrawal_minor(dec!(100.001), available).is_err());
    assert!(checked_withdrawal_minor(dec!(140.01), available).is_err());
    assert_eq!(checked_withdrawal_minor(dec!(140.00), available), Ok(14000));
    assert_eq!(checked_withdrawal_minor(dec!(0.5), available), Ok(50));
}
