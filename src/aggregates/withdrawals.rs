use crate::aggregates::sales::total_revenue_minor;
use crate::domain::order::OrderRecord;
use crate::domain::withdrawal::WithdrawalRecord;
use crate::pricing::money::{exact_minor, from_minor, to_minor};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

pub fn commission_rate() -> Decimal {
    Decimal::new(10, 2)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WithdrawalError {
    #[error("invalid withdrawal amount: requested {requested_minor}, available {available_minor}")]
    InvalidAmount {
        requested_minor: i64,
        available_minor: i64,
    },
    #[error("invalid withdrawal amount: {requested} is not a whole number of cents")]
    FractionalAmount { requested: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithdrawalSummary {
    pub total_revenue_minor: i64,
    pub commission_minor: i64,
    pub withdrawn_minor: i64,
    pub available_balance_minor: i64,
    pub withdrawals: Vec<WithdrawalRecord>,
}

pub fn commission_minor(revenue_minor: i64) -> i64 {
    to_minor(from_minor(revenue_minor) * commission_rate()).unwrap_or(0)
}

pub fn withdrawal_summary(orders: &[OrderRecord], withdrawals: &[WithdrawalRecord]) -> WithdrawalSummary {
    let revenue = total_revenue_minor(orders);
    let commission = commission_minor(revenue);
    let withdrawn: i64 = withdrawals
        .iter()
        .filter(|w| w.status.reserves_balance())
        .map(|w| w.amount_minor)
        .sum();

    let mut listed = withdrawals.to_vec();
    listed.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));

    WithdrawalSummary {
        total_revenue_minor: revenue,
        commission_minor: commission,
        withdrawn_minor: withdrawn,
        available_balance_minor: revenue - commission - withdrawn,
        withdrawals: listed,
    }
}

pub fn checked_withdrawal_minor(amount: Decimal, available_minor: i64) -> Result<i64, WithdrawalError> {
    let requested_minor =
        exact_minor(amount).ok_or(WithdrawalError::FractionalAmount { requested: amount })?;
    check_withdrawal(requested_minor, available_minor)?;
    Ok(requested_minor)
}

pub fn check_withdrawal(requested_minor: i64, available_minor: i64) -> Result<(), WithdrawalError> {
    if requested_minor <= 0 || requested_minor > available_minor {
        return Err(WithdrawalError::InvalidAmount {
            requested_minor,
            available_minor,
        });
    }
    Ok(())
}
