use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalStatus {
    Pending,
    Completed,
    Rejected,
}

impl WithdrawalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalStatus::Pending => "PENDING",
            WithdrawalStatus::Completed => "COMPLETED",
            WithdrawalStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "COMPLETED" => WithdrawalStatus::Completed,
            "REJECTED" => WithdrawalStatus::Rejected,
            _ => WithdrawalStatus::Pending,
        }
    }

    pub fn reserves_balance(&self) -> bool {
        matches!(self, WithdrawalStatus::Pending | WithdrawalStatus::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRecord {
    pub withdrawal_id: Uuid,
    pub seller_id: Uuid,
    pub amount_minor: i64,
    pub status: WithdrawalStatus,
    pub requested_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalRequest {
    pub amount: Decimal,
}
