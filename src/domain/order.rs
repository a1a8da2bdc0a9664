use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
    pub line1: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<BillingAddress>,
}

impl CustomerInfo {
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Authorized,
    Paid,
    Failed,
    Canceled,
    Refunded,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderTransitionError {
    #[error("order is in terminal state {0:?}")]
    Terminal(OrderStatus),
    #[error("order cannot move from {from:?} to {to:?}")]
    Backward { from: OrderStatus, to: OrderStatus },
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Authorized => "AUTHORIZED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Failed => "FAILED",
            OrderStatus::Canceled => "CANCELED",
            OrderStatus::Refunded => "REFUNDED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(OrderStatus::Pending),
            "AUTHORIZED" => Some(OrderStatus::Authorized),
            "PAID" => Some(OrderStatus::Paid),
            "FAILED" => Some(OrderStatus::Failed),
            "CANCELED" => Some(OrderStatus::Canceled),
            "REFUNDED" => Some(OrderStatus::Refunded),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Failed | OrderStatus::Canceled | OrderStatus::Refunded
        )
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, OrderStatus::Authorized | OrderStatus::Paid)
    }

    /// Forward-only transition check. `Ok(false)` means the order is already in
    /// `next` and nothing has to be written.
    pub fn transition_to(&self, next: OrderStatus) -> Result<bool, OrderTransitionError> {
        if *self == next {
            return Ok(false);
        }
        if self.is_terminal() {
            return Err(OrderTransitionError::Terminal(*self));
        }

        let allowed = match self {
            OrderStatus::Pending => matches!(
                next,
                OrderStatus::Authorized
                    | OrderStatus::Paid
                    | OrderStatus::Failed
                    | OrderStatus::Canceled
            ),
            OrderStatus::Authorized => matches!(next, OrderStatus::Paid | OrderStatus::Canceled),
            OrderStatus::Paid => matches!(next, OrderStatus::Refunded),
            _ => false,
        };

        if allowed {
            Ok(true)
        } else {
            Err(OrderTransitionError::Backward { from: *self, to: next })
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: Uuid,
    pub seller_id: Uuid,
    pub product_id: Uuid,
    pub product_title: String,
    pub sales_link_id: Option<Uuid>,
    pub payment_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub installments: i16,
    pub customer: CustomerInfo,
    pub coupon_code: Option<String>,
    pub status: OrderStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
