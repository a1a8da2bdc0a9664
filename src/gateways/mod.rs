use crate::domain::card::PaymentMethodPayload;
use crate::domain::order::CustomerInfo;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod http;
pub mod mock;

#[derive(Debug, Clone, Serialize)]
pub struct CreateIntentRequest {
    pub amount_minor: i64,
    pub currency: String,
    pub product_id: Uuid,
    pub customer: CustomerInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub payment_id: String,
    pub client_secret: String,
    pub publishable_key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmIntentRequest {
    pub payment_id: String,
    pub payment_method: PaymentMethodPayload,
    pub product_id: Uuid,
    pub customer: CustomerInfo,
    pub amount_minor: i64,
    pub coupon_code: Option<String>,
    #[serde(skip)]
    pub idempotency_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IntentStatus {
    Succeeded,
    RequiresCapture,
    Canceled,
    PaymentFailed,
    Refunded,
    Other(String),
}

impl From<String> for IntentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "succeeded" => IntentStatus::Succeeded,
            "requires_capture" => IntentStatus::RequiresCapture,
            "canceled" => IntentStatus::Canceled,
            "payment_failed" => IntentStatus::PaymentFailed,
            "refunded" => IntentStatus::Refunded,
            _ => IntentStatus::Other(s),
        }
    }
}

impl From<IntentStatus> for String {
    fn from(s: IntentStatus) -> Self {
        match s {
            IntentStatus::Succeeded => "succeeded".to_string(),
            IntentStatus::RequiresCapture => "requires_capture".to_string(),
            IntentStatus::Canceled => "canceled".to_string(),
            IntentStatus::PaymentFailed => "payment_failed".to_string(),
            IntentStatus::Refunded => "refunded".to_string(),
            IntentStatus::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentErrorDetail {
    pub message: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmResponse {
    pub status: IntentStatus,
    #[serde(default)]
    pub last_payment_error: Option<PaymentErrorDetail>,
}

impl ConfirmResponse {
    pub fn error_message(&self) -> Option<&str> {
        self.last_payment_error
            .as_ref()
            .and_then(|e| e.message.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("gateway unreachable: {0}")]
    Transport(String),
    #[error("gateway timed out")]
    Timeout,
    #[error("gateway rejected request (HTTP {status})")]
    Rejected { status: u16, message: Option<String> },
    #[error("unexpected gateway response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn gateway_message(&self) -> Option<&str> {
        match self {
            GatewayError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::Transport(_) | GatewayError::Timeout)
    }
}

#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_intent(&self, request: CreateIntentRequest) -> Result<PaymentIntent, GatewayError>;

    async fn confirm(&self, request: ConfirmIntentRequest) -> Result<ConfirmResponse, GatewayError>;

    async fn fetch_status(&self, payment_id: &str) -> Result<IntentStatus, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_is_preserved() {
        let r: ConfirmResponse =
            serde_json::from_str(r#"{"status":"requires_action"}"#).unwrap();
        assert_eq!(r.status, IntentStatus::Other("requires_action".to_string()));
        assert_eq!(r.error_message(), None);
    }

    #[test]
    fn decodes_last_payment_error() {
        let r: ConfirmResponse = serde_json::from_str(
            r#"{"status":"requires_payment_method","last_payment_error":{"message":"card_declined","code":null}}"#,
        )
        .unwrap();
        assert_eq!(r.error_message(), Some("card_declined"));
    }

    #[test]
    fn known_statuses_round_trip_as_strings() {
        let s = serde_json::to_string(&IntentStatus::RequiresCapture).unwrap();
        assert_eq!(s, "\"requires_capture\"");
    }
}
