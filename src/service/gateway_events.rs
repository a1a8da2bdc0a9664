use crate::domain::error::{api_err, internal, not_found, ApiError};
use crate::domain::order::OrderRecord;
use crate::gateways::{IntentStatus, PaymentGateway};
use crate::repo::orders_repo::OrdersRepo;
use crate::service::order_ledger::{OrderLedger, StatusChange};
use axum::http::StatusCode;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "Gateway-Signature";
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature header is missing t=")]
    MissingTimestamp,
    #[error("signature header is missing v1=")]
    MissingSignature,
    #[error("signature header is malformed")]
    Malformed,
}

/// Checks a `t=<unix>,v1=<hex>` header against HMAC-SHA256 of `"{t}.{payload}"`.
/// `Ok(false)` for a wrong signature or a timestamp outside the tolerance;
/// `Err` when the header cannot be parsed.
pub fn verify_signature(
    secret: &str,
    payload: &[u8],
    header: &str,
    now_unix: i64,
) -> Result<bool, SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", v)) => timestamp = Some(v.parse::<i64>().map_err(|_| SignatureError::Malformed)?),
            Some(("v1", v)) => signatures.push(v.to_string()),
            Some(_) => {}
            None => return Err(SignatureError::Malformed),
        }
    }
    let timestamp = timestamp.ok_or(SignatureError::MissingTimestamp)?;
    if signatures.is_empty() {
        return Err(SignatureError::MissingSignature);
    }

    if (now_unix - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Ok(false);
    }

    for candidate in signatures {
        let Ok(expected) = hex::decode(&candidate) else {
            continue;
        };
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::Malformed)?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        if mac.verify_slice(&expected).is_ok() {
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn sign(secret: &str, payload: &[u8], timestamp: i64) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Some(hex::encode(mac.finalize().into_bytes()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: GatewayEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayEventData {
    pub object: IntentObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntentObject {
    pub id: String,
    pub status: IntentStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSyncResult {
    pub order_id: Option<Uuid>,
    pub gateway_status: String,
    pub order_status: Option<String>,
    pub applied: bool,
}

impl StatusSyncResult {
    fn from_change(order: &OrderRecord, status: IntentStatus, change: Option<StatusChange>) -> Self {
        let (order_status, applied) = match change {
            Some(StatusChange::Applied { to, .. }) => (Some(to.as_str().to_string()), true),
            Some(StatusChange::Unchanged(s)) => (Some(s.as_str().to_string()), false),
            Some(StatusChange::Ignored(_)) | None => (Some(order.status.as_str().to_string()), false),
        };
        Self {
            order_id: Some(order.order_id),
            gateway_status: status.into(),
            order_status,
            applied,
        }
    }
}

#[derive(Clone)]
pub struct GatewayEventsService {
    pub webhook_secret: String,
    pub gateway: Arc<dyn PaymentGateway>,
    pub orders_repo: OrdersRepo,
    pub ledger: OrderLedger,
}

impl GatewayEventsService {
    pub async fn handle_webhook(
        &self,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<StatusSyncResult, ApiError> {
        let unauthorized = || api_err(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "invalid webhook signature");
        let header = signature.ok_or_else(unauthorized)?;
        let valid = verify_signature(&self.webhook_secret, body, header, chrono::Utc::now().timestamp())
            .map_err(|e| api_err(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", &e.to_string()))?;
        if !valid {
            tracing::warn!("gateway webhook rejected: bad signature");
            return Err(unauthorized());
        }

        let event: GatewayEvent = serde_json::from_slice(body)
            .map_err(|e| api_err(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", &e.to_string()))?;
        tracing::info!(event_id = %event.id, event_type = %event.event_type, "gateway webhook received");

        let intent = event.data.object;
        let Some(order) = self
            .orders_repo
            .find_by_payment_id(&intent.id)
            .await
            .map_err(internal)?
        else {
            // Intents created outside this system are acknowledged and dropped.
            tracing::info!(payment_id = %intent.id, "webhook for unknown payment intent");
            return Ok(StatusSyncResult {
                order_id: None,
                gateway_status: intent.status.into(),
                order_status: None,
                applied: false,
            });
        };

        let change = self
            .ledger
            .apply_intent_status(order.order_id, &intent.status)
            .await
            .map_err(internal)?;
        Ok(StatusSyncResult::from_change(&order, intent.status, change))
    }

    pub async fn sync_order(&self, seller_id: Uuid, order_id: Uuid) -> Result<StatusSyncResult, ApiError> {
        let order = self
            .orders_repo
            .find_by_id(order_id)
            .await
            .map_err(internal)?
            .filter(|o| o.seller_id == seller_id)
            .ok_or_else(|| not_found("order"))?;

        let status = self.gateway.fetch_status(&order.payment_id).await.map_err(|e| {
            tracing::warn!(order_id = %order_id, "status poll failed: {}", e);
            api_err(
                StatusCode::BAD_GATEWAY,
                "GATEWAY_ERROR",
                e.gateway_message().unwrap_or("payment gateway unavailable"),
            )
        })?;

        let change = self
            .ledger
            .apply_intent_status(order.order_id, &status)
            .await
            .map_err(internal)?;
        Ok(StatusSyncResult::from_change(&order, status, change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";

    #[test]
    fn accepts_fresh_valid_signature() {
        let body = br#"{"id":"evt_1"}"#;
        let sig = sign(SECRET, body, 1_700_000_000).unwrap();
        let header = format!("t=1700000000,v1={}", sig);
        assert_eq!(verify_signature(SECRET, body, &header, 1_700_000_100), Ok(true));
    }

    #[test]
    fn rejects_tampered_body_and_stale_timestamp() {
        let sig = sign(SECRET, b"original", 1_700_000_000).unwrap();
        let header = format!("t=1700000000,v1={}", sig);
        assert_eq!(verify_signature(SECRET, b"modified", &header, 1_700_000_000), Ok(false));
        assert_eq!(verify_signature(SECRET, b"original", &header, 1_700_000_301), Ok(false));
    }

    #[test]
    fn malformed_headers_error() {
        assert_eq!(
            verify_signature(SECRET, b"x", "v1=abc", 0),
            Err(SignatureError::MissingTimestamp)
        );
        assert_eq!(
            verify_signature(SECRET, b"x", "t=1", 0),
            Err(SignatureError::MissingSignature)
        );
        assert_eq!(verify_signature(SECRET, b"x", "garbage", 0), Err(SignatureError::Malformed));
        assert_eq!(verify_signature(SECRET, b"x", "", 0), Err(SignatureError::Malformed));
    }

    #[test]
    fn parses_intent_event() {
        let body = r#"{"id":"evt_1","type":"payment_intent.succeeded","data":{"object":{"id":"pi_1","status":"succeeded"}}}"#;
        let event: GatewayEvent = serde_json::from_str(body).unwrap();
        assert_eq!(event.data.object.status, IntentStatus::Succeeded);
    }
}
