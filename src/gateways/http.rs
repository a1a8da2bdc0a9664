use crate::gateways::{
    ConfirmIntentRequest, ConfirmResponse, CreateIntentRequest, GatewayError, IntentStatus,
    PaymentGateway, PaymentIntent,
};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub struct HttpGateway {
    pub base_url: String,
    pub secret_key: String,
    pub publishable_key: String,
    pub timeout_ms: u64,
    pub transport_retries: u32,
    pub client: reqwest::Client,
}

#[derive(Deserialize)]
struct IntentCreatedBody {
    id: String,
    client_secret: String,
}

#[derive(Deserialize)]
struct IntentStatusBody {
    status: IntentStatus,
}

impl HttpGateway {
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        idempotency_key: &str,
    ) -> Result<serde_json::Value, GatewayError> {
        let request = request
            .basic_auth(&self.secret_key, Some(""))
            .header("Idempotency-Key", idempotency_key)
            .timeout(Duration::from_millis(self.timeout_ms));

        let mut attempt = 0u32;
        loop {
            let current = request
                .try_clone()
                .ok_or_else(|| GatewayError::Transport("request is not replayable".to_string()))?;

            match current.send().await {
                Ok(resp) => return decode(resp).await,
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt < self.transport_retries => {
                    attempt += 1;
                    tracing::warn!(attempt, "gateway transport error, replaying: {}", e);
                    tokio::time::sleep(Duration::from_millis(100 * 2_u64.pow(attempt))).await;
                }
                Err(e) if e.is_timeout() => return Err(GatewayError::Timeout),
                Err(e) => return Err(GatewayError::Transport(e.to_string())),
            }
        }
    }
}

async fn decode(resp: reqwest::Response) -> Result<serde_json::Value, GatewayError> {
    let status = resp.status();
    if status.is_success() {
        return resp
            .json::<serde_json::Value>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()));
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| extract_error_message(&v));
    Err(GatewayError::Rejected {
        status: status.as_u16(),
        message,
    })
}

pub fn extract_error_message(body: &serde_json::Value) -> Option<String> {
    ["last_payment_error", "error"]
        .iter()
        .filter_map(|key| body.get(key))
        .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(ToString::to_string)
}

#[async_trait::async_trait]
impl PaymentGateway for HttpGateway {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn create_intent(&self, request: CreateIntentRequest) -> Result<PaymentIntent, GatewayError> {
        let url = format!("{}/v1/payment_intents", self.base_url);
        let body = json!({
            "amount": request.amount_minor,
            "currency": request.currency.to_lowercase(),
            "capture_method": "automatic",
            "metadata": {
                "product_id": request.product_id,
                "customer_email": request.customer.email,
            },
            "customer": request.customer,
        });

        let idempotency_key = format!("create:{}", uuid::Uuid::new_v4());
        let value = self
            .execute(self.client.post(url).json(&body), &idempotency_key)
            .await?;
        let created: IntentCreatedBody =
            serde_json::from_value(value).map_err(|e| GatewayError::Decode(e.to_string()))?;

        Ok(PaymentIntent {
            payment_id: created.id,
            client_secret: created.client_secret,
            publishable_key: self.publishable_key.clone(),
        })
    }

    async fn confirm(&self, request: ConfirmIntentRequest) -> Result<ConfirmResponse, GatewayError> {
        let url = format!(
            "{}/v1/payment_intents/{}/confirm",
            self.base_url, request.payment_id
        );
        let value = self
            .execute(self.client.post(url).json(&request), &request.idempotency_key)
            .await?;
        serde_json::from_value(value).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn fetch_status(&self, payment_id: &str) -> Result<IntentStatus, GatewayError> {
        let url = format!("{}/v1/payment_intents/{}", self.base_url, payment_id);
        let key = format!("status:{}", payment_id);
        let value = self.execute(self.client.get(url), &key).await?;
        let body: IntentStatusBody =
            serde_json::from_value(value).map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(body.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_last_payment_error_message() {
        let body = json!({
            "last_payment_error": {"message": "card_declined"},
            "error": {"message": "generic"}
        });
        assert_eq!(extract_error_message(&body).as_deref(), Some("card_declined"));
    }

    #[test]
    fn falls_back_to_error_message() {
        let body = json!({"error": {"message": "insufficient_funds"}});
        assert_eq!(
            extract_error_message(&body).as_deref(),
            Some("insufficient_funds")
        );
        assert_eq!(extract_error_message(&json!({"error": {"message": " "}})), None);
    }
}
