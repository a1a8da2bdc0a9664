use crate::gateways::{
    ConfirmIntentRequest, ConfirmResponse, CreateIntentRequest, GatewayError, IntentStatus,
    PaymentErrorDetail, PaymentGateway, PaymentIntent,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockBehavior {
    AlwaysSucceed,
    RequireCapture,
    Decline(String),
    IntentFailure(String),
}

impl MockBehavior {
    pub fn parse(s: &str) -> Self {
        match s {
            "REQUIRES_CAPTURE" => MockBehavior::RequireCapture,
            "ALWAYS_DECLINE" => MockBehavior::Decline("card_declined".to_string()),
            "INTENT_FAILURE" => MockBehavior::IntentFailure("gateway unavailable".to_string()),
            _ => MockBehavior::AlwaysSucceed,
        }
    }
}

pub struct MockGateway {
    behavior: MockBehavior,
    script: Mutex<VecDeque<Result<ConfirmResponse, GatewayError>>>,
    confirm_delay: Option<Duration>,
    create_calls: AtomicUsize,
    confirm_calls: AtomicUsize,
    idempotency_keys: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            script: Mutex::new(VecDeque::new()),
            confirm_delay: None,
            create_calls: AtomicUsize::new(0),
            confirm_calls: AtomicUsize::new(0),
            idempotency_keys: Mutex::new(Vec::new()),
        }
    }

    pub fn with_script(self, responses: Vec<Result<ConfirmResponse, GatewayError>>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            ..self
        }
    }

    pub fn with_confirm_delay(self, delay: Duration) -> Self {
        Self {
            confirm_delay: Some(delay),
            ..self
        }
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn confirm_calls(&self) -> usize {
        self.confirm_calls.load(Ordering::SeqCst)
    }

    pub fn idempotency_keys(&self) -> Vec<String> {
        self.idempotency_keys
            .lock()
            .map(|k| k.clone())
            .unwrap_or_default()
    }

    fn default_confirm(&self) -> Result<ConfirmResponse, GatewayError> {
        match &self.behavior {
            MockBehavior::AlwaysSucceed | MockBehavior::IntentFailure(_) => Ok(ConfirmResponse {
                status: IntentStatus::Succeeded,
                last_payment_error: None,
            }),
            MockBehavior::RequireCapture => Ok(ConfirmResponse {
                status: IntentStatus::RequiresCapture,
                last_payment_error: None,
            }),
            MockBehavior::Decline(message) => Ok(ConfirmResponse {
                status: IntentStatus::Other("requires_payment_method".to_string()),
                last_payment_error: Some(PaymentErrorDetail {
                    message: Some(message.clone()),
                    code: Some("card_declined".to_string()),
                }),
            }),
        }
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_intent(&self, _request: CreateIntentRequest) -> Result<PaymentIntent, GatewayError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let MockBehavior::IntentFailure(message) = &self.behavior {
            return Err(GatewayError::Rejected {
                status: 503,
                message: Some(message.clone()),
            });
        }

        let id = uuid::Uuid::new_v4().simple().to_string();
        Ok(PaymentIntent {
            payment_id: format!("pi_mock_{}", id),
            client_secret: format!("pi_mock_{}_secret", id),
            publishable_key: "pk_mock".to_string(),
        })
    }

    async fn confirm(&self, request: ConfirmIntentRequest) -> Result<ConfirmResponse, GatewayError> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut keys) = self.idempotency_keys.lock() {
            keys.push(request.idempotency_key.clone());
        }
        if let Some(delay) = self.confirm_delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        scripted.unwrap_or_else(|| self.default_confirm())
    }

    async fn fetch_status(&self, _payment_id: &str) -> Result<IntentStatus, GatewayError> {
        self.default_confirm().map(|r| r.status)
    }
}
