use crate::checkout::card_input::CardInput;
use crate::checkout::orchestrator::{
    CheckoutContext, CheckoutError, CheckoutObserver, CheckoutState, PaymentOrchestrator,
    PaymentOutcome,
};
use crate::domain::order::CustomerInfo;
use crate::gateways::PaymentGateway;
use crate::pricing::installments::InstallmentQuote;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

const SUCCESS_MESSAGE: &str = "Payment approved. Check your inbox for access details.";
const PENDING_CAPTURE_MESSAGE: &str = "Payment authorized. You will receive a confirmation shortly.";

#[derive(Debug, Clone, Deserialize)]
pub struct OpenSessionRequest {
    pub link_token: Option<String>,
    pub slug: Option<String>,
    pub customer: CustomerInfo,
    pub coupon_code: Option<String>,
    #[serde(default = "one")]
    pub installments: u8,
}

fn one() -> u8 {
    1
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionItem {
    pub product_id: Uuid,
    pub seller_id: Uuid,
    pub sales_link_id: Option<Uuid>,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub state: CheckoutState,
    pub busy: bool,
    pub submit_enabled: bool,
    pub message: Option<String>,
    pub item: Option<SessionItem>,
    pub quote: Option<InstallmentQuote>,
    pub payment_id: Option<String>,
    pub client_secret: Option<String>,
    pub publishable_key: Option<String>,
    pub outcome: Option<PaymentOutcome>,
}

impl SessionView {
    pub fn confirming(session_id: Uuid) -> Self {
        Self {
            session_id,
            state: CheckoutState::Confirming,
            busy: true,
            submit_enabled: false,
            message: None,
            item: None,
            quote: None,
            payment_id: None,
            client_secret: None,
            publishable_key: None,
            outcome: None,
        }
    }
}

pub struct CheckoutSession {
    pub session_id: Uuid,
    pub item: SessionItem,
    pub quote: InstallmentQuote,
    pub order_id: Option<Uuid>,
    orchestrator: PaymentOrchestrator,
    message: Option<String>,
    outcome: Option<PaymentOutcome>,
}

impl CheckoutSession {
    pub fn new(
        item: SessionItem,
        quote: InstallmentQuote,
        currency: &str,
        customer: CustomerInfo,
        coupon_code: Option<String>,
    ) -> Self {
        let coupon_code = coupon_code
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty());
        let context = CheckoutContext {
            amount_minor: quote.total_minor,
            currency: currency.to_string(),
            product_id: item.product_id,
            customer,
            coupon_code,
        };
        Self {
            session_id: Uuid::new_v4(),
            item,
            quote,
            order_id: None,
            orchestrator: PaymentOrchestrator::new(context),
            message: None,
            outcome: None,
        }
    }

    pub fn state(&self) -> &CheckoutState {
        self.orchestrator.state()
    }

    pub fn context(&self) -> &CheckoutContext {
        self.orchestrator.context()
    }

    pub fn payment_id(&self) -> Option<&str> {
        self.orchestrator.intent().map(|i| i.payment_id.as_str())
    }

    pub fn confirm_attempts(&self) -> u32 {
        self.orchestrator.attempts()
    }

    pub async fn start(
        &mut self,
        gateway: &dyn PaymentGateway,
        observer: &dyn CheckoutObserver,
    ) -> Result<(), CheckoutError> {
        let result = self.orchestrator.start(gateway, observer).await;
        self.render(result.as_ref().map(|_| None));
        result.map(|_| ())
    }

    pub async fn confirm(
        &mut self,
        gateway: &dyn PaymentGateway,
        card: CardInput,
        observer: &dyn CheckoutObserver,
    ) -> Result<PaymentOutcome, CheckoutError> {
        let result = self.orchestrator.confirm(gateway, card, observer).await;
        self.render(result.as_ref().map(Some));
        result
    }

    fn render(&mut self, result: Result<Option<&PaymentOutcome>, &CheckoutError>) {
        match result {
            Ok(Some(outcome)) => {
                self.message = Some(if outcome.captured {
                    SUCCESS_MESSAGE.to_string()
                } else {
                    PENDING_CAPTURE_MESSAGE.to_string()
                });
                self.outcome = Some(outcome.clone());
            }
            Ok(None) => self.message = None,
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    pub fn view(&self) -> SessionView {
        let state = self.orchestrator.state().clone();
        let intent = self.orchestrator.intent();
        SessionView {
            session_id: self.session_id,
            busy: state.is_busy(),
            submit_enabled: state.submit_enabled(),
            state,
            message: self.message.clone(),
            item: Some(self.item.clone()),
            quote: Some(self.quote.clone()),
            payment_id: intent.map(|i| i.payment_id.clone()),
            client_secret: intent.map(|i| i.client_secret.clone()),
            publishable_key: intent.map(|i| i.publishable_key.clone()),
            outcome: self.outcome.clone(),
        }
    }
}

struct SessionEntry {
    opened_at: chrono::DateTime<chrono::Utc>,
    session: Arc<Mutex<CheckoutSession>>,
}

#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

impl SessionRegistry {
    pub async fn insert(&self, session: CheckoutSession) -> Arc<Mutex<CheckoutSession>> {
        let id = session.session_id;
        let handle = Arc::new(Mutex::new(session));
        self.inner.write().await.insert(
            id,
            SessionEntry {
                opened_at: chrono::Utc::now(),
                session: handle.clone(),
            },
        );
        handle
    }

    pub async fn get(&self, session_id: Uuid) -> Option<Arc<Mutex<CheckoutSession>>> {
        self.inner
            .read()
            .await
            .get(&session_id)
            .map(|e| e.session.clone())
    }

    pub async fn contains(&self, session_id: Uuid) -> bool {
        self.inner.read().await.contains_key(&session_id)
    }

    pub async fn abandon(&self, session_id: Uuid) -> bool {
        self.inner.write().await.remove(&session_id).is_some()
    }

    pub async fn prune_older_than(&self, max_age: chrono::Duration) -> usize {
        let cutoff = chrono::Utc::now() - max_age;
        let mut guard = self.inner.write().await;
        let before = guard.len();
        guard.retain(|_, entry| entry.opened_at > cutoff);
        before - guard.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
