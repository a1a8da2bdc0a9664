use crate::checkout::card_input::{CardInput, CardValidationError};
use crate::domain::card::{BillingDetails, PaymentMethodPayload};
use crate::domain::order::{CustomerInfo, OrderStatus};
use crate::gateways::{
    ConfirmIntentRequest, CreateIntentRequest, IntentStatus, PaymentGateway, PaymentIntent,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub const GENERIC_CONFIRM_FAILURE: &str =
    "Payment could not be completed. Check your card details and try again.";
pub const GENERIC_INTENT_FAILURE: &str = "Checkout could not be started. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureStage {
    Intent,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutState {
    Initializing,
    IntentCreated,
    Confirming,
    Approved,
    PendingCapture,
    Failed { stage: FailureStage, message: String },
}

impl CheckoutState {
    pub fn is_busy(&self) -> bool {
        matches!(self, CheckoutState::Initializing | CheckoutState::Confirming)
    }

    pub fn submit_enabled(&self) -> bool {
        matches!(
            self,
            CheckoutState::IntentCreated
                | CheckoutState::Failed {
                    stage: FailureStage::Confirm,
                    ..
                }
        )
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, CheckoutState::Approved | CheckoutState::PendingCapture)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOutcome {
    pub payment_id: String,
    pub captured: bool,
}

impl PaymentOutcome {
    pub fn order_status(&self) -> OrderStatus {
        if self.captured {
            OrderStatus::Paid
        } else {
            OrderStatus::Authorized
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] CardValidationError),
    #[error("{message}")]
    Gateway { message: String },
    #[error("checkout has no payment intent, restart the checkout")]
    NoIntent,
    #[error("a confirmation is already in flight")]
    ConfirmInFlight,
    #[error("payment already completed")]
    AlreadyCompleted,
    #[error("checkout is not ready: {0}")]
    InvalidState(&'static str),
}

pub trait CheckoutObserver: Send + Sync {
    fn on_success(&self, outcome: &PaymentOutcome);
    fn on_error(&self, message: &str);
}

pub struct LoggingObserver;

impl CheckoutObserver for LoggingObserver {
    fn on_success(&self, outcome: &PaymentOutcome) {
        tracing::info!(
            payment_id = %outcome.payment_id,
            captured = outcome.captured,
            "checkout payment succeeded"
        );
    }

    fn on_error(&self, message: &str) {
        tracing::warn!("checkout payment failed: {}", message);
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutContext {
    pub amount_minor: i64,
    pub currency: String,
    pub product_id: Uuid,
    pub customer: CustomerInfo,
    pub coupon_code: Option<String>,
}

pub struct PaymentOrchestrator {
    context: CheckoutContext,
    state: CheckoutState,
    intent: Option<PaymentIntent>,
    attempts: u32,
}

impl PaymentOrchestrator {
    pub fn new(context: CheckoutContext) -> Self {
        Self {
            context,
            state: CheckoutState::Initializing,
            intent: None,
            attempts: 0,
        }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn intent(&self) -> Option<&PaymentIntent> {
        self.intent.as_ref()
    }

    pub fn context(&self) -> &CheckoutContext {
        &self.context
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub async fn start(
        &mut self,
        gateway: &dyn PaymentGateway,
        observer: &dyn CheckoutObserver,
    ) -> Result<PaymentIntent, CheckoutError> {
        if self.state != CheckoutState::Initializing {
            return Err(CheckoutError::InvalidState("checkout already started"));
        }

        let request = CreateIntentRequest {
            amount_minor: self.context.amount_minor,
            currency: self.context.currency.clone(),
            product_id: self.context.product_id,
            customer: self.context.customer.clone(),
        };

        match gateway.create_intent(request).await {
            Ok(intent) => {
                tracing::info!(
                    payment_id = %intent.payment_id,
                    gateway = gateway.name(),
                    amount_minor = self.context.amount_minor,
                    "payment intent created"
                );
                self.intent = Some(intent.clone());
                self.state = CheckoutState::IntentCreated;
                Ok(intent)
            }
            Err(e) => {
                tracing::warn!(gateway = gateway.name(), "intent creation failed: {}", e);
                let message = e
                    .gateway_message()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| GENERIC_INTENT_FAILURE.to_string());
                Err(self.fail(FailureStage::Intent, message, observer))
            }
        }
    }

    pub async fn confirm(
        &mut self,
        gateway: &dyn PaymentGateway,
        card: CardInput,
        observer: &dyn CheckoutObserver,
    ) -> Result<PaymentOutcome, CheckoutError> {
        match &self.state {
            CheckoutState::IntentCreated
            | CheckoutState::Failed {
                stage: FailureStage::Confirm,
                ..
            } => {}
            CheckoutState::Failed {
                stage: FailureStage::Intent,
                ..
            } => return Err(CheckoutError::NoIntent),
            CheckoutState::Approved | CheckoutState::PendingCapture => {
                return Err(CheckoutError::AlreadyCompleted)
            }
            CheckoutState::Confirming => return Err(CheckoutError::ConfirmInFlight),
            CheckoutState::Initializing => {
                return Err(CheckoutError::InvalidState("payment intent not created yet"))
            }
        }
        let intent = self.intent.clone().ok_or(CheckoutError::NoIntent)?;

        // Validation failures stay on the form and never reach the gateway.
        let card = card.into_card_details()?;

        self.attempts += 1;
        self.state = CheckoutState::Confirming;

        let request = ConfirmIntentRequest {
            payment_id: intent.payment_id.clone(),
            payment_method: PaymentMethodPayload {
                kind: "card",
                card,
                billing_details: BillingDetails {
                    name: self.context.customer.name.clone(),
                    email: self.context.customer.email.clone(),
                    phone: self.context.customer.phone.clone(),
                    address: self.context.customer.address.clone(),
                },
            },
            product_id: self.context.product_id,
            customer: self.context.customer.clone(),
            amount_minor: self.context.amount_minor,
            coupon_code: self.context.coupon_code.clone(),
            idempotency_key: format!("{}:{}", intent.payment_id, self.attempts),
        };

        let (outcome, failure) = match gateway.confirm(request).await {
            Ok(resp) => match resp.status {
                IntentStatus::Succeeded => (Some(true), None),
                IntentStatus::RequiresCapture => (Some(false), None),
                _ => (None, resp.error_message().map(ToString::to_string)),
            },
            Err(e) => {
                tracing::warn!(payment_id = %intent.payment_id, "confirm call failed: {}", e);
                (None, e.gateway_message().map(ToString::to_string))
            }
        };

        match outcome {
            Some(captured) => {
                self.state = if captured {
                    CheckoutState::Approved
                } else {
                    CheckoutState::PendingCapture
                };
                let outcome = PaymentOutcome {
                    payment_id: intent.payment_id,
                    captured,
                };
                observer.on_success(&outcome);
                Ok(outcome)
            }
            None => {
                let message = failure.unwrap_or_else(|| GENERIC_CONFIRM_FAILURE.to_string());
                Err(self.fail(FailureStage::Confirm, message, observer))
            }
        }
    }

    fn fail(
        &mut self,
        stage: FailureStage,
        message: String,
        observer: &dyn CheckoutObserver,
    ) -> CheckoutError {
        self.state = CheckoutState::Failed {
            stage,
            message: message.clone(),
        };
        observer.on_error(&message);
        CheckoutError::Gateway { message }
    }
}
