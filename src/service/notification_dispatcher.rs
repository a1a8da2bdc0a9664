use crate::pricing::money::from_minor;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("email api unreachable: {0}")]
    Transport(String),
    #[error("email api rejected message (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait::async_trait]
pub trait EmailGateway: Send + Sync {
    async fn send(&self, from: &str, to: &[String], subject: &str, html: &str) -> Result<(), NotificationError>;
}

pub struct HttpEmailGateway {
    pub api_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[async_trait::async_trait]
impl EmailGateway for HttpEmailGateway {
    async fn send(&self, from: &str, to: &[String], subject: &str, html: &str) -> Result<(), NotificationError> {
        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_millis(self.timeout_ms))
            .json(&json!({
                "from": from,
                "to": to,
                "subject": subject,
                "html": html,
            }))
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

pub struct LogEmailGateway;

#[async_trait::async_trait]
impl EmailGateway for LogEmailGateway {
    async fn send(&self, from: &str, to: &[String], subject: &str, _html: &str) -> Result<(), NotificationError> {
        tracing::info!(from, to = ?to, subject, "email not sent (log gateway)");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum Notification {
    EmailVerification {
        to: String,
        name: String,
        code: String,
    },
    RegistrationWelcome {
        to: String,
        name: String,
    },
    SaleNotification {
        to: String,
        seller_name: String,
        product_title: String,
        customer_name: String,
        amount_minor: i64,
        currency: String,
    },
    CollaborationInvitation {
        to: String,
        inviter_name: String,
        product_title: String,
    },
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::EmailVerification { .. } => "email_verification",
            Notification::RegistrationWelcome { .. } => "registration_welcome",
            Notification::SaleNotification { .. } => "sale_notification",
            Notification::CollaborationInvitation { .. } => "collaboration_invitation",
        }
    }

    pub fn recipient(&self) -> &str {
        match self {
            Notification::EmailVerification { to, .. }
            | Notification::RegistrationWelcome { to, .. }
            | Notification::SaleNotification { to, .. }
            | Notification::CollaborationInvitation { to, .. } => to,
        }
    }

    pub fn compose(&self) -> (String, String) {
        match self {
            Notification::EmailVerification { name, code, .. } => (
                "Verify your email address".to_string(),
                format!(
                    "<p>Hi {},</p><p>Your verification code is <strong>{}</strong>.</p>",
                    escape_html(name),
                    escape_html(code)
                ),
            ),
            Notification::RegistrationWelcome { name, .. } => (
                "Welcome aboard".to_string(),
                format!(
                    "<p>Hi {},</p><p>Your seller account is ready. Verify your email and complete KYC to start selling.</p>",
                    escape_html(name)
                ),
            ),
            Notification::SaleNotification {
                seller_name,
                product_title,
                customer_name,
                amount_minor,
                currency,
                ..
            } => (
                format!("New sale: {}", product_title),
                format!(
                    "<p>Hi {},</p><p>{} bought <strong>{}</strong> for {} {}.</p>",
                    escape_html(seller_name),
                    escape_html(customer_name),
                    escape_html(product_title),
                    from_minor(*amount_minor),
                    escape_html(currency)
                ),
            ),
            Notification::CollaborationInvitation {
                inviter_name,
                product_title,
                ..
            } => (
                format!("You were invited to collaborate on {}", product_title),
                format!(
                    "<p>{} invited you to collaborate on <strong>{}</strong>.</p>",
                    escape_html(inviter_name),
                    escape_html(product_title)
                ),
            ),
        }
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    pub gateway: Arc<dyn EmailGateway>,
    pub from: String,
}

impl NotificationDispatcher {
    pub async fn send(&self, notification: Notification) -> bool {
        let (subject, html) = notification.compose();
        let to = vec![notification.recipient().to_string()];
        match self.gateway.send(&self.from, &to, &subject, &html).await {
            Ok(()) => {
                tracing::info!(kind = notification.kind(), "notification sent");
                true
            }
            Err(e) => {
                tracing::warn!(
                    kind = notification.kind(),
                    "NotificationDeliveryFailure: {}",
                    e
                );
                false
            }
        }
    }
}
