use crate::domain::order::BillingAddress;
use serde::Serialize;

#[derive(Clone, Serialize)]
pub struct CardDetails {
    pub number: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvv: String,
    pub name: String,
}

impl CardDetails {
    pub fn last4(&self) -> &str {
        let len = self.number.len();
        self.number.get(len.saturating_sub(4)..).unwrap_or("")
    }
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &format_args!("**** {}", self.last4()))
            .field("exp_month", &"**")
            .field("exp_year", &"****")
            .field("cvv", &"***")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Clone, Serialize)]
pub struct BillingDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<BillingAddress>,
}

#[derive(Clone, Serialize)]
pub struct PaymentMethodPayload {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub card: CardDetails,
    pub billing_details: BillingDetails,
}

impl std::fmt::Debug for PaymentMethodPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentMethodPayload")
            .field("kind", &self.kind)
            .field("card", &self.card)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_card_secrets() {
        let card = CardDetails {
            number: "4111111111111111".to_string(),
            exp_month: 12,
            exp_year: 2030,
            cvv: "123".to_string(),
            name: "Ada Lovelace".to_string(),
        };
        let printed = format!("{:?}", card);
        assert!(!printed.contains("4111111111111111"));
        assert!(!printed.contains("123\""));
        assert!(printed.contains("**** 1111"));
    }
}
