use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycStatus {
    Pending,
    Approved,
    Rejected,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::Pending => "PENDING",
            KycStatus::Approved => "APPROVED",
            KycStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "APPROVED" => KycStatus::Approved,
            "REJECTED" => KycStatus::Rejected,
            _ => KycStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Seller {
    pub seller_id: Uuid,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub kyc_status: KycStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Seller {
    pub fn can_sell(&self) -> bool {
        self.email_verified && self.kyc_status == KycStatus::Approved
    }

    pub fn selling_blocker(&self) -> Option<&'static str> {
        if !self.email_verified {
            Some("email address is not verified")
        } else if self.kyc_status != KycStatus::Approved {
            Some("identity verification (KYC) is not approved")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct SellerSession {
    pub seller: Seller,
}

impl SellerSession {
    pub fn seller_id(&self) -> Uuid {
        self.seller.seller_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterSellerRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterSellerResponse {
    pub seller: Seller,
    pub api_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailRequest {
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KycDecisionRequest {
    pub status: KycStatus,
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn generate_api_token() -> String {
    let bytes: [u8; 24] = rand::thread_rng().gen();
    format!("cs_{}", hex::encode(bytes))
}

pub fn generate_verification_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seller(email_verified: bool, kyc_status: KycStatus) -> Seller {
        Seller {
            seller_id: Uuid::new_v4(),
            name: "Maria".to_string(),
            email: "maria@example.com".to_string(),
            email_verified,
            kyc_status,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn selling_gate_requires_email_and_kyc() {
        assert!(seller(true, KycStatus::Approved).can_sell());
        assert!(!seller(false, KycStatus::Approved).can_sell());
        assert!(!seller(true, KycStatus::Pending).can_sell());
        assert!(!seller(true, KycStatus::Rejected).can_sell());
        assert_eq!(
            seller(false, KycStatus::Pending).selling_blocker(),
            Some("email address is not verified")
        );
    }

    #[test]
    fn token_hash_is_stable_hex() {
        let h = hash_token("cs_abc");
        assert_eq!(h.len(), 64);
        assert_eq!(h, hash_token("cs_abc"));
        assert_ne!(h, hash_token("cs_abd"));
    }

    #[test]
    fn verification_code_is_six_digits() {
        let code = generate_verification_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }
}
