use crate::domain::effects::{Effect, WriteOutcome};
use crate::domain::error::{api_err, internal, not_found, ApiError};
use crate::domain::seller::{
    generate_api_token, generate_verification_code, hash_token, KycStatus, RegisterSellerRequest,
    RegisterSellerResponse, Seller, SellerSession,
};
use crate::repo::sellers_repo::SellersRepo;
use crate::service::notification_dispatcher::{Notification, NotificationDispatcher};
use axum::http::StatusCode;
use uuid::Uuid;

#[derive(Clone)]
pub struct SellerService {
    pub sellers_repo: SellersRepo,
    pub notifications: NotificationDispatcher,
}

impl SellerService {
    pub async fn register(&self, req: RegisterSellerRequest) -> Result<RegisterSellerResponse, ApiError> {
        let name = req.name.trim();
        let email = req.email.trim().to_lowercase();
        if name.is_empty() {
            return Err(api_err(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "name is required"));
        }
        if !email.contains('@') {
            return Err(api_err(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "a valid email is required",
            ));
        }

        let api_token = generate_api_token();
        let code = generate_verification_code();
        let seller = self
            .sellers_repo
            .insert(name, &email, &hash_token(&api_token), &code)
            .await
            .map_err(internal)?
            .ok_or_else(|| {
                api_err(
                    StatusCode::CONFLICT,
                    "EMAIL_TAKEN",
                    "a seller with this email already exists",
                )
            })?;

        tracing::info!(seller_id = %seller.seller_id, "seller registered");

        self.notifications
            .send(Notification::EmailVerification {
                to: seller.email.clone(),
                name: seller.name.clone(),
                code,
            })
            .await;
        self.notifications
            .send(Notification::RegistrationWelcome {
                to: seller.email.clone(),
                name: seller.name.clone(),
            })
            .await;

        Ok(RegisterSellerResponse { seller, api_token })
    }

    pub async fn authenticate(&self, api_token: &str) -> Result<SellerSession, ApiError> {
        let seller = self
            .sellers_repo
            .find_by_token_hash(&hash_token(api_token))
            .await
            .map_err(internal)?
            .ok_or_else(unauthorized)?;
        Ok(SellerSession { seller })
    }

    pub async fn verify_email(
        &self,
        session: &SellerSession,
        code: &str,
    ) -> Result<WriteOutcome<Seller>, ApiError> {
        if session.seller.email_verified {
            return Ok(WriteOutcome::new(session.seller.clone(), vec![]));
        }
        let verified = self
            .sellers_repo
            .verify_email(session.seller_id(), code.trim())
            .await
            .map_err(internal)?;
        if !verified {
            return Err(api_err(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "verification code does not match",
            ));
        }

        let seller = self.load(session.seller_id()).await?;
        Ok(WriteOutcome::new(seller, vec![Effect::Seller]))
    }

    pub async fn set_kyc_status(
        &self,
        seller_id: Uuid,
        status: KycStatus,
    ) -> Result<WriteOutcome<Seller>, ApiError> {
        let seller = self
            .sellers_repo
            .set_kyc_status(seller_id, status)
            .await
            .map_err(internal)?
            .ok_or_else(|| not_found("seller"))?;
        tracing::info!(seller_id = %seller_id, kyc = status.as_str(), "kyc status updated");
        Ok(WriteOutcome::new(seller, vec![Effect::Seller]))
    }

    async fn load(&self, seller_id: Uuid) -> Result<Seller, ApiError> {
        self.sellers_repo
            .find_by_id(seller_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| not_found("seller"))
    }
}

pub fn unauthorized() -> ApiError {
    api_err(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "missing or invalid API token")
}

pub fn require_selling(session: &SellerSession) -> Result<(), ApiError> {
    match session.seller.selling_blocker() {
        None => Ok(()),
        Some(reason) => Err(api_err(StatusCode::FORBIDDEN, "SELLING_DISABLED", reason)),
    }
}
