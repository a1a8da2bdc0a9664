use crate::domain::seller::{KycStatus, Seller};
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct SellersRepo {
    pub pool: PgPool,
}

const SELLER_COLUMNS: &str = "seller_id, name, email, email_verified, kyc_status, created_at";

fn to_seller(r: PgRow) -> Seller {
    Seller {
        seller_id: r.get("seller_id"),
        name: r.get("name"),
        email: r.get("email"),
        email_verified: r.get("email_verified"),
        kyc_status: KycStatus::parse(r.get::<String, _>("kyc_status").as_str()),
        created_at: r.get("created_at"),
    }
}

impl SellersRepo {
    /// `None` when the email is already registered.
    pub async fn insert(
        &self,
        name: &str,
        email: &str,
        api_token_hash: &str,
        verification_code: &str,
    ) -> Result<Option<Seller>> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO sellers (seller_id, name, email, api_token_hash, email_verification_code)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO NOTHING
            RETURNING {SELLER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(api_token_hash)
        .bind(verification_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_seller))
    }

    pub async fn find_by_token_hash(&self, api_token_hash: &str) -> Result<Option<Seller>> {
        let row = sqlx::query(&format!(
            "SELECT {SELLER_COLUMNS} FROM sellers WHERE api_token_hash = $1"
        ))
        .bind(api_token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_seller))
    }

    pub async fn find_by_id(&self, seller_id: Uuid) -> Result<Option<Seller>> {
        let row = sqlx::query(&format!(
            "SELECT {SELLER_COLUMNS} FROM sellers WHERE seller_id = $1"
        ))
        .bind(seller_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_seller))
    }

    pub async fn verify_email(&self, seller_id: Uuid, code: &str) -> Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE sellers
            SET email_verified = true, email_verification_code = NULL, updated_at = now()
            WHERE seller_id = $1 AND email_verification_code = $2
            "#,
        )
        .bind(seller_id)
        .bind(code)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    pub async fn set_kyc_status(&self, seller_id: Uuid, status: KycStatus) -> Result<Option<Seller>> {
        let row = sqlx::query(&format!(
            "UPDATE sellers SET kyc_status = $2, updated_at = now() WHERE seller_id = $1 RETURNING {SELLER_COLUMNS}"
        ))
        .bind(seller_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_seller))
    }
}
