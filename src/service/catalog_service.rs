use crate::domain::effects::{Effect, WriteOutcome};
use crate::domain::error::{api_err, internal, not_found, ApiError};
use crate::domain::product::{
    generate_link_token, unique_slug, CreateProductRequest, CreateSalesLinkRequest, Product,
    SalesLink, UpdateProductRequest,
};
use crate::domain::seller::SellerSession;
use crate::pricing::money::round_half_up;
use crate::repo::products_repo::{ProductChanges, ProductsRepo};
use crate::service::notification_dispatcher::{Notification, NotificationDispatcher};
use crate::service::seller_service::require_selling;
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct SalesLinkView {
    #[serde(flatten)]
    pub link: SalesLink,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InviteCollaboratorRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollaboratorInvite {
    pub product_id: Uuid,
    pub email: String,
    pub notified: bool,
}

#[derive(Clone)]
pub struct CatalogService {
    pub products_repo: ProductsRepo,
    pub notifications: NotificationDispatcher,
    pub public_base_url: String,
}

fn validation(message: &str) -> ApiError {
    api_err(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
}

fn checked_price(price: Decimal) -> Result<Decimal, ApiError> {
    if price <= Decimal::ZERO {
        return Err(validation("price must be greater than zero"));
    }
    Ok(round_half_up(price))
}

fn checked_title(title: &str) -> Result<&str, ApiError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(validation("title is required"));
    }
    Ok(title)
}

impl CatalogService {
    pub async fn list_products(&self, session: &SellerSession) -> Result<Vec<Product>, ApiError> {
        self.products_repo
            .list_for_seller(session.seller_id())
            .await
            .map_err(internal)
    }

    pub async fn create_product(
        &self,
        session: &SellerSession,
        req: CreateProductRequest,
    ) -> Result<WriteOutcome<Product>, ApiError> {
        require_selling(session)?;
        let title = checked_title(&req.title)?;
        let price = checked_price(req.price)?;

        let product = self
            .products_repo
            .insert(
                session.seller_id(),
                title,
                req.description.trim(),
                price,
                &unique_slug(title),
            )
            .await
            .map_err(internal)?;

        tracing::info!(product_id = %product.product_id, seller_id = %session.seller_id(), "product created");
        Ok(WriteOutcome::new(product, vec![Effect::Products]))
    }

    pub async fn update_product(
        &self,
        session: &SellerSession,
        product_id: Uuid,
        req: UpdateProductRequest,
    ) -> Result<WriteOutcome<Product>, ApiError> {
        require_selling(session)?;
        let title = req.title.as_deref().map(checked_title).transpose()?;
        let price = req.price.map(checked_price).transpose()?;

        let product = self
            .products_repo
            .update(
                session.seller_id(),
                product_id,
                ProductChanges {
                    title,
                    description: req.description.as_deref().map(str::trim),
                    price,
                    is_active: req.is_active,
                },
            )
            .await
            .map_err(internal)?
            .ok_or_else(|| not_found("product"))?;

        Ok(WriteOutcome::new(product, vec![Effect::Products]))
    }

    pub async fn delete_product(
        &self,
        session: &SellerSession,
        product_id: Uuid,
    ) -> Result<WriteOutcome<Uuid>, ApiError> {
        let deleted = self
            .products_repo
            .delete(session.seller_id(), product_id)
            .await
            .map_err(internal)?;
        if !deleted {
            return Err(not_found("product"));
        }

        tracing::info!(product_id = %product_id, "product deleted");
        Ok(WriteOutcome::new(
            product_id,
            vec![Effect::Products, Effect::SalesLinks(product_id)],
        ))
    }

    async fn owned_product(&self, session: &SellerSession, product_id: Uuid) -> Result<Product, ApiError> {
        self.products_repo
            .find_owned(session.seller_id(), product_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| not_found("product"))
    }

    fn link_view(&self, link: SalesLink) -> SalesLinkView {
        SalesLinkView {
            url: link.url(&self.public_base_url),
            link,
        }
    }

    pub async fn list_links(
        &self,
        session: &SellerSession,
        product_id: Uuid,
    ) -> Result<Vec<SalesLinkView>, ApiError> {
        let product = self.owned_product(session, product_id).await?;
        let links = self
            .products_repo
            .list_links(product.product_id)
            .await
            .map_err(internal)?;
        Ok(links.into_iter().map(|l| self.link_view(l)).collect())
    }

    pub async fn create_link(
        &self,
        session: &SellerSession,
        product_id: Uuid,
        req: CreateSalesLinkRequest,
    ) -> Result<WriteOutcome<SalesLinkView>, ApiError> {
        require_selling(session)?;
        let product = self.owned_product(session, product_id).await?;
        let custom_title = req
            .custom_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let custom_price = req.custom_price.map(checked_price).transpose()?;

        let link = self
            .products_repo
            .insert_link(product.product_id, custom_title, custom_price, &generate_link_token())
            .await
            .map_err(internal)?;

        Ok(WriteOutcome::new(
            self.link_view(link),
            vec![Effect::SalesLinks(product_id)],
        ))
    }

    pub async fn delete_link(
        &self,
        session: &SellerSession,
        product_id: Uuid,
        link_id: Uuid,
    ) -> Result<WriteOutcome<Uuid>, ApiError> {
        let product = self.owned_product(session, product_id).await?;
        let deleted = self
            .products_repo
            .delete_link(product.product_id, link_id)
            .await
            .map_err(internal)?;
        if !deleted {
            return Err(not_found("sales link"));
        }
        Ok(WriteOutcome::new(link_id, vec![Effect::SalesLinks(product_id)]))
    }

    pub async fn invite_collaborator(
        &self,
        session: &SellerSession,
        product_id: Uuid,
        req: InviteCollaboratorRequest,
    ) -> Result<WriteOutcome<CollaboratorInvite>, ApiError> {
        let email = req.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(validation("a valid email is required"));
        }
        let product = self.owned_product(session, product_id).await?;

        let added = self
            .products_repo
            .add_collaborator(product.product_id, &email)
            .await
            .map_err(internal)?;

        let notified = if added {
            self.notifications
                .send(Notification::CollaborationInvitation {
                    to: email.clone(),
                    inviter_name: session.seller.name.clone(),
                    product_title: product.title.clone(),
                })
                .await
        } else {
            false
        };

        Ok(WriteOutcome::new(
            CollaboratorInvite {
                product_id,
                email,
                notified,
            },
            vec![Effect::Products],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_non_positive_prices() {
        assert!(checked_price(dec!(0)).is_err());
        assert!(checked_price(dec!(-1)).is_err());
        assert_eq!(checked_price(dec!(19.995)).unwrap(), dec!(20.00));
    }

    #[test]
    fn trims_titles() {
        assert_eq!(checked_title("  Rust 101 ").unwrap(), "Rust 101");
        assert!(checked_title("   ").is_err());
    }
}
