use crate::domain::product::{Product, SalesLink};
use anyhow::Result;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct ProductsRepo {
    pub pool: PgPool,
}

const PRODUCT_COLUMNS: &str =
    "product_id, seller_id, title, description, price, slug, is_active, created_at, updated_at";
const LINK_COLUMNS: &str = "link_id, product_id, custom_title, custom_price, token, is_active, created_at";

fn to_product(r: PgRow) -> Product {
    Product {
        product_id: r.get("product_id"),
        seller_id: r.get("seller_id"),
        title: r.get("title"),
        description: r.get("description"),
        price: r.get("price"),
        slug: r.get("slug"),
        is_active: r.get("is_active"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

fn to_link(r: PgRow) -> SalesLink {
    SalesLink {
        link_id: r.get("link_id"),
        product_id: r.get("product_id"),
        custom_title: r.get("custom_title"),
        custom_price: r.get("custom_price"),
        token: r.get("token"),
        is_active: r.get("is_active"),
        created_at: r.get("created_at"),
    }
}

pub struct ProductChanges<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl ProductsRepo {
    pub async fn insert(
        &self,
        seller_id: Uuid,
        title: &str,
        description: &str,
        price: Decimal,
        slug: &str,
    ) -> Result<Product> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (product_id, seller_id, title, description, price, slug)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(seller_id)
        .bind(title)
        .bind(description)
        .bind(price)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(to_product(row))
    }

    pub async fn list_for_seller(&self, seller_id: Uuid) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE seller_id = $1 ORDER BY created_at DESC"
        ))
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(to_product).collect())
    }

    pub async fn find_owned(&self, seller_id: Uuid, product_id: Uuid) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1 AND seller_id = $2"
        ))
        .bind(product_id)
        .bind(seller_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_product))
    }

    pub async fn find_by_id(&self, product_id: Uuid) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1"
        ))
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_product))
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_product))
    }

    pub async fn update(
        &self,
        seller_id: Uuid,
        product_id: Uuid,
        changes: ProductChanges<'_>,
    ) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                is_active = COALESCE($6, is_active),
                updated_at = now()
            WHERE product_id = $1 AND seller_id = $2
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product_id)
        .bind(seller_id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.price)
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_product))
    }

    pub async fn delete(&self, seller_id: Uuid, product_id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM products WHERE product_id = $1 AND seller_id = $2")
            .bind(product_id)
            .bind(seller_id)
            .execute(&self.pool)
            .await?;

        Ok(res.rows_affected() == 1)
    }

    pub async fn insert_link(
        &self,
        product_id: Uuid,
        custom_title: Option<&str>,
        custom_price: Option<Decimal>,
        token: &str,
    ) -> Result<SalesLink> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO sales_links (link_id, product_id, custom_title, custom_price, token)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(product_id)
        .bind(custom_title)
        .bind(custom_price)
        .bind(token)
        .fetch_one(&self.pool)
        .await?;

        Ok(to_link(row))
    }

    pub async fn list_links(&self, product_id: Uuid) -> Result<Vec<SalesLink>> {
        let rows = sqlx::query(&format!(
            "SELECT {LINK_COLUMNS} FROM sales_links WHERE product_id = $1 ORDER BY created_at DESC"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(to_link).collect())
    }

    pub async fn find_link_by_token(&self, token: &str) -> Result<Option<SalesLink>> {
        let row = sqlx::query(&format!(
            "SELECT {LINK_COLUMNS} FROM sales_links WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_link))
    }

    pub async fn delete_link(&self, product_id: Uuid, link_id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM sales_links WHERE link_id = $1 AND product_id = $2")
            .bind(link_id)
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        Ok(res.rows_affected() == 1)
    }

    pub async fn add_collaborator(&self, product_id: Uuid, email: &str) -> Result<bool> {
        let res = sqlx::query(
            "INSERT INTO product_collaborators (product_id, email) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(product_id)
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }
}
