use rand::distributions::Alphanumeric;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const LINK_TOKEN_LEN: usize = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub slug: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesLink {
    pub link_id: Uuid,
    pub product_id: Uuid,
    pub custom_title: Option<String>,
    pub custom_price: Option<Decimal>,
    pub token: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl SalesLink {
    pub fn url(&self, public_base_url: &str) -> String {
        format!("{}/checkout/{}", public_base_url.trim_end_matches('/'), self.token)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSalesLinkRequest {
    pub custom_title: Option<String>,
    pub custom_price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutLookup {
    LinkToken(String),
    Slug(String),
}

#[derive(Debug, Clone)]
pub struct CheckoutTarget {
    pub product: Product,
    pub sales_link: Option<SalesLink>,
    pub title: String,
    pub price: Decimal,
}

impl CheckoutTarget {
    pub fn from_product(product: Product) -> Self {
        Self {
            title: product.title.clone(),
            price: product.price,
            product,
            sales_link: None,
        }
    }

    pub fn from_link(product: Product, link: SalesLink) -> Self {
        Self {
            title: link.custom_title.clone().unwrap_or_else(|| product.title.clone()),
            price: link.custom_price.unwrap_or(product.price),
            product,
            sales_link: Some(link),
        }
    }
}

pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("course");
    }
    slug
}

pub fn unique_slug(title: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect();
    format!("{}-{}", slugify(title), suffix)
}

pub fn generate_link_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(LINK_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product() -> Product {
        Product {
            product_id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            title: "Rust for Web".to_string(),
            description: String::new(),
            price: dec!(199.90),
            slug: "rust-for-web-abc123".to_string(),
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Rust -- for   Web!! "), "rust-for-web");
        assert_eq!(slugify("Curso de Violão"), "curso-de-viol-o");
        assert_eq!(slugify("!!!"), "course");
    }

    #[test]
    fn link_token_is_url_safe() {
        let token = generate_link_token();
        assert_eq!(token.len(), LINK_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn link_overrides_title_and_price() {
        let p = product();
        let link = SalesLink {
            link_id: Uuid::new_v4(),
            product_id: p.product_id,
            custom_title: Some("Black Friday".to_string()),
            custom_price: Some(dec!(99.00)),
            token: "AbCdEf123456".to_string(),
            is_active: true,
            created_at: chrono::Utc::now(),
        };
        let target = CheckoutTarget::from_link(p, link);
        assert_eq!(target.title, "Black Friday");
        assert_eq!(target.price, dec!(99.00));
    }

    #[test]
    fn link_without_override_uses_product_price() {
        let p = product();
        let link = SalesLink {
            link_id: Uuid::new_v4(),
            product_id: p.product_id,
            custom_title: None,
            custom_price: None,
            token: "AbCdEf123456".to_string(),
            is_active: true,
            created_at: chrono::Utc::now(),
        };
        assert_eq!(
            link.url("https://pay.example.com/"),
            "https://pay.example.com/checkout/AbCdEf123456"
        );
        let target = CheckoutTarget::from_link(p, link);
        assert_eq!(target.title, "Rust for Web");
        assert_eq!(target.price, dec!(199.90));
    }
}
