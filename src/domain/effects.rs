use serde::{Serialize, Serializer};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Products,
    SalesLinks(Uuid),
    Sales,
    Customers,
    Withdrawals,
    Seller,
}

impl Effect {
    pub fn key(&self) -> String {
        match self {
            Effect::Products => "products".to_string(),
            Effect::SalesLinks(product_id) => format!("sales_links:{}", product_id),
            Effect::Sales => "sales".to_string(),
            Effect::Customers => "customers".to_string(),
            Effect::Withdrawals => "withdrawals".to_string(),
            Effect::Seller => "seller".to_string(),
        }
    }
}

impl Serialize for Effect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WriteOutcome<T> {
    pub data: T,
    pub effects: Vec<Effect>,
}

impl<T> WriteOutcome<T> {
    pub fn new(data: T, effects: Vec<Effect>) -> Self {
        Self { data, effects }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_serialize_as_keys() {
        let id = Uuid::nil();
        let out = WriteOutcome::new(1, vec![Effect::Products, Effect::SalesLinks(id)]);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(
            json["effects"],
            serde_json::json!(["products", format!("sales_links:{}", id)])
        );
    }
}
