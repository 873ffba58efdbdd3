use serde::{Deserialize, Serialize};

pub type BookId = u64;

/// A catalog entry. The `id` is unique and never changes; only `quantity`
/// and `price` are mutable through the update path.
///
/// `quantity` is signed: concurrent purchases are not serialized, so a
/// double-sell can drive it below zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub topic: String,
    pub quantity: i64,
    pub price: f64,
}

impl Book {
    pub fn matches_topic(&self, needle_lowercase: &str) -> bool {
        self.topic.to_lowercase().contains(needle_lowercase)
    }
}

/// Partial update of a book: absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl BookPatch {
    pub fn quantity(quantity: i64) -> Self {
        Self {
            quantity: Some(quantity),
            price: None,
        }
    }

    pub fn apply_to(&self, book: &mut Book) {
        if let Some(quantity) = self.quantity {
            book.quantity = quantity;
        }
        if let Some(price) = self.price {
            book.price = price;
        }
    }
}
