use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    /// Requested amount to add on top of any existing entry.
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    /// New absolute quantity; zero or less removes the entry.
    pub quantity: i32,
}

/// One cart line joined with its product; `line_total` is computed from the
/// current catalog price, not stored.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartEntry {
    pub id: Uuid,
    pub product: Product,
    pub quantity: i32,
    pub line_total: Decimal,
}

/// Cart badge payload; `display` is the human formatting of `total`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartTotal {
    pub total: Decimal,
    pub currency: String,
    pub display: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartEntry>,
    pub total: Decimal,
    pub currency: String,
}
