use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderItem, OrderStatus};

/// Contact and delivery details submitted with the checkout form. All fields
/// arrive as raw strings and are validated before any transaction opens.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}
