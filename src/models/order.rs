use crate::entities::{order_entity as orders, order_item_entity as order_items};
use crate::models::lifecycle::{OrderStatus, ParseEnumError};
use crate::models::pagination::PaginationParams;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub dish_id: Uuid,
    /// Must be at least 1.
    #[schema(example = 2)]
    pub quantity: i64,
}

/// The cart lives client-side; checkout receives it whole and creates the
/// order and its items in one transaction.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub restaurant_id: Uuid,
    pub items: Vec<CartItem>,
    /// Optional dedupe key: replaying the same key returns the original
    /// order instead of creating a second one.
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// `active` covers pending/preparing/ready, `past` the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderScope {
    Active,
    Past,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderQuery {
    pub scope: Option<OrderScope>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl OrderQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub dish_id: Uuid,
    pub dish_name: String,
    pub unit_price: i64,
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub status: OrderStatus,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub service_fee: i64,
    pub total: i64,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

impl From<order_items::Model> for OrderItemResponse {
    fn from(item: order_items::Model) -> Self {
        Self {
            dish_id: item.dish_id,
            dish_name: item.dish_name,
            unit_price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

impl OrderResponse {
    pub fn from_parts(
        order: orders::Model,
        items: Vec<order_items::Model>,
    ) -> Result<Self, ParseEnumError> {
        let status = order.status.parse::<OrderStatus>()?;
        Ok(Self {
            id: order.id,
            customer_id: order.customer_id,
            restaurant_id: order.restaurant_id,
            status,
            subtotal: order.subtotal,
            delivery_fee: order.delivery_fee,
            service_fee: order.service_fee,
            total: order.total,
            created_at: order.created_at,
            items: items.into_iter().map(OrderItemResponse::from).collect(),
        })
    }
}
