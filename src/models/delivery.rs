use crate::entities::delivery_entity as deliveries;
use crate::models::lifecycle::{DeliveryStatus, ParseEnumError};
use crate::models::order::OrderResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClaimRequest {
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateDeliveryStatusRequest {
    pub status: DeliveryStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeliveryResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub rider_id: Uuid,
    pub status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rider view of the delivery in flight, order attached.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActiveDeliveryResponse {
    pub delivery: DeliveryResponse,
    pub order: OrderResponse,
}

impl TryFrom<deliveries::Model> for DeliveryResponse {
    type Error = ParseEnumError;

    fn try_from(model: deliveries::Model) -> Result<Self, Self::Error> {
        let status = model.status.parse::<DeliveryStatus>()?;
        Ok(Self {
            id: model.id,
            order_id: model.order_id,
            rider_id: model.rider_id,
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
