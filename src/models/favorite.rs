use crate::models::dish::DishResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FavoriteRequest {
    pub dish_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FavoriteResponse {
    pub id: Uuid,
    pub dish: DishResponse,
    pub created_at: DateTime<Utc>,
}
