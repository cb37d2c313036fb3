use crate::entities::restaurant_entity as restaurants;
use crate::models::dish::{DishCategory, DishResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRestaurantRequest {
    #[schema(example = "Mama Nkechi Kitchen")]
    pub name: String,
    #[schema(example = "12 Adeola Odeku St, Victoria Island, Lagos")]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Minutes; defaults to 30 when omitted.
    pub prep_time_minutes: Option<i32>,
    /// Kilometres; defaults to 5.0 when omitted.
    pub delivery_radius_km: Option<f64>,
    /// Declared category set; dish categories must stay inside it.
    pub categories: Vec<DishCategory>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub prep_time_minutes: Option<i32>,
    pub delivery_radius_km: Option<f64>,
    pub accepting_orders: Option<bool>,
    pub categories: Option<Vec<DishCategory>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RestaurantQuery {
    /// Free-text search over name and address.
    pub q: Option<String>,
    /// Only restaurants currently accepting orders.
    pub accepting_only: Option<bool>,
}

/// Carries the geocoordinate pair so clients can render either the list or
/// the map presentation from the same payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestaurantResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub prep_time_minutes: i32,
    pub delivery_radius_km: f64,
    pub accepting_orders: bool,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestaurantDetailResponse {
    #[serde(flatten)]
    pub restaurant: RestaurantResponse,
    pub dishes: Vec<DishResponse>,
}

impl From<restaurants::Model> for RestaurantResponse {
    fn from(model: restaurants::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            address: model.address,
            latitude: model.latitude,
            longitude: model.longitude,
            prep_time_minutes: model.prep_time_minutes,
            delivery_radius_km: model.delivery_radius_km,
            accepting_orders: model.accepting_orders,
            categories: model.categories.0,
            created_at: model.created_at,
        }
    }
}
