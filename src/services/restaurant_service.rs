use crate::entities::restaurant_entity as restaurants;
use crate::entities::restaurants::CategorySet;
use crate::entities::dish_entity as dishes;
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct RestaurantService {
    pool: DatabaseConnection,
}

impl RestaurantService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &RestaurantQuery) -> AppResult<Vec<RestaurantResponse>> {
        let mut finder = restaurants::Entity::find();

        if let Some(q) = query.q.as_deref().filter(|q| !q.trim().is_empty()) {
            let pattern = format!("%{}%", q.trim());
            finder = finder.filter(
                Condition::any()
                    .add(restaurants::Column::Name.like(&pattern))
                    .add(restaurants::Column::Address.like(&pattern)),
            );
        }

        if query.accepting_only.unwrap_or(false) {
            finder = finder.filter(restaurants::Column::AcceptingOrders.eq(true));
        }

        let models = finder
            .order_by_asc(restaurants::Column::Name)
            .all(&self.pool)
            .await?;

        Ok(models.into_iter().map(RestaurantResponse::from).collect())
    }

    pub async fn get_detail(&self, id: Uuid) -> AppResult<RestaurantDetailResponse> {
        let restaurant = restaurants::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;

        let dish_models = dishes::Entity::find()
            .filter(dishes::Column::RestaurantId.eq(id))
            .order_by_asc(dishes::Column::Name)
            .all(&self.pool)
            .await?;

        let mut dish_responses = Vec::with_capacity(dish_models.len());
        for dish in dish_models {
            dish_responses.push(DishResponse::try_from(dish)?);
        }

        Ok(RestaurantDetailResponse {
            restaurant: RestaurantResponse::from(restaurant),
            dishes: dish_responses,
        })
    }

    /// One restaurant per chef; the unique owner_id column backs this up.
    pub async fn create(
        &self,
        owner_id: Uuid,
        request: CreateRestaurantRequest,
    ) -> AppResult<RestaurantResponse> {
        if request.name.trim().is_empty() || request.address.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Name and address are required".to_string(),
            ));
        }
        if request.categories.is_empty() {
            return Err(AppError::ValidationError(
                "At least one category must be declared".to_string(),
            ));
        }

        let existing = restaurants::Entity::find()
            .filter(restaurants::Column::OwnerId.eq(owner_id))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "This chef already owns a restaurant".to_string(),
            ));
        }

        let categories: Vec<String> = request
            .categories
            .iter()
            .map(|c| c.as_str().to_string())
            .collect();

        let model = restaurants::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            name: Set(request.name.trim().to_string()),
            address: Set(request.address.trim().to_string()),
            latitude: Set(request.latitude),
            longitude: Set(request.longitude),
            prep_time_minutes: Set(request.prep_time_minutes.unwrap_or(30)),
            delivery_radius_km: Set(request.delivery_radius_km.unwrap_or(5.0)),
            accepting_orders: Set(true),
            categories: Set(CategorySet(categories)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(RestaurantResponse::from(model))
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        request: UpdateRestaurantRequest,
    ) -> AppResult<RestaurantResponse> {
        let restaurant = restaurants::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;

        if restaurant.owner_id != owner_id {
            return Err(AppError::PermissionDenied(
                "Only the owning chef may update this restaurant".to_string(),
            ));
        }

        let mut model = restaurant.into_active_model();
        if let Some(name) = request.name {
            model.name = Set(name);
        }
        if let Some(address) = request.address {
            model.address = Set(address);
        }
        if let Some(latitude) = request.latitude {
            model.latitude = Set(latitude);
        }
        if let Some(longitude) = request.longitude {
            model.longitude = Set(longitude);
        }
        if let Some(prep) = request.prep_time_minutes {
            model.prep_time_minutes = Set(prep);
        }
        if let Some(radius) = request.delivery_radius_km {
            model.delivery_radius_km = Set(radius);
        }
        if let Some(accepting) = request.accepting_orders {
            model.accepting_orders = Set(accepting);
        }
        if let Some(categories) = request.categories {
            if categories.is_empty() {
                return Err(AppError::ValidationError(
                    "At least one category must be declared".to_string(),
                ));
            }
            model.categories = Set(CategorySet(
                categories.iter().map(|c| c.as_str().to_string()).collect(),
            ));
        }
        model.updated_at = Set(chrono::Utc::now());

        let updated = model.update(&self.pool).await?;
        Ok(RestaurantResponse::from(updated))
    }

    /// The chef dashboard scopes everything by the signed-in chef's
    /// restaurant; resolve it once here.
    pub async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<restaurants::Model> {
        restaurants::Entity::find()
            .filter(restaurants::Column::OwnerId.eq(owner_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("This chef has no restaurant yet".to_string()))
    }
}
