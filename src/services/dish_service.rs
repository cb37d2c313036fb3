use crate::entities::dish_entity as dishes;
use crate::entities::restaurant_entity as restaurants;
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct DishService {
    pool: DatabaseConnection,
}

impl DishService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Customer discovery listing: free-text search, category filter
    /// (`all` = no filter, otherwise exact match), top-rated threshold.
    pub async fn search(&self, query: &DishQuery) -> AppResult<PaginatedResponse<DishResponse>> {
        let category = CategoryFilter::parse(query.category.as_deref())
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let mut finder = dishes::Entity::find();

        if let Some(q) = query.q.as_deref().filter(|q| !q.trim().is_empty()) {
            let pattern = format!("%{}%", q.trim());
            finder = finder.filter(
                Condition::any()
                    .add(dishes::Column::Name.like(&pattern))
                    .add(dishes::Column::Description.like(&pattern)),
            );
        }

        if let CategoryFilter::Only(category) = category {
            finder = finder.filter(dishes::Column::Category.eq(category.as_str()));
        }

        if query.top_rated.unwrap_or(false) {
            finder = finder.filter(dishes::Column::Rating.gte(TOP_RATED_MIN));
        }

        if let Some(restaurant_id) = query.restaurant_id {
            finder = finder.filter(dishes::Column::RestaurantId.eq(restaurant_id));
        }

        let params = query.pagination();
        let total = finder.clone().count(&self.pool).await?;

        let models = finder
            .order_by_desc(dishes::Column::Rating)
            .order_by_asc(dishes::Column::Name)
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.pool)
            .await?;

        let mut items = Vec::with_capacity(models.len());
        for model in models {
            items.push(DishResponse::try_from(model)?);
        }

        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn create(&self, chef_id: Uuid, request: CreateDishRequest) -> AppResult<DishResponse> {
        if request.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Dish name is required".to_string(),
            ));
        }
        if request.price <= 0 {
            return Err(AppError::ValidationError(
                "Price must be greater than zero".to_string(),
            ));
        }

        let restaurant = self.find_restaurant_for_chef(chef_id).await?;
        Self::ensure_category_declared(&restaurant, request.category)?;

        let model = dishes::ActiveModel {
            id: Set(Uuid::new_v4()),
            restaurant_id: Set(restaurant.id),
            name: Set(request.name.trim().to_string()),
            description: Set(request.description),
            price: Set(request.price),
            category: Set(request.category.to_string()),
            image_url: Set(request.image_url),
            rating: Set(0.0),
            is_available: Set(true),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(DishResponse::try_from(model)?)
    }

    pub async fn update(
        &self,
        dish_id: Uuid,
        chef_id: Uuid,
        request: UpdateDishRequest,
    ) -> AppResult<DishResponse> {
        let (dish, restaurant) = self.find_owned_dish(dish_id, chef_id).await?;

        if let Some(price) = request.price
            && price <= 0
        {
            return Err(AppError::ValidationError(
                "Price must be greater than zero".to_string(),
            ));
        }
        if let Some(category) = request.category {
            Self::ensure_category_declared(&restaurant, category)?;
        }

        let mut model = dish.into_active_model();
        if let Some(name) = request.name {
            model.name = Set(name);
        }
        if let Some(price) = request.price {
            model.price = Set(price);
        }
        if let Some(category) = request.category {
            model.category = Set(category.to_string());
        }
        if let Some(description) = request.description {
            model.description = Set(Some(description));
        }
        if let Some(image_url) = request.image_url {
            model.image_url = Set(Some(image_url));
        }
        model.updated_at = Set(chrono::Utc::now());

        let updated = model.update(&self.pool).await?;
        Ok(DishResponse::try_from(updated)?)
    }

    /// Each call is exactly one persisted write; toggling twice lands the
    /// dish back where it started with two updates on record.
    pub async fn toggle_availability(&self, dish_id: Uuid, chef_id: Uuid) -> AppResult<DishResponse> {
        let (dish, _) = self.find_owned_dish(dish_id, chef_id).await?;

        let flipped = !dish.is_available;
        let mut model = dish.into_active_model();
        model.is_available = Set(flipped);
        model.updated_at = Set(chrono::Utc::now());

        let updated = model.update(&self.pool).await?;
        Ok(DishResponse::try_from(updated)?)
    }

    async fn find_restaurant_for_chef(&self, chef_id: Uuid) -> AppResult<restaurants::Model> {
        restaurants::Entity::find()
            .filter(restaurants::Column::OwnerId.eq(chef_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("This chef has no restaurant yet".to_string()))
    }

    async fn find_owned_dish(
        &self,
        dish_id: Uuid,
        chef_id: Uuid,
    ) -> AppResult<(dishes::Model, restaurants::Model)> {
        let dish = dishes::Entity::find_by_id(dish_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Dish not found".to_string()))?;

        let restaurant = self.find_restaurant_for_chef(chef_id).await?;
        if dish.restaurant_id != restaurant.id {
            return Err(AppError::PermissionDenied(
                "Only the owning chef may modify this dish".to_string(),
            ));
        }

        Ok((dish, restaurant))
    }

    fn ensure_category_declared(
        restaurant: &restaurants::Model,
        category: DishCategory,
    ) -> AppResult<()> {
        if !restaurant
            .categories
            .0
            .iter()
            .any(|c| c == category.as_str())
        {
            return Err(AppError::ValidationError(format!(
                "Category {category} is not in the restaurant's declared set"
            )));
        }
        Ok(())
    }
}
