use crate::entities::{dish_entity as dishes, user_favorite_entity as user_favorites};
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone)]
pub struct FavoriteService {
    pool: DatabaseConnection,
}

impl FavoriteService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<FavoriteResponse>> {
        let favorites = user_favorites::Entity::find()
            .filter(user_favorites::Column::UserId.eq(user_id))
            .order_by_desc(user_favorites::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        let dish_ids: Vec<Uuid> = favorites.iter().map(|f| f.dish_id).collect();
        let dish_by_id: HashMap<Uuid, dishes::Model> = if dish_ids.is_empty() {
            HashMap::new()
        } else {
            dishes::Entity::find()
                .filter(dishes::Column::Id.is_in(dish_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|d| (d.id, d))
                .collect()
        };

        // favorites pointing at since-removed dishes are skipped
        let mut responses = Vec::with_capacity(favorites.len());
        for favorite in favorites {
            if let Some(dish) = dish_by_id.get(&favorite.dish_id) {
                responses.push(FavoriteResponse {
                    id: favorite.id,
                    dish: DishResponse::try_from(dish.clone())?,
                    created_at: favorite.created_at,
                });
            }
        }

        Ok(responses)
    }

    /// Upsert semantics: adding an existing favorite returns it unchanged.
    pub async fn add(&self, user_id: Uuid, dish_id: Uuid) -> AppResult<FavoriteResponse> {
        let dish = dishes::Entity::find_by_id(dish_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Dish not found".to_string()))?;

        let existing = user_favorites::Entity::find()
            .filter(user_favorites::Column::UserId.eq(user_id))
            .filter(user_favorites::Column::DishId.eq(dish_id))
            .one(&self.pool)
            .await?;

        let favorite = match existing {
            Some(favorite) => favorite,
            None => {
                user_favorites::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    dish_id: Set(dish_id),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?
            }
        };

        Ok(FavoriteResponse {
            id: favorite.id,
            dish: DishResponse::try_from(dish)?,
            created_at: favorite.created_at,
        })
    }

    /// Delete by (user, dish) match.
    pub async fn remove(&self, user_id: Uuid, dish_id: Uuid) -> AppResult<()> {
        let result = user_favorites::Entity::delete_many()
            .filter(user_favorites::Column::UserId.eq(user_id))
            .filter(user_favorites::Column::DishId.eq(dish_id))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Favorite not found".to_string()));
        }

        Ok(())
    }
}
