use crate::entities::{profile_entity as profiles, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};
use uuid::Uuid;

#[derive(Clone)]
pub struct ProfileService {
    pool: DatabaseConnection,
}

impl ProfileService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<ProfileResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        let profile = profiles::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

        Ok(ProfileResponse::from_parts(user, profile)?)
    }

    /// Role is deliberately not updatable here; it is fixed at creation.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> AppResult<ProfileResponse> {
        if request.full_name.is_none()
            && request.phone.is_none()
            && request.bio.is_none()
            && request.avatar_url.is_none()
        {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }

        if let Some(full_name) = &request.full_name
            && full_name.trim().is_empty()
        {
            return Err(AppError::ValidationError(
                "Full name cannot be empty".to_string(),
            ));
        }

        let mut model = profiles::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?
            .into_active_model();

        if let Some(full_name) = request.full_name {
            model.full_name = Set(full_name);
        }
        if let Some(phone) = request.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(bio) = request.bio {
            model.bio = Set(Some(bio));
        }
        if let Some(avatar_url) = request.avatar_url {
            model.avatar_url = Set(Some(avatar_url));
        }
        model.updated_at = Set(chrono::Utc::now());
        model.update(&self.pool).await?;

        self.get_profile(user_id).await
    }
}
