use crate::entities::{profile_entity as profiles, user_entity as users};
use crate::models::lifecycle::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Identity attached to a request by the auth middleware after the bearer
/// token checks out. Role gates are applied here, at the boundary, not
/// re-derived in every view.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
    #[schema(example = "Ada Obi")]
    pub full_name: String,
    /// Fixed at creation. `admin` is rejected here; only the admin
    /// provisioning path may assign it.
    pub role: Role,
    #[schema(example = "+2348012345678")]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Admin provisioning payload; unlike the public register endpoint this may
/// assign any role, including `admin`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminCreateUserRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: ProfileResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

impl ProfileResponse {
    pub fn from_parts(user: users::Model, profile: profiles::Model) -> Result<Self, super::lifecycle::ParseEnumError> {
        let role = profile.role.parse::<Role>()?;
        Ok(Self {
            id: profile.id,
            email: user.email,
            full_name: profile.full_name,
            role,
            phone: profile.phone,
            bio: profile.bio,
            avatar_url: profile.avatar_url,
            created_at: profile.created_at,
        })
    }
}
