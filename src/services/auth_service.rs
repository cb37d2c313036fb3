use crate::entities::{profile_entity as profiles, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{JwtService, hash_password, validate_email, validate_password, verify_password};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    /// Public signup. The requested role is fixed at creation; `admin` can
    /// only be minted through the admin provisioning path.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        if request.role == Role::Admin {
            return Err(AppError::PermissionDenied(
                "The admin role cannot be self-assigned".to_string(),
            ));
        }

        let (user, profile) = self
            .create_identity_with_profile(
                &request.email,
                &request.password,
                &request.full_name,
                request.role,
                request.phone.clone(),
            )
            .await?;

        self.issue_tokens(user, profile)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(request.email.as_str()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Unknown email or wrong password".to_string()))?;

        let is_valid = verify_password(&request.password, &user.password_hash)?;
        if !is_valid {
            return Err(AppError::AuthError(
                "Unknown email or wrong password".to_string(),
            ));
        }

        let profile = self.find_profile(user.id).await?;
        self.issue_tokens(user, profile)
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id: Uuid = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        let profile = self.find_profile(user.id).await?;

        let role = profile.role.parse::<Role>()?;
        let access_token = self.jwt_service.generate_access_token(user.id, role)?;
        let user_response = ProfileResponse::from_parts(user, profile)?;

        Ok(AuthResponse {
            user: user_response,
            access_token,
            refresh_token: refresh_token.to_string(),
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    /// Two-phase write shared by signup and admin provisioning: create the
    /// auth identity, then its profile row. There is no cross-table
    /// transaction with the hosted-auth split, so a failed second step is
    /// compensated by deleting the orphaned identity.
    pub async fn create_identity_with_profile(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: Role,
        phone: Option<String>,
    ) -> AppResult<(users::Model, profiles::Model)> {
        validate_email(email)?;
        validate_password(password)?;

        if full_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Full name is required".to_string(),
            ));
        }

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::ValidationError(
                "Email is already registered".to_string(),
            ));
        }

        let password_hash = hash_password(password)?;
        let user_id = Uuid::new_v4();

        // step 1: identity
        let user = users::ActiveModel {
            id: Set(user_id),
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        // step 2: profile, compensating on failure
        let profile_result = profiles::ActiveModel {
            id: Set(user_id),
            full_name: Set(full_name.to_string()),
            role: Set(role.to_string()),
            phone: Set(phone),
            bio: Set(None),
            avatar_url: Set(None),
            ..Default::default()
        }
        .insert(&self.pool)
        .await;

        match profile_result {
            Ok(profile) => Ok((user, profile)),
            Err(profile_err) => {
                log::error!("Profile creation failed for {user_id}: {profile_err}");
                match users::Entity::delete_by_id(user_id).exec(&self.pool).await {
                    Ok(_) => Err(AppError::InternalError(format!(
                        "Profile creation failed ({profile_err}); identity rolled back"
                    ))),
                    Err(compensation_err) => {
                        // orphaned identity left behind; distinct log line so
                        // an operator can find it
                        log::error!(
                            "Compensating identity delete failed for {user_id}: {compensation_err}"
                        );
                        Err(AppError::InternalError(format!(
                            "Profile creation failed ({profile_err}) and identity cleanup also failed ({compensation_err})"
                        )))
                    }
                }
            }
        }
    }

    /// Privileged hard delete of an auth identity; the profile row goes with
    /// it via the FK cascade.
    pub async fn delete_identity(&self, user_id: Uuid) -> AppResult<()> {
        let result = users::Entity::delete_by_id(user_id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn find_profile(&self, user_id: Uuid) -> AppResult<profiles::Model> {
        profiles::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }

    fn issue_tokens(
        &self,
        user: users::Model,
        profile: profiles::Model,
    ) -> AppResult<AuthResponse> {
        let role = profile.role.parse::<Role>()?;
        let access_token = self.jwt_service.generate_access_token(user.id, role)?;
        let refresh_token = self.jwt_service.generate_refresh_token(user.id, role)?;
        let user_response = ProfileResponse::from_parts(user, profile)?;

        Ok(AuthResponse {
            user: user_response,
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}
