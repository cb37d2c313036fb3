use crate::error::{AppError, AppResult};
use crate::models::lifecycle::Role;
use crate::models::user::AuthenticatedUser;
use actix_web::{HttpMessage, HttpRequest};

pub mod admin;
pub mod auth;
pub mod delivery;
pub mod dish;
pub mod favorite;
pub mod order;
pub mod profile;
pub mod restaurant;
pub mod upload;

pub use admin::admin_config;
pub use auth::auth_config;
pub use delivery::delivery_config;
pub use dish::dish_config;
pub use favorite::favorite_config;
pub use order::order_config;
pub use profile::profile_config;
pub use restaurant::restaurant_config;
pub use upload::upload_config;

/// Identity placed into the request extensions by the auth middleware.
pub(crate) fn current_user(req: &HttpRequest) -> AppResult<AuthenticatedUser> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing authenticated identity".to_string()))
}

/// The one role gate; handlers call this at the top instead of re-deriving
/// role checks per view.
pub(crate) fn require_role(req: &HttpRequest, role: Role) -> AppResult<AuthenticatedUser> {
    let user = current_user(req)?;
    if user.role != role {
        return Err(AppError::PermissionDenied(format!(
            "This endpoint requires the {role} role"
        )));
    }
    Ok(user)
}
