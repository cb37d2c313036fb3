use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::profile::get_profile,
        handlers::profile::update_profile,
        handlers::restaurant::list_restaurants,
        handlers::restaurant::get_restaurant,
        handlers::restaurant::create_restaurant,
        handlers::restaurant::update_restaurant,
        handlers::dish::list_dishes,
        handlers::dish::create_dish,
        handlers::dish::update_dish,
        handlers::dish::toggle_availability,
        handlers::order::checkout,
        handlers::order::list_my_orders,
        handlers::order::list_restaurant_orders,
        handlers::order::update_order_status,
        handlers::delivery::list_available,
        handlers::delivery::claim,
        handlers::delivery::active,
        handlers::delivery::update_delivery_status,
        handlers::favorite::list_favorites,
        handlers::favorite::add_favorite,
        handlers::favorite::remove_favorite,
        handlers::admin::list_orders,
        handlers::admin::list_deliveries,
        handlers::admin::create_user,
        handlers::admin::delete_user,
        handlers::upload::upload_avatar,
        handlers::upload::upload_dish_image,
    ),
    components(
        schemas(
            ApiError,
            PaginationParams,
            Role,
            OrderStatus,
            DeliveryStatus,
            OrderScope,
            DishCategory,
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            AdminCreateUserRequest,
            ProfileResponse,
            AuthResponse,
            CreateRestaurantRequest,
            UpdateRestaurantRequest,
            RestaurantResponse,
            RestaurantDetailResponse,
            CreateDishRequest,
            UpdateDishRequest,
            DishResponse,
            CartItem,
            CheckoutRequest,
            UpdateOrderStatusRequest,
            OrderItemResponse,
            OrderResponse,
            ClaimRequest,
            UpdateDeliveryStatusRequest,
            DeliveryResponse,
            ActiveDeliveryResponse,
            FavoriteRequest,
            FavoriteResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Sign-up, sign-in and token refresh"),
        (name = "profile", description = "Own profile"),
        (name = "restaurant", description = "Restaurant discovery and chef management"),
        (name = "dish", description = "Menu discovery and chef menu management"),
        (name = "order", description = "Checkout and the order lifecycle"),
        (name = "delivery", description = "Rider claims and delivery progress"),
        (name = "favorite", description = "Favorite dishes"),
        (name = "admin", description = "Monitoring and user provisioning"),
        (name = "upload", description = "Image uploads"),
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
