use crate::handlers::require_role;
use crate::models::*;
use crate::services::RestaurantService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/restaurants",
    tag = "restaurant",
    params(
        ("q" = Option<String>, Query, description = "Free-text search over name and address"),
        ("accepting_only" = Option<bool>, Query, description = "Only restaurants accepting orders")
    ),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Restaurant list with geocoordinates"))
)]
pub async fn list_restaurants(
    restaurant_service: web::Data<RestaurantService>,
    query: web::Query<RestaurantQuery>,
) -> Result<HttpResponse> {
    match restaurant_service.list(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    tag = "restaurant",
    params(("id" = Uuid, Path, description = "Restaurant id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Restaurant with its dishes", body = RestaurantDetailResponse),
        (status = 404, description = "Unknown restaurant")
    )
)]
pub async fn get_restaurant(
    restaurant_service: web::Data<RestaurantService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match restaurant_service.get_detail(path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/restaurants",
    tag = "restaurant",
    security(("bearer_auth" = [])),
    request_body = CreateRestaurantRequest,
    responses(
        (status = 200, description = "Restaurant created", body = RestaurantResponse),
        (status = 403, description = "Chef role required"),
        (status = 409, description = "Chef already owns a restaurant")
    )
)]
pub async fn create_restaurant(
    restaurant_service: web::Data<RestaurantService>,
    req: HttpRequest,
    request: web::Json<CreateRestaurantRequest>,
) -> Result<HttpResponse> {
    let chef = match require_role(&req, Role::Chef) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match restaurant_service
        .create(chef.id, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/restaurants/{id}",
    tag = "restaurant",
    params(("id" = Uuid, Path, description = "Restaurant id")),
    security(("bearer_auth" = [])),
    request_body = UpdateRestaurantRequest,
    responses(
        (status = 200, description = "Restaurant updated", body = RestaurantResponse),
        (status = 403, description = "Not the owning chef")
    )
)]
pub async fn update_restaurant(
    restaurant_service: web::Data<RestaurantService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<UpdateRestaurantRequest>,
) -> Result<HttpResponse> {
    let chef = match require_role(&req, Role::Chef) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match restaurant_service
        .update(path.into_inner(), chef.id, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn restaurant_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/restaurants")
            .route("", web::get().to(list_restaurants))
            .route("", web::post().to(create_restaurant))
            .route("/{id}", web::get().to(get_restaurant))
            .route("/{id}", web::put().to(update_restaurant)),
    );
}
