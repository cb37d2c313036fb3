use crate::handlers::require_role;
use crate::models::*;
use crate::services::DishService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/dishes",
    tag = "dish",
    params(
        ("q" = Option<String>, Query, description = "Free-text search over name and description"),
        ("category" = Option<String>, Query, description = "`all` or one exact category identifier"),
        ("top_rated" = Option<bool>, Query, description = "Only dishes rated 4.5 or higher"),
        ("restaurant_id" = Option<Uuid>, Query, description = "Scope to one restaurant"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Filtered dish list"),
        (status = 400, description = "Unknown category value")
    )
)]
pub async fn list_dishes(
    dish_service: web::Data<DishService>,
    query: web::Query<DishQuery>,
) -> Result<HttpResponse> {
    match dish_service.search(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/dishes",
    tag = "dish",
    security(("bearer_auth" = [])),
    request_body = CreateDishRequest,
    responses(
        (status = 200, description = "Dish created", body = DishResponse),
        (status = 400, description = "Invalid price or category"),
        (status = 403, description = "Chef role required")
    )
)]
pub async fn create_dish(
    dish_service: web::Data<DishService>,
    req: HttpRequest,
    request: web::Json<CreateDishRequest>,
) -> Result<HttpResponse> {
    let chef = match require_role(&req, Role::Chef) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match dish_service.create(chef.id, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/dishes/{id}",
    tag = "dish",
    params(("id" = Uuid, Path, description = "Dish id")),
    security(("bearer_auth" = [])),
    request_body = UpdateDishRequest,
    responses(
        (status = 200, description = "Dish updated", body = DishResponse),
        (status = 403, description = "Not the owning chef")
    )
)]
pub async fn update_dish(
    dish_service: web::Data<DishService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<UpdateDishRequest>,
) -> Result<HttpResponse> {
    let chef = match require_role(&req, Role::Chef) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match dish_service
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

#[utoipa::path(
    post,
    path = "/dishes/{id}/availability",
    tag = "dish",
    params(("id" = Uuid, Path, description = "Dish id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Availability flipped", body = DishResponse),
        (status = 403, description = "Not the owning chef")
    )
)]
pub async fn toggle_availability(
    dish_service: web::Data<DishService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let chef = match require_role(&req, Role::Chef) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match dish_service
        .toggle_availability(path.into_inner(), chef.id)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn dish_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dishes")
            .route("", web::get().to(list_dishes))
            .route("", web::post().to(create_dish))
            .route("/{id}", web::put().to(update_dish))
            .route("/{id}/availability", web::post().to(toggle_availability)),
    );
}
