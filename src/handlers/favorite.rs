use crate::handlers::current_user;
use crate::models::*;
use crate::services::FavoriteService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/favorites",
    tag = "favorite",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Own favorite dishes"))
)]
pub async fn list_favorites(
    favorite_service: web::Data<FavoriteService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match favorite_service.list(user.id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/favorites",
    tag = "favorite",
    security(("bearer_auth" = [])),
    request_body = FavoriteRequest,
    responses(
        (status = 200, description = "Favorite saved", body = FavoriteResponse),
        (status = 404, description = "Unknown dish")
    )
)]
pub async fn add_favorite(
    favorite_service: web::Data<FavoriteService>,
    req: HttpRequest,
    request: web::Json<FavoriteRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match favorite_service.add(user.id, request.dish_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/favorites/{dish_id}",
    tag = "favorite",
    params(("dish_id" = Uuid, Path, description = "Dish id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Favorite removed"),
        (status = 404, description = "Nothing to remove")
    )
)]
pub async fn remove_favorite(
    favorite_service: web::Data<FavoriteService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match favorite_service.remove(user.id, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Favorite removed"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn favorite_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/favorites")
            .route("", web::get().to(list_favorites))
            .route("", web::post().to(add_favorite))
            .route("/{dish_id}", web::delete().to(remove_favorite)),
    );
}
