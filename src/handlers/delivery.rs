use crate::handlers::require_role;
use crate::models::*;
use crate::services::DeliveryService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/deliveries/available",
    tag = "delivery",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ready orders waiting for a rider"),
        (status = 403, description = "Rider role required")
    )
)]
pub async fn list_available(
    delivery_service: web::Data<DeliveryService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, Role::Rider) {
        return Ok(e.error_response());
    }

    match delivery_service.list_available().await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/deliveries/claim",
    tag = "delivery",
    security(("bearer_auth" = [])),
    request_body = ClaimRequest,
    responses(
        (status = 200, description = "Claim won; delivery created", body = ActiveDeliveryResponse),
        (status = 403, description = "Rider role required"),
        (status = 409, description = "Order already claimed or rider busy")
    )
)]
pub async fn claim(
    delivery_service: web::Data<DeliveryService>,
    req: HttpRequest,
    request: web::Json<ClaimRequest>,
) -> Result<HttpResponse> {
    let rider = match require_role(&req, Role::Rider) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match delivery_service.claim(rider.id, request.order_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/deliveries/active",
    tag = "delivery",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current delivery, or null when idle"),
        (status = 403, description = "Rider role required")
    )
)]
pub async fn active(
    delivery_service: web::Data<DeliveryService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let rider = match require_role(&req, Role::Rider) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match delivery_service.active_for_rider(rider.id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/deliveries/{id}/status",
    tag = "delivery",
    params(("id" = Uuid, Path, description = "Delivery id")),
    security(("bearer_auth" = [])),
    request_body = UpdateDeliveryStatusRequest,
    responses(
        (status = 200, description = "Delivery advanced", body = DeliveryResponse),
        (status = 403, description = "Not this rider's delivery"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn update_delivery_status(
    delivery_service: web::Data<DeliveryService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<UpdateDeliveryStatusRequest>,
) -> Result<HttpResponse> {
    let rider = match require_role(&req, Role::Rider) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match delivery_service
        .advance(path.into_inner(), rider.id, request.status)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn delivery_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/deliveries")
            .route("/available", web::get().to(list_available))
            .route("/claim", web::post().to(claim))
            .route("/active", web::get().to(active))
            .route("/{id}/status", web::post().to(update_delivery_status)),
    );
}
