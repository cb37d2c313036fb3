use crate::handlers::{current_user, require_role};
use crate::models::*;
use crate::services::OrderService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/orders",
    tag = "order",
    security(("bearer_auth" = [])),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order placed with status pending", body = OrderResponse),
        (status = 400, description = "Empty cart or invalid items"),
        (status = 403, description = "Customer role required"),
        (status = 409, description = "Restaurant not accepting orders")
    )
)]
pub async fn checkout(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    request: web::Json<CheckoutRequest>,
) -> Result<HttpResponse> {
    let customer = match require_role(&req, Role::Customer) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service
        .checkout(customer.id, request.into_inner())
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
    get,
    path = "/orders",
    tag = "order",
    params(
        ("scope" = Option<String>, Query, description = "`active` or `past`"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Own orders, newest first"))
)]
pub async fn list_my_orders(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.list_customer_orders(user.id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/restaurant",
    tag = "order",
    params(
        ("scope" = Option<String>, Query, description = "`active` or `past`"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Orders for the signed-in chef's restaurant"),
        (status = 403, description = "Chef role required")
    )
)]
pub async fn list_restaurant_orders(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse> {
    let chef = match require_role(&req, Role::Chef) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.list_restaurant_orders(chef.id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/orders/{id}/status",
    tag = "order",
    params(("id" = Uuid, Path, description = "Order id")),
    security(("bearer_auth" = [])),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status advanced", body = OrderResponse),
        (status = 403, description = "Role may not drive this transition"),
        (status = 409, description = "Transition not in the lifecycle table")
    )
)]
pub async fn update_order_status(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse> {
    let actor = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service
        .transition_status(path.into_inner(), request.status, actor)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(checkout))
            .route("", web::get().to(list_my_orders))
            .route("/restaurant", web::get().to(list_restaurant_orders))
            .route("/{id}/status", web::post().to(update_order_status)),
    );
}
