use crate::handlers::require_role;
use crate::models::*;
use crate::services::{AuthService, DeliveryService, OrderService, ProfileService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/admin/orders",
    tag = "admin",
    params(
        ("scope" = Option<String>, Query, description = "`active` or `past`"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All orders, read-only"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_orders(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, Role::Admin) {
        return Ok(e.error_response());
    }

    match order_service.list_all_orders(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/deliveries",
    tag = "admin",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All deliveries, read-only"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_deliveries(
    delivery_service: web::Data<DeliveryService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, Role::Admin) {
        return Ok(e.error_response());
    }

    match delivery_service.list_all(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = AdminCreateUserRequest,
    responses(
        (status = 200, description = "User provisioned", body = ProfileResponse),
        (status = 403, description = "Admin role required"),
        (status = 500, description = "Second step failed; identity compensated")
    )
)]
pub async fn create_user(
    auth_service: web::Data<AuthService>,
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
    request: web::Json<AdminCreateUserRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, Role::Admin) {
        return Ok(e.error_response());
    }

    let request = request.into_inner();
    let created = auth_service
        .create_identity_with_profile(
            &request.email,
            &request.password,
            &request.full_name,
            request.role,
            request.phone,
        )
        .await;

    match created {
        Ok((user, _)) => match profile_service.get_profile(user.id).await {
            Ok(response) => Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": response
            }))),
            Err(e) => Ok(e.error_response()),
        },
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "User id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Identity deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn delete_user(
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, Role::Admin) {
        return Ok(e.error_response());
    }

    match auth_service.delete_identity(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Identity deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/orders", web::get().to(list_orders))
            .route("/deliveries", web::get().to(list_deliveries))
            .route("/users", web::post().to(create_user))
            .route("/users/{id}", web::delete().to(delete_user)),
    );
}
