use crate::error::AppError;
use crate::external::StorageClient;
use crate::handlers::{current_user, require_role};
use crate::models::lifecycle::Role;
use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[derive(MultipartForm)]
/// Multipart form carrying one image file.
pub struct ImageUploadForm {
    #[multipart(limit = "5MB")]
    pub file: TempFile,
}

fn read_image(form: &ImageUploadForm) -> std::result::Result<(String, String, Vec<u8>), AppError> {
    let content_type = form
        .file
        .content_type
        .as_ref()
        .map(|mime| mime.to_string())
        .unwrap_or_default();
    if !content_type.starts_with("image/") {
        return Err(AppError::ValidationError(
            "Only image uploads are accepted".to_string(),
        ));
    }

    let file_name = form
        .file
        .file_name
        .clone()
        .unwrap_or_else(|| "upload".to_string());

    let bytes = std::fs::read(form.file.file.path())
        .map_err(|e| AppError::InternalError(format!("Failed to read upload: {e}")))?;
    if bytes.is_empty() {
        return Err(AppError::ValidationError(
            "Uploaded file is empty".to_string(),
        ));
    }

    Ok((file_name, content_type, bytes))
}

#[utoipa::path(
    post,
    path = "/upload/avatar",
    tag = "upload",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Avatar stored; public URL returned"),
        (status = 400, description = "Not an image")
    )
)]
pub async fn upload_avatar(
    storage: web::Data<StorageClient>,
    req: HttpRequest,
    form: MultipartForm<ImageUploadForm>,
) -> Result<HttpResponse> {
    if let Err(e) = current_user(&req) {
        return Ok(e.error_response());
    }

    let (file_name, content_type, bytes) = match read_image(&form) {
        Ok(parts) => parts,
        Err(e) => return Ok(e.error_response()),
    };

    let path = StorageClient::object_path("avatars", &file_name);
    match storage.upload(&path, bytes, &content_type).await {
        Ok(url) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "url": url }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/upload/dish-image",
    tag = "upload",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dish image stored; public URL returned"),
        (status = 400, description = "Not an image"),
        (status = 403, description = "Chef role required")
    )
)]
pub async fn upload_dish_image(
    storage: web::Data<StorageClient>,
    req: HttpRequest,
    form: MultipartForm<ImageUploadForm>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, Role::Chef) {
        return Ok(e.error_response());
    }

    let (file_name, content_type, bytes) = match read_image(&form) {
        Ok(parts) => parts,
        Err(e) => return Ok(e.error_response()),
    };

    let path = StorageClient::object_path("dishes", &file_name);
    match storage.upload(&path, bytes, &content_type).await {
        Ok(url) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "url": url }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn upload_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/upload")
            .route("/avatar", web::post().to(upload_avatar))
            .route("/dish-image", web::post().to(upload_dish_image)),
    );
}
