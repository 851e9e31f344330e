/*
 * Responsibility
 * - Business handlers, one file per resource
 * - Each takes the shared state + request context (+ path params) and returns
 *   Result<Response, AppError>; the route module renders the error side
 */
use crate::api::context::RequestContext;
use crate::api::dto::ImageRequest;
use crate::error::AppError;
use crate::models::Role;
use crate::services::auth::Identity;
use crate::services::images::{ImageError, ImageUpload};
use crate::state::AppState;

pub mod auth;
pub mod campaigns;
pub mod donations;
pub mod donor;
pub mod ngo;
pub mod recurring;

/// 403 with `message` unless the caller has `role`.
pub(crate) fn require_role(caller: &Identity, role: Role, message: &str) -> Result<(), AppError> {
    if caller.is(role) {
        Ok(())
    } else {
        tracing::warn!(user_id = %caller.id, role = %caller.role, required = %role, "role check failed");
        Err(AppError::forbidden(message))
    }
}

/// Decodes `{"image": ...}` from the body and stores it under `folder`.
/// Returns the public URL.
pub(crate) async fn store_image(
    state: &AppState,
    ctx: &RequestContext,
    folder: &str,
) -> Result<String, AppError> {
    let req = ctx.parse_body::<ImageRequest>()?;
    let raw = req.image.ok_or(ImageError::Missing)?;
    let image = ImageUpload::decode(&raw, state.config.max_image_bytes)?;
    Ok(state.images.put(folder, &image).await?)
}
