/*
 * Responsibility
 * - /api/donor/{id}: a donor reads and edits their own account only
 */
use axum::response::Response;
use serde_json::json;

use crate::{
    api::{
        context::RequestContext, dto::donor::UpdateDonorRequest, handlers::store_image, response,
        routing::Params,
    },
    error::AppError,
    models::{Profile, Role, User},
    repos::UserPatch,
    state::AppState,
};

const NOT_FOUND: &str = "Donor not found";
const PICTURE_FOLDER: &str = "profile-pictures";

/// The donor addressed by `{id}`, provided it is the caller.
async fn own_account(
    state: &AppState,
    ctx: &RequestContext,
    params: &Params,
) -> Result<User, AppError> {
    let caller = ctx.caller()?;
    let id = params.uuid("id", "Invalid donor ID")?;
    if caller.id != id {
        tracing::warn!(user_id = %caller.id, target = %id, "donor access denied");
        return Err(AppError::forbidden("Access denied"));
    }

    state
        .repos
        .users
        .find_by_id(id)
        .await?
        .filter(|u| u.role() == Role::Donor)
        .ok_or_else(|| AppError::not_found(NOT_FOUND))
}

pub async fn get(
    state: &AppState,
    ctx: &RequestContext,
    params: &Params,
) -> Result<Response, AppError> {
    let donor = own_account(state, ctx, params).await?;
    Ok(response::ok(json!({ "donor": donor.view() })))
}

pub async fn update(
    state: &AppState,
    ctx: &RequestContext,
    params: &Params,
) -> Result<Response, AppError> {
    let donor = own_account(state, ctx, params).await?;

    let req = ctx.parse_body::<UpdateDonorRequest>()?;
    req.validate().map_err(AppError::bad_request)?;

    let mut profile = donor.as_donor().cloned().unwrap_or_default();
    req.apply(&mut profile);
    let donor = state
        .repos
        .users
        .update(
            donor.id,
            UserPatch {
                name: req.new_name(),
                profile: Some(Profile::Donor(profile)),
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    tracing::info!(donor_id = %donor.id, "donor profile updated");
    Ok(response::ok(json!({
        "message": "Donor updated successfully",
        "donor": donor.view(),
    })))
}

pub async fn profile_picture(
    state: &AppState,
    ctx: &RequestContext,
    params: &Params,
) -> Result<Response, AppError> {
    let donor = own_account(state, ctx, params).await?;
    let url = store_image(state, ctx, PICTURE_FOLDER).await?;

    let mut profile = donor.as_donor().cloned().unwrap_or_default();
    profile.profile_picture = Some(url.clone());
    state
        .repos
        .users
        .update(
            donor.id,
            UserPatch {
                name: None,
                profile: Some(Profile::Donor(profile)),
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    tracing::info!(donor_id = %donor.id, picture = %url, "profile picture updated");
    Ok(response::ok(json!({
        "message": "Profile picture updated successfully",
        "profilePicture": url,
    })))
}
