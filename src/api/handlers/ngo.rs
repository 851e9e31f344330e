/*
 * Responsibility
 * - /api/ngo: public directory of NGOs + an NGO's own profile and banner
 */
use axum::response::Response;
use serde_json::json;
use uuid::Uuid;

use crate::{
    api::{
        context::RequestContext, dto::ngo::UpdateNgoRequest, handlers::require_role,
        handlers::store_image, response, routing::Params,
    },
    error::AppError,
    models::{Profile, Role, User},
    repos::UserPatch,
    state::AppState,
};

const INVALID_ID: &str = "Invalid NGO ID";
const BANNER_FOLDER: &str = "banners";

async fn find_ngo(state: &AppState, id: Uuid) -> Result<User, AppError> {
    state
        .repos
        .users
        .find_by_id(id)
        .await?
        .filter(|u| u.role() == Role::Ngo)
        .ok_or_else(|| AppError::not_found("NGO not found"))
}

pub async fn list(state: &AppState) -> Result<Response, AppError> {
    let ngos: Vec<_> = state
        .repos
        .users
        .list_by_role(Role::Ngo)
        .await?
        .iter()
        .map(User::view)
        .collect();

    Ok(response::ok(json!({ "ngos": ngos })))
}

pub async fn get(state: &AppState, params: &Params) -> Result<Response, AppError> {
    let id = params.uuid("id", INVALID_ID)?;
    let ngo = find_ngo(state, id).await?;

    Ok(response::ok(json!({ "ngo": ngo.view() })))
}

pub async fn campaigns(state: &AppState, params: &Params) -> Result<Response, AppError> {
    let id = params.uuid("id", INVALID_ID)?;
    let ngo = find_ngo(state, id).await?;
    let campaigns = state.repos.campaigns.list_by_ngo(ngo.id).await?;

    Ok(response::ok(json!({ "campaigns": campaigns })))
}

pub async fn update(state: &AppState, ctx: &RequestContext) -> Result<Response, AppError> {
    let caller = ctx.caller()?;
    require_role(&caller, Role::Ngo, "Only NGO accounts can update an NGO profile")?;

    let req = ctx.parse_body::<UpdateNgoRequest>()?;
    req.validate().map_err(AppError::bad_request)?;

    let ngo = find_ngo(state, caller.id).await?;
    let mut profile = ngo.as_ngo().cloned().unwrap_or_default();
    req.apply(&mut profile);

    let patch = UserPatch {
        name: req.new_name(),
        profile: Some(Profile::Ngo(profile)),
    };
    let ngo = state
        .repos
        .users
        .update(ngo.id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("NGO not found"))?;

    tracing::info!(ngo_id = %ngo.id, "ngo profile updated");
    Ok(response::ok(json!({
        "message": "NGO profile updated successfully",
        "ngo": ngo.view(),
    })))
}

pub async fn banner(
    state: &AppState,
    ctx: &RequestContext,
    params: &Params,
) -> Result<Response, AppError> {
    let caller = ctx.caller()?;
    let id = params.uuid("id", INVALID_ID)?;
    if caller.id != id || !caller.is(Role::Ngo) {
        return Err(AppError::forbidden("You can only update your own banner"));
    }

    let ngo = find_ngo(state, id).await?;
    let url = store_image(state, ctx, BANNER_FOLDER).await?;

    let mut profile = ngo.as_ngo().cloned().unwrap_or_default();
    profile.banner = Some(url.clone());
    state
        .repos
        .users
        .update(
            ngo.id,
            UserPatch {
                name: None,
                profile: Some(Profile::Ngo(profile)),
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found("NGO not found"))?;

    tracing::info!(ngo_id = %ngo.id, banner = %url, "ngo banner updated");
    Ok(response::ok(json!({
        "message": "Banner updated successfully",
        "banner": url,
    })))
}
