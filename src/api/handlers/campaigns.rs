/*
 * Responsibility
 * - /api/campaigns: NGO-owned campaign CRUD
 * - DELETE does not remove the row; it cancels the campaign so recorded
 *   donations keep pointing at something
 */
use axum::response::Response;
use chrono::Utc;
use serde_json::json;

use crate::{
    api::{
        context::RequestContext,
        dto::campaigns::{CreateCampaignRequest, UpdateCampaignRequest},
        handlers::require_role,
        response,
        routing::Params,
    },
    error::AppError,
    models::{Campaign, CampaignPatch, CampaignStatus, Role},
    services::auth::Identity,
    state::AppState,
};

const INVALID_ID: &str = "Invalid campaign ID";
const NOT_FOUND: &str = "Campaign not found";

async fn find_owned(
    state: &AppState,
    params: &Params,
    caller: &Identity,
) -> Result<Campaign, AppError> {
    let id = params.uuid("id", INVALID_ID)?;
    let campaign = state
        .repos
        .campaigns
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    if campaign.ngo_id != caller.id {
        tracing::warn!(campaign_id = %id, user_id = %caller.id, "campaign owner mismatch");
        return Err(AppError::forbidden("You can only modify your own campaigns"));
    }
    Ok(campaign)
}

pub async fn create(state: &AppState, ctx: &RequestContext) -> Result<Response, AppError> {
    let caller = ctx.caller()?;
    require_role(&caller, Role::Ngo, "Only NGOs can create campaigns")?;

    let new = ctx
        .parse_body::<CreateCampaignRequest>()?
        .validate(caller.id, Utc::now())
        .map_err(AppError::bad_request)?;
    let campaign = state.repos.campaigns.create(new).await?;

    tracing::info!(campaign_id = %campaign.id, ngo_id = %campaign.ngo_id, "campaign created");
    Ok(response::created(json!({
        "message": "Campaign created successfully",
        "campaign": campaign,
    })))
}

pub async fn list_own(state: &AppState, ctx: &RequestContext) -> Result<Response, AppError> {
    let caller = ctx.caller()?;
    require_role(&caller, Role::Ngo, "Only NGOs can view their campaigns")?;

    let campaigns = state.repos.campaigns.list_by_ngo(caller.id).await?;
    Ok(response::ok(json!({ "campaigns": campaigns })))
}

pub async fn get(state: &AppState, params: &Params) -> Result<Response, AppError> {
    let id = params.uuid("id", INVALID_ID)?;
    let campaign = state
        .repos
        .campaigns
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    Ok(response::ok(json!({ "campaign": campaign })))
}

pub async fn update(
    state: &AppState,
    ctx: &RequestContext,
    params: &Params,
) -> Result<Response, AppError> {
    let caller = ctx.caller()?;
    let campaign = find_owned(state, params, &caller).await?;
    if campaign.status == CampaignStatus::Cancelled {
        return Err(AppError::bad_request("Cancelled campaigns cannot be modified"));
    }

    let patch = ctx
        .parse_body::<UpdateCampaignRequest>()?
        .validate(Utc::now())
        .map_err(AppError::bad_request)?;
    let campaign = state
        .repos
        .campaigns
        .update(campaign.id, patch)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    tracing::info!(campaign_id = %campaign.id, "campaign updated");
    Ok(response::ok(json!({
        "message": "Campaign updated successfully",
        "campaign": campaign,
    })))
}

pub async fn cancel(
    state: &AppState,
    ctx: &RequestContext,
    params: &Params,
) -> Result<Response, AppError> {
    let caller = ctx.caller()?;
    let campaign = find_owned(state, params, &caller).await?;

    let patch = CampaignPatch {
        status: Some(CampaignStatus::Cancelled),
        ..Default::default()
    };
    let campaign = state
        .repos
        .campaigns
        .update(campaign.id, patch)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    tracing::info!(campaign_id = %campaign.id, "campaign cancelled");
    Ok(response::ok(json!({
        "message": "Campaign cancelled successfully",
        "campaign": campaign,
    })))
}
