/*
 * Responsibility
 * - /api/donations: record a donation (guests allowed), list by donor / NGO / campaign
 * - Recording also bumps the campaign total and mails a receipt; a failed
 *   receipt is logged and never fails the donation
 */
use axum::response::Response;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    api::{
        context::RequestContext, dto::donations::CreateDonationRequest, handlers::require_role,
        response, routing::Params,
    },
    error::AppError,
    middleware::auth::identify,
    models::{Campaign, Donation, NewDonation, PublicDonation, Role},
    services::mailer::Receipt,
    state::AppState,
};

const CAMPAIGN_NOT_FOUND: &str = "Campaign not found";

/// Loads a campaign that can take money right now.
pub(crate) async fn open_campaign(state: &AppState, id: Uuid) -> Result<Campaign, AppError> {
    let campaign = state
        .repos
        .campaigns
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(CAMPAIGN_NOT_FOUND))?;

    if !campaign.accepts_donations(Utc::now()) {
        return Err(AppError::bad_request("Campaign is not accepting donations"));
    }
    Ok(campaign)
}

pub(crate) struct Gift {
    pub donor_id: Option<Uuid>,
    pub donor_name: String,
    pub donor_email: String,
    pub amount: f64,
    pub message: Option<String>,
    pub anonymous: bool,
    pub recurring_plan_id: Option<Uuid>,
}

/// Stores the donation, adds it to the campaign total, sends the receipt.
pub(crate) async fn record(
    state: &AppState,
    campaign: &Campaign,
    gift: Gift,
) -> Result<Donation, AppError> {
    let donation = state
        .repos
        .donations
        .create(NewDonation {
            campaign_id: campaign.id,
            ngo_id: campaign.ngo_id,
            donor_id: gift.donor_id,
            donor_name: gift.donor_name,
            donor_email: gift.donor_email,
            amount: gift.amount,
            message: gift.message,
            anonymous: gift.anonymous,
            recurring_plan_id: gift.recurring_plan_id,
        })
        .await?;

    if state
        .repos
        .campaigns
        .add_to_raised(campaign.id, donation.amount)
        .await?
        .is_none()
    {
        tracing::warn!(campaign_id = %campaign.id, "campaign vanished while recording a donation");
    }

    let receipt = Receipt {
        donation_id: donation.id,
        to_name: donation.donor_name.clone(),
        to_email: donation.donor_email.clone(),
        campaign_title: campaign.title.clone(),
        amount: donation.amount,
        donated_at: donation.created_at,
        recurring: donation.recurring_plan_id.is_some(),
    };
    if let Err(err) = state.mailer.send_receipt(&receipt).await {
        tracing::warn!(error = %err, donation_id = %donation.id, "receipt email not sent");
    }

    tracing::info!(
        donation_id = %donation.id,
        campaign_id = %campaign.id,
        amount = donation.amount,
        guest = donation.donor_id.is_none(),
        "donation recorded"
    );
    Ok(donation)
}

pub async fn create(state: &AppState, ctx: &mut RequestContext) -> Result<Response, AppError> {
    // Guests may donate; a valid session just attributes the donation
    identify(&state.sessions, ctx);

    let req = ctx.parse_body::<CreateDonationRequest>()?;
    let target = req.validate().map_err(AppError::bad_request)?;
    let campaign = open_campaign(state, target.campaign_id).await?;

    let (donor_id, donor_name, donor_email) = match ctx.identity() {
        Some(identity) => (Some(identity.id), identity.name.clone(), identity.email.clone()),
        None => {
            let (name, email) = req.guest().map_err(AppError::bad_request)?;
            (None, name, email)
        }
    };

    let donation = record(
        state,
        &campaign,
        Gift {
            donor_id,
            donor_name,
            donor_email,
            amount: target.amount,
            message: req.message,
            anonymous: req.anonymous,
            recurring_plan_id: None,
        },
    )
    .await?;

    Ok(response::created(json!({
        "message": "Donation recorded successfully",
        "donation": donation,
    })))
}

pub async fn list_mine(state: &AppState, ctx: &RequestContext) -> Result<Response, AppError> {
    let caller = ctx.caller()?;
    let donations = state.repos.donations.list_by_donor(caller.id).await?;
    Ok(response::ok(json!({ "donations": donations })))
}

pub async fn list_received(state: &AppState, ctx: &RequestContext) -> Result<Response, AppError> {
    let caller = ctx.caller()?;
    require_role(&caller, Role::Ngo, "Only NGOs can view received donations")?;

    let donations = state.repos.donations.list_by_ngo(caller.id).await?;
    Ok(response::ok(json!({ "donations": donations })))
}

pub async fn list_for_campaign(state: &AppState, params: &Params) -> Result<Response, AppError> {
    let id = params.uuid("campaignId", "Invalid campaign ID")?;
    if state.repos.campaigns.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found(CAMPAIGN_NOT_FOUND));
    }

    let donations: Vec<PublicDonation> = state
        .repos
        .donations
        .list_by_campaign(id)
        .await?
        .iter()
        .map(Donation::public_view)
        .collect();
    Ok(response::ok(json!({ "donations": donations })))
}
