/*
 * Responsibility
 * - /api/recurring: a donor's recurring plans
 * - Creating a plan charges the first period immediately (recorded as a
 *   normal donation tagged with the plan id) and schedules the next one
 * - Status moves Active <-> Paused, and either -> Cancelled (terminal)
 */
use axum::response::Response;
use chrono::Utc;
use serde_json::json;

use crate::{
    api::{
        context::RequestContext,
        dto::recurring::{CreatePlanRequest, UpdatePlanRequest},
        handlers::{
            donations::{Gift, open_campaign, record},
            require_role,
        },
        response,
        routing::Params,
    },
    error::AppError,
    models::{NewRecurringPlan, PlanPatch, PlanStatus, RecurringPlan, Role},
    services::auth::Identity,
    state::AppState,
};

const NOT_FOUND: &str = "Recurring plan not found";

async fn find_own(
    state: &AppState,
    params: &Params,
    caller: &Identity,
) -> Result<RecurringPlan, AppError> {
    let id = params.uuid("id", "Invalid plan ID")?;
    let plan = state
        .repos
        .recurring
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    if plan.donor_id != caller.id {
        tracing::warn!(plan_id = %id, user_id = %caller.id, "recurring plan access denied");
        return Err(AppError::forbidden("Access denied"));
    }
    Ok(plan)
}

async fn save(
    state: &AppState,
    plan: &RecurringPlan,
    patch: PlanPatch,
) -> Result<RecurringPlan, AppError> {
    state
        .repos
        .recurring
        .update(plan.id, patch)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))
}

pub async fn create(state: &AppState, ctx: &RequestContext) -> Result<Response, AppError> {
    let caller = ctx.caller()?;
    require_role(&caller, Role::Donor, "Only donors can create recurring donations")?;

    let req = ctx.parse_body::<CreatePlanRequest>()?;
    let valid = req.validate().map_err(AppError::bad_request)?;
    let campaign = open_campaign(state, valid.campaign_id).await?;

    let now = Utc::now();
    let plan = state
        .repos
        .recurring
        .create(NewRecurringPlan {
            donor_id: caller.id,
            campaign_id: campaign.id,
            ngo_id: campaign.ngo_id,
            amount: valid.amount,
            frequency: valid.frequency,
            next_charge_at: valid.frequency.next_after(now),
        })
        .await?;

    let donation = record(
        state,
        &campaign,
        Gift {
            donor_id: Some(caller.id),
            donor_name: caller.name.clone(),
            donor_email: caller.email.clone(),
            amount: plan.amount,
            message: req.message,
            anonymous: false,
            recurring_plan_id: Some(plan.id),
        },
    )
    .await?;

    tracing::info!(
        plan_id = %plan.id,
        frequency = plan.frequency.as_str(),
        next_charge_at = %plan.next_charge_at,
        "recurring plan created"
    );
    Ok(response::created(json!({
        "message": "Recurring donation created successfully",
        "plan": plan,
        "donation": donation,
    })))
}

pub async fn list(state: &AppState, ctx: &RequestContext) -> Result<Response, AppError> {
    let caller = ctx.caller()?;
    let plans = state.repos.recurring.list_by_donor(caller.id).await?;
    Ok(response::ok(json!({ "plans": plans })))
}

pub async fn get(
    state: &AppState,
    ctx: &RequestContext,
    params: &Params,
) -> Result<Response, AppError> {
    let caller = ctx.caller()?;
    let plan = find_own(state, params, &caller).await?;
    Ok(response::ok(json!({ "plan": plan })))
}

pub async fn update(
    state: &AppState,
    ctx: &RequestContext,
    params: &Params,
) -> Result<Response, AppError> {
    let caller = ctx.caller()?;
    let plan = find_own(state, params, &caller).await?;
    if plan.status == PlanStatus::Cancelled {
        return Err(AppError::bad_request("Cancelled plans cannot be modified"));
    }

    let patch = ctx
        .parse_body::<UpdatePlanRequest>()?
        .validate()
        .map_err(AppError::bad_request)?;
    let plan = save(state, &plan, patch).await?;

    tracing::info!(plan_id = %plan.id, "recurring plan updated");
    Ok(response::ok(json!({
        "message": "Recurring plan updated successfully",
        "plan": plan,
    })))
}

/// Target status of the pause / resume / cancel routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Pause,
    Resume,
    Cancel,
}

impl Transition {
    fn target(self) -> PlanStatus {
        match self {
            Transition::Pause => PlanStatus::Paused,
            Transition::Resume => PlanStatus::Active,
            Transition::Cancel => PlanStatus::Cancelled,
        }
    }

    fn rejection(self) -> &'static str {
        match self {
            Transition::Pause => "Only active plans can be paused",
            Transition::Resume => "Only paused plans can be resumed",
            Transition::Cancel => "Plan is already cancelled",
        }
    }

    fn done(self) -> &'static str {
        match self {
            Transition::Pause => "Recurring plan paused",
            Transition::Resume => "Recurring plan resumed",
            Transition::Cancel => "Recurring plan cancelled",
        }
    }
}

pub async fn transition(
    state: &AppState,
    ctx: &RequestContext,
    params: &Params,
    transition: Transition,
) -> Result<Response, AppError> {
    let caller = ctx.caller()?;
    let plan = find_own(state, params, &caller).await?;

    let target = transition.target();
    if !plan.status.can_become(target) {
        return Err(AppError::bad_request(transition.rejection()));
    }

    let mut patch = PlanPatch {
        status: Some(target),
        ..Default::default()
    };
    // a plan paused past its charge date restarts one period from now
    let now = Utc::now();
    if transition == Transition::Resume && plan.next_charge_at <= now {
        patch.next_charge_at = Some(plan.frequency.next_after(now));
    }
    let plan = save(state, &plan, patch).await?;

    tracing::info!(plan_id = %plan.id, status = plan.status.as_str(), "recurring plan status changed");
    Ok(response::ok(json!({
        "message": transition.done(),
        "plan": plan,
    })))
}
