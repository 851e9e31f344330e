/*
 * Responsibility
 * - /api/auth: register, login, logout, profile
 * - register/login answer with the user view and a fresh session cookie
 */
use axum::{http::StatusCode, response::Response};
use serde_json::json;

use crate::{
    api::{
        context::RequestContext,
        dto::auth::{LoginRequest, RegisterRequest},
        response,
    },
    error::AppError,
    models::{NewUser, User},
    repos::RepoError,
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn with_session(
    state: &AppState,
    user: &User,
    status: StatusCode,
    message: &str,
) -> Result<Response, AppError> {
    let token = state.sessions.issue(user)?;
    let cookie = response::session_cookie(
        &token,
        state.sessions.ttl_seconds(),
        state.config.secure_cookies,
    )?;
    let body = json!({ "message": message, "user": user.view() });

    Ok(response::with_cookie(response::json(status, body), cookie))
}

pub async fn register(state: &AppState, ctx: &RequestContext) -> Result<Response, AppError> {
    let reg = ctx
        .parse_body::<RegisterRequest>()?
        .validate()
        .map_err(AppError::bad_request)?;

    if state.repos.users.find_by_email(&reg.email).await?.is_some() {
        return Err(AppError::conflict("User already exists"));
    }

    let password_hash = state.passwords.hash(&reg.password).await?;
    let user = state
        .repos
        .users
        .create(NewUser {
            name: reg.name,
            email: reg.email,
            password_hash,
            profile: reg.profile,
        })
        .await
        .map_err(|e| match e {
            // lost a race with a concurrent registration
            RepoError::Conflict => AppError::conflict("User already exists"),
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id, role = %user.role(), "user registered");
    with_session(state, &user, StatusCode::CREATED, "User registered successfully")
}

pub async fn login(state: &AppState, ctx: &RequestContext) -> Result<Response, AppError> {
    let (email, password) = ctx
        .parse_body::<LoginRequest>()?
        .validate()
        .map_err(AppError::bad_request)?;

    let Some(user) = state.repos.users.find_by_email(&email).await? else {
        tracing::info!("login with unknown email");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    };
    if !state.passwords.verify(&password, &user.password_hash).await? {
        tracing::info!(user_id = %user.id, "login with wrong password");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    tracing::info!(user_id = %user.id, "user logged in");
    with_session(state, &user, StatusCode::OK, "Login successful")
}

pub async fn logout(state: &AppState) -> Result<Response, AppError> {
    Ok(response::with_cookie(
        response::message(StatusCode::OK, "Logged out successfully"),
        response::cleared_session_cookie(state.config.secure_cookies),
    ))
}

pub async fn profile(state: &AppState, ctx: &RequestContext) -> Result<Response, AppError> {
    let caller = ctx.caller()?;
    let user = state
        .repos
        .users
        .find_by_id(caller.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(response::ok(json!({ "user": user.view() })))
}
