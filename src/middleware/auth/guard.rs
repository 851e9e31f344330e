//! Session cookie -> verified `Identity` on the request context.
//!
//! Runs inside the route modules (not as a tower layer) because only some
//! routes of a module are guarded and the decision needs the matched route.
//!
//! States per request: Unauthenticated -> Authenticated, one way. A rejection
//! is returned as `AppError::Unauthorized`; the module turns it into the 401
//! response and reports the request as handled.

use axum::http::{HeaderMap, Method};
use axum_extra::extract::cookie::CookieJar;

use crate::api::context::RequestContext;
use crate::error::AppError;
use crate::services::auth::{SessionError, SessionService};

pub const SESSION_COOKIE: &str = "token";

/// The raw session token, if the `token` cookie is present and non-empty.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

pub fn authenticate(sessions: &SessionService, ctx: &mut RequestContext) -> Result<(), AppError> {
    // Preflight carries no credentials
    if ctx.method == Method::OPTIONS || ctx.identity().is_some() {
        return Ok(());
    }

    let Some(token) = session_token(&ctx.headers) else {
        tracing::warn!(method = %ctx.method, path = %ctx.path, "no session cookie");
        return Err(SessionError::Missing.into());
    };

    match sessions.verify(&token) {
        Ok(identity) => {
            tracing::debug!(user_id = %identity.id, role = %identity.role, "session verified");
            ctx.attach_identity(identity);
            Ok(())
        }
        Err(err) => {
            tracing::warn!(error = ?err, method = %ctx.method, path = %ctx.path, "session token rejected");
            Err(err.into())
        }
    }
}

/// Like `authenticate`, but never rejects: a missing or bad cookie just
/// leaves the request anonymous. Used by routes open to guests.
pub fn identify(sessions: &SessionService, ctx: &mut RequestContext) {
    if ctx.identity().is_some() {
        return;
    }
    if let Some(identity) = session_token(&ctx.headers).and_then(|t| sessions.verify(&t).ok()) {
        ctx.attach_identity(identity);
    }
}
