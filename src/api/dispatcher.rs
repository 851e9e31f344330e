//! Dispatcher: the single entry point for every `/api` request.
//!
//! Order of work:
//! 1. CORS: the allowed origin is looked up once and reflected on the response
//!    (`OPTIONS` never gets here, `cors::answer_preflight` wraps the router)
//! 2. body: POST/PUT/PATCH with a JSON content type are buffered and parsed
//! 3. route modules, in a fixed order; the first `Handled` wins
//! 4. nothing matched: 404 `{"message": "Route not found"}`
//!
//! Handler errors come back as `AppError` and are already rendered by the
//! module. Panics are caught one level up by `CatchPanicLayer`.

use std::sync::Arc;

use axum::Extension;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

use crate::api::context::RequestContext;
use crate::api::response;
use crate::api::routes::{
    AuthRoutes, CampaignRoutes, DonationRoutes, DonorRoutes, NgoRoutes, RecurringRoutes,
};
use crate::api::routing::{Outcome, RouteModule};
use crate::error::AppError;
use crate::middleware::body;
use crate::state::AppState;

pub const NOT_FOUND_MESSAGE: &str = "Route not found";

pub struct Dispatcher {
    modules: Vec<Box<dyn RouteModule>>,
}

impl Dispatcher {
    /// auth, ngo, campaigns, donor, donations, recurring.
    pub fn standard() -> Self {
        Self::with_modules(vec![
            Box::new(AuthRoutes::new()),
            Box::new(NgoRoutes::new()),
            Box::new(CampaignRoutes::new()),
            Box::new(DonorRoutes::new()),
            Box::new(DonationRoutes::new()),
            Box::new(RecurringRoutes::new()),
        ])
    }

    pub fn with_modules(modules: Vec<Box<dyn RouteModule>>) -> Self {
        Self { modules }
    }

    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    pub async fn serve(&self, state: &AppState, request: Request) -> Response {
        let (parts, payload) = request.into_parts();
        let origin = state.cors.allowed_origin(&parts.headers);

        let mut response = match self.read_body(state, &parts.method, &parts.headers, payload).await {
            Ok(map) => {
                let mut ctx = RequestContext::new(parts.method, &parts.uri, parts.headers, map);
                self.route(state, &mut ctx).await
            }
            Err(err) => err.into_response(),
        };

        state.cors.decorate(origin.as_ref(), &mut response);
        response
    }

    async fn read_body(
        &self,
        state: &AppState,
        method: &Method,
        headers: &HeaderMap,
        payload: Body,
    ) -> Result<Map<String, Value>, AppError> {
        if body::carries_json(method, headers) {
            body::read_object(payload, state.config.max_body_bytes).await
        } else {
            Ok(Map::new())
        }
    }

    async fn route(&self, state: &AppState, ctx: &mut RequestContext) -> Response {
        for module in &self.modules {
            if let Outcome::Handled(response) = module.handle(state, ctx).await {
                tracing::debug!(
                    module = module.name(),
                    method = %ctx.method,
                    path = %ctx.path,
                    status = response.status().as_u16(),
                    "request handled"
                );
                return response;
            }
        }

        tracing::debug!(method = %ctx.method, path = %ctx.path, "no route matched");
        response::message(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("modules", &self.module_names())
            .finish()
    }
}

/// Router fallback: everything not served by a static route lands here.
pub async fn dispatch(
    State(state): State<AppState>,
    Extension(dispatcher): Extension<Arc<Dispatcher>>,
    request: Request,
) -> Response {
    dispatcher.serve(&state, request).await
}
