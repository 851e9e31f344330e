use async_trait::async_trait;
use axum::http::Method;

use crate::api::context::RequestContext;
use crate::api::handlers::ngo as handlers;
use crate::api::routing::{Outcome, RouteModule, RouteTable};
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
enum Action {
    List,
    Get,
    Campaigns,
    Update,
    Banner,
}

pub struct NgoRoutes {
    table: RouteTable<Action>,
}

impl NgoRoutes {
    pub fn new() -> Self {
        let table = RouteTable::new()
            .public(Method::GET, "/api/ngo", Action::List)
            .public(Method::GET, "/api/ngo/{id}", Action::Get)
            .public(Method::GET, "/api/ngo/{id}/campaigns", Action::Campaigns)
            .guarded(Method::PUT, "/api/ngo", Action::Update)
            .guarded(Method::POST, "/api/ngo/banner/{id}", Action::Banner);
        Self { table }
    }
}

#[async_trait]
impl RouteModule for NgoRoutes {
    fn name(&self) -> &'static str {
        "ngo"
    }

    async fn handle(&self, state: &AppState, ctx: &mut RequestContext) -> Outcome {
        let Some(route) = self.table.resolve(&ctx.method, &ctx.path) else {
            return Outcome::NotHandled;
        };
        if let Err(rejected) = route.authorize(&state.sessions, ctx) {
            return Outcome::from_result(Err(rejected));
        }

        let params = &route.params;
        let result = match route.action {
            Action::List => handlers::list(state).await,
            Action::Get => handlers::get(state, params).await,
            Action::Campaigns => handlers::campaigns(state, params).await,
            Action::Update => handlers::update(state, ctx).await,
            Action::Banner => handlers::banner(state, ctx, params).await,
        };
        Outcome::from_result(result)
    }
}
