use async_trait::async_trait;
use axum::http::Method;

use crate::api::context::RequestContext;
use crate::api::handlers::campaigns as handlers;
use crate::api::routing::{Outcome, RouteModule, RouteTable};
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
enum Action {
    Create,
    ListOwn,
    Get,
    Update,
    Cancel,
}

pub struct CampaignRoutes {
    table: RouteTable<Action>,
}

impl CampaignRoutes {
    pub fn new() -> Self {
        // every campaign route needs a session
        let table = RouteTable::new()
            .guarded(Method::POST, "/api/campaigns", Action::Create)
            .guarded(Method::GET, "/api/campaigns", Action::ListOwn)
            .guarded(Method::GET, "/api/campaigns/{id}", Action::Get)
            .guarded(Method::PUT, "/api/campaigns/{id}", Action::Update)
            .guarded(Method::DELETE, "/api/campaigns/{id}", Action::Cancel);
        Self { table }
    }
}

#[async_trait]
impl RouteModule for CampaignRoutes {
    fn name(&self) -> &'static str {
        "campaigns"
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
            Action::Create => handlers::create(state, ctx).await,
            Action::ListOwn => handlers::list_own(state, ctx).await,
            Action::Get => handlers::get(state, params).await,
            Action::Update => handlers::update(state, ctx, params).await,
            Action::Cancel => handlers::cancel(state, ctx, params).await,
        };
        Outcome::from_result(result)
    }
}
