use async_trait::async_trait;
use axum::http::Method;

use crate::api::context::RequestContext;
use crate::api::handlers::donations as handlers;
use crate::api::routing::{Outcome, RouteModule, RouteTable};
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
enum Action {
    Create,
    Mine,
    Received,
    ForCampaign,
}

pub struct DonationRoutes {
    table: RouteTable<Action>,
}

impl DonationRoutes {
    pub fn new() -> Self {
        // `my` and `ngo` are literals, so they win over `{campaignId}`
        let table = RouteTable::new()
            .public(Method::POST, "/api/donations", Action::Create)
            .guarded(Method::GET, "/api/donations/my", Action::Mine)
            .guarded(Method::GET, "/api/donations/ngo", Action::Received)
            .public(Method::GET, "/api/donations/{campaignId}", Action::ForCampaign);
        Self { table }
    }
}

#[async_trait]
impl RouteModule for DonationRoutes {
    fn name(&self) -> &'static str {
        "donations"
    }

    async fn handle(&self, state: &AppState, ctx: &mut RequestContext) -> Outcome {
        let Some(route) = self.table.resolve(&ctx.method, &ctx.path) else {
            return Outcome::NotHandled;
        };
        if let Err(rejected) = route.authorize(&state.sessions, ctx) {
            return Outcome::from_result(Err(rejected));
        }

        let result = match route.action {
            Action::Create => handlers::create(state, ctx).await,
            Action::Mine => handlers::list_mine(state, ctx).await,
            Action::Received => handlers::list_received(state, ctx).await,
            Action::ForCampaign => handlers::list_for_campaign(state, &route.params).await,
        };
        Outcome::from_result(result)
    }
}
