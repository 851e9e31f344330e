use async_trait::async_trait;
use axum::http::Method;

use crate::api::context::RequestContext;
use crate::api::handlers::donor as handlers;
use crate::api::routing::{Outcome, RouteModule, RouteTable};
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
enum Action {
    Get,
    Update,
    ProfilePicture,
}

pub struct DonorRoutes {
    table: RouteTable<Action>,
}

impl DonorRoutes {
    pub fn new() -> Self {
        let table = RouteTable::new()
            .guarded(Method::GET, "/api/donor/{id}", Action::Get)
            .guarded(Method::PATCH, "/api/donor/update/{id}", Action::Update)
            .guarded(Method::POST, "/api/donor/profile-picture/{id}", Action::ProfilePicture);
        Self { table }
    }
}

#[async_trait]
impl RouteModule for DonorRoutes {
    fn name(&self) -> &'static str {
        "donor"
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
            Action::Get => handlers::get(state, ctx, params).await,
            Action::Update => handlers::update(state, ctx, params).await,
            Action::ProfilePicture => handlers::profile_picture(state, ctx, params).await,
        };
        Outcome::from_result(result)
    }
}
