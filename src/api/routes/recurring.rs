use async_trait::async_trait;
use axum::http::Method;

use crate::api::context::RequestContext;
use crate::api::handlers::recurring::{self as handlers, Transition};
use crate::api::routing::{Outcome, RouteModule, RouteTable};
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
enum Action {
    Create,
    List,
    Get,
    Update,
    Change(Transition),
}

pub struct RecurringRoutes {
    table: RouteTable<Action>,
}

impl RecurringRoutes {
    pub fn new() -> Self {
        let table = RouteTable::new()
            .guarded(Method::POST, "/api/recurring", Action::Create)
            .guarded(Method::GET, "/api/recurring", Action::List)
            .guarded(Method::GET, "/api/recurring/{id}", Action::Get)
            .guarded(Method::PATCH, "/api/recurring/{id}", Action::Update)
            .guarded(Method::PATCH, "/api/recurring/{id}/pause", Action::Change(Transition::Pause))
            .guarded(Method::PATCH, "/api/recurring/{id}/resume", Action::Change(Transition::Resume))
            .guarded(Method::DELETE, "/api/recurring/{id}", Action::Change(Transition::Cancel));
        Self { table }
    }
}

#[async_trait]
impl RouteModule for RecurringRoutes {
    fn name(&self) -> &'static str {
        "recurring"
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
            Action::List => handlers::list(state, ctx).await,
            Action::Get => handlers::get(state, ctx, params).await,
            Action::Update => handlers::update(state, ctx, params).await,
            Action::Change(transition) => {
                handlers::transition(state, ctx, params, transition).await
            }
        };
        Outcome::from_result(result)
    }
}
