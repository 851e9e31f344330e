use async_trait::async_trait;
use axum::http::Method;

use crate::api::context::RequestContext;
use crate::api::handlers::auth as handlers;
use crate::api::routing::{Outcome, RouteModule, RouteTable};
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
enum Action {
    Register,
    Login,
    Logout,
    Profile,
}

pub struct AuthRoutes {
    table: RouteTable<Action>,
}

impl AuthRoutes {
    pub fn new() -> Self {
        let table = RouteTable::new()
            .public(Method::POST, "/api/auth/register", Action::Register)
            .public(Method::POST, "/api/auth/login", Action::Login)
            .public(Method::POST, "/api/auth/logout", Action::Logout)
            .guarded(Method::GET, "/api/auth/profile", Action::Profile);
        Self { table }
    }
}

#[async_trait]
impl RouteModule for AuthRoutes {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn handle(&self, state: &AppState, ctx: &mut RequestContext) -> Outcome {
        let Some(route) = self.table.resolve(&ctx.method, &ctx.path) else {
            return Outcome::NotHandled;
        };
        if let Err(rejected) = route.authorize(&state.sessions, ctx) {
            return Outcome::from_result(Err(rejected));
        }

        let result = match route.action {
            Action::Register => handlers::register(state, ctx).await,
            Action::Login => handlers::login(state, ctx).await,
            Action::Logout => handlers::logout(state).await,
            Action::Profile => handlers::profile(state, ctx).await,
        };
        Outcome::from_result(result)
    }
}
