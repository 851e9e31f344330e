//! Route table and the contract shared by the route modules.
//!
//! Each resource module declares its URL space as a `RouteTable` of
//! `(method, pattern, access, action)` entries. Patterns are written as paths
//! with `{name}` captures (`/api/recurring/{id}/pause`). Matching works on the
//! non-empty segments of the pathname, so `/api/campaigns` and
//! `/api/campaigns/` are the same route.
//!
//! Precedence:
//! - a route with more literal segments beats one with more captures
//!   (`/api/donations/my` always wins over `/api/donations/{campaignId}`)
//! - equal specificity: the route declared first wins
//!
//! A module answers with an `Outcome`; once it returns `Handled` the dispatcher
//! stops, whatever the status inside (401s included).

use async_trait::async_trait;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::api::context::RequestContext;
use crate::error::AppError;
use crate::middleware::auth::guard;
use crate::services::auth::SessionService;
use crate::state::AppState;

#[derive(Debug)]
pub enum Outcome {
    /// A response exists; nobody else may write one.
    Handled(Response),
    /// This module does not know the (method, path); try the next one.
    NotHandled,
}

impl Outcome {
    pub fn from_result(result: Result<Response, AppError>) -> Self {
        Outcome::Handled(result.unwrap_or_else(IntoResponse::into_response))
    }
}

#[async_trait]
pub trait RouteModule: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, state: &AppState, ctx: &mut RequestContext) -> Outcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Guarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(&'static str),
    Capture(&'static str),
}

#[derive(Debug, Clone)]
struct Route<A> {
    method: Method,
    segments: Vec<Segment>,
    access: Access,
    action: A,
}

impl<A> Route<A> {
    fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    fn capture(&self, path: &[&str]) -> Option<Params> {
        if path.len() != self.segments.len() {
            return None;
        }
        let mut params = Params::default();
        for (segment, part) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Capture(name) => params.0.push((*name, (*part).to_string())),
            }
        }
        Some(params)
    }
}

fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn compile(pattern: &'static str) -> Vec<Segment> {
    split(pattern)
        .into_iter()
        .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => Segment::Capture(name),
            None => Segment::Literal(s),
        })
        .collect()
}

/// Named path captures of a matched route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(&'static str, String)>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parses capture `name` as a UUID; anything else is a 400 with `invalid`.
    pub fn uuid(&self, name: &str, invalid: &'static str) -> Result<Uuid, AppError> {
        self.get(name)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or_else(|| AppError::bad_request(invalid))
    }
}

#[derive(Debug)]
pub struct RouteMatch<A> {
    pub action: A,
    pub params: Params,
    pub access: Access,
}

impl<A> RouteMatch<A> {
    /// Runs the auth guard for guarded routes.
    pub fn authorize(
        &self,
        sessions: &SessionService,
        ctx: &mut RequestContext,
    ) -> Result<(), AppError> {
        match self.access {
            Access::Public => Ok(()),
            Access::Guarded => guard::authenticate(sessions, ctx),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable<A> {
    routes: Vec<Route<A>>,
}

impl<A> Default for RouteTable<A> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<A: Copy> RouteTable<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, method: Method, pattern: &'static str, access: Access, action: A) -> Self {
        self.routes.push(Route {
            method,
            segments: compile(pattern),
            access,
            action,
        });
        self
    }

    pub fn public(self, method: Method, pattern: &'static str, action: A) -> Self {
        self.route(method, pattern, Access::Public, action)
    }

    pub fn guarded(self, method: Method, pattern: &'static str, action: A) -> Self {
        self.route(method, pattern, Access::Guarded, action)
    }

    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteMatch<A>> {
        let parts = split(path);
        let mut best: Option<(&Route<A>, Params)> = None;

        for route in self.routes.iter().filter(|r| r.method == *method) {
            let Some(params) = route.capture(&parts) else {
                continue;
            };
            // strictly greater keeps the earliest route on ties
            let better = best
                .as_ref()
                .is_none_or(|(current, _)| route.literal_count() > current.literal_count());
            if better {
                best = Some((route, params));
            }
        }

        best.map(|(route, params)| RouteMatch {
            action: route.action,
            params,
            access: route.access,
        })
    }
}
