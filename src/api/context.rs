/*
 * Responsibility
 * - Per-request state handed to the route modules (RequestContext)
 *   - method, pathname (query stripped), headers
 *   - parsed body map (empty when absent or not JSON)
 *   - identity, filled in at most once by the auth guard
 */
use axum::http::{HeaderMap, Method, Uri};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::services::auth::{Identity, SessionError};

#[derive(Debug)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Map<String, Value>,
    identity: Option<Identity>,
}

impl RequestContext {
    pub fn new(method: Method, uri: &Uri, headers: HeaderMap, body: Map<String, Value>) -> Self {
        Self {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers,
            body,
            identity: None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Unauthenticated -> Authenticated, once. A second call is ignored.
    pub(crate) fn attach_identity(&mut self, identity: Identity) {
        if self.identity.is_none() {
            self.identity = Some(identity);
        }
    }

    /// The authenticated caller. Only guarded routes reach handlers that call
    /// this, so a miss means the route table forgot to guard the route.
    pub fn caller(&self) -> Result<Identity, AppError> {
        self.identity
            .clone()
            .ok_or_else(|| SessionError::Missing.into())
    }

    /// Decodes the body map into a request DTO.
    pub fn parse_body<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_value(Value::Object(self.body.clone())).map_err(|e| {
            tracing::debug!(error = %e, path = %self.path, "request body did not fit the DTO");
            AppError::bad_request("Invalid request body")
        })
    }
}
