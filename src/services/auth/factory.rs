/// Factory: build the auth services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{PasswordHasher, SessionService};

pub fn build_session_service(config: &Config) -> Arc<SessionService> {
    Arc::new(SessionService::new(
        config.jwt_secret.as_bytes(),
        config.session_ttl_seconds,
        config.jwt_leeway_seconds,
    ))
}

pub fn build_password_hasher(config: &Config) -> PasswordHasher {
    PasswordHasher::new(config.bcrypt_cost)
}
