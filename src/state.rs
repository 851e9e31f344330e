/*
 * Responsibility
 * - Shared context handed to every route module (AppState)
 *   - repos, session/password services, mailer, image store, CORS policy
 * - Clone is cheap (Arc inside); nothing here is mutated per request
 */
use std::sync::Arc;

use crate::config::Config;
use crate::middleware::cors::CorsPolicy;
use crate::repos::Repos;
use crate::services::auth::{PasswordHasher, SessionService};
use crate::services::images::ImageStore;
use crate::services::mailer::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repos: Repos,
    pub sessions: Arc<SessionService>,
    pub passwords: PasswordHasher,
    pub mailer: Arc<dyn Mailer>,
    pub images: Arc<dyn ImageStore>,
    pub cors: Arc<CorsPolicy>,
}

impl AppState {
    pub fn new(
        config: Config,
        repos: Repos,
        mailer: Arc<dyn Mailer>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        let sessions = crate::services::auth::build_session_service(&config);
        let passwords = crate::services::auth::build_password_hasher(&config);
        let cors = Arc::new(CorsPolicy::from_config(&config));

        Self {
            config: Arc::new(config),
            repos,
            sessions,
            passwords,
            mailer,
            images,
            cors,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}
