/*
 * Responsibility
 * - Load settings from the environment (.env is honored via dotenvy)
 * - Validate them up front so a misconfigured process fails at startup
 *   rather than on the first request
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // None => in-memory repositories (development only)
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    pub cors_allowed_origins: Vec<String>,

    pub jwt_secret: String,
    pub session_ttl_seconds: u64,
    pub jwt_leeway_seconds: u64,
    pub secure_cookies: bool,

    pub max_body_bytes: usize,
    pub request_timeout: Duration,
    pub bcrypt_cost: u32,

    pub upload_dir: PathBuf,
    pub public_base_url: Url,
    pub max_image_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the signing secret or credentials in the database url
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database", &self.database_url.as_ref().map(|_| "postgres"))
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("upload_dir", &self.upload_dir)
            .field("public_base_url", &self.public_base_url.as_str())
            .finish()
    }
}

fn env_parse<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid(key))
        }
        _ => Ok(default),
    }
}

/// Longest session a token (and its cookie) may carry: one year.
pub const MAX_SESSION_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

fn session_ttl(seconds: u64) -> Result<u64, ConfigError> {
    if (1..=MAX_SESSION_TTL_SECONDS).contains(&seconds) {
        Ok(seconds)
    } else {
        Err(ConfigError::Invalid("SESSION_TTL_SECONDS"))
    }
}

/// Normalizes an allow-list entry to its ASCII origin (`scheme://host[:port]`),
/// which is the exact form browsers send in the `Origin` header.
pub fn normalize_origin(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let origin = url.origin();
    origin
        .is_tuple()
        .then(|| origin.ascii_serialization())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = env_parse("PORT", 3000)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        if database_url.is_none() && app_env.is_production() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        let database_max_connections = env_parse("DATABASE_MAX_CONNECTIONS", 10)?;

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| normalize_origin(s).ok_or(ConfigError::Invalid("CORS_ALLOWED_ORIGINS")))
            .collect::<Result<Vec<_>, _>>()?;

        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() || (app_env.is_production() && jwt_secret.len() < 32) {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let session_ttl_seconds =
            session_ttl(env_parse("SESSION_TTL_SECONDS", 604_800)?)?; // 7 days
        let jwt_leeway_seconds = env_parse("JWT_LEEWAY_SECONDS", 0)?;
        let secure_cookies = env_parse("SECURE_COOKIES", app_env.is_production())?;

        let max_body_bytes = env_parse("MAX_BODY_BYTES", 1024 * 1024)?;
        let request_timeout = Duration::from_secs(env_parse("REQUEST_TIMEOUT_SECONDS", 30)?);
        let bcrypt_cost = env_parse("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid("BCRYPT_COST"));
        }

        let upload_dir = PathBuf::from(
            std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
        );
        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));
        let public_base_url =
            Url::parse(&public_base_url).map_err(|_| ConfigError::Invalid("PUBLIC_BASE_URL"))?;
        let max_image_bytes = env_parse("MAX_IMAGE_BYTES", 5 * 1024 * 1024)?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            cors_allowed_origins,
            jwt_secret,
            session_ttl_seconds,
            jwt_leeway_seconds,
            secure_cookies,
            max_body_bytes,
            request_timeout,
            bcrypt_cost,
            upload_dir,
            public_base_url,
            max_image_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_normalized_to_scheme_host_port() {
        assert_eq!(
            normalize_origin("https://app.example.org/"),
            Some("https://app.example.org".to_string())
        );
        assert_eq!(
            normalize_origin(" http://localhost:5173 "),
            Some("http://localhost:5173".to_string())
        );
        // default port is dropped, matching what browsers send
        assert_eq!(
            normalize_origin("https://example.org:443"),
            Some("https://example.org".to_string())
        );
    }

    #[test]
    fn session_ttl_must_be_positive_and_at_most_a_year() {
        assert_eq!(session_ttl(604_800).unwrap(), 604_800);
        assert_eq!(
            session_ttl(MAX_SESSION_TTL_SECONDS).unwrap(),
            MAX_SESSION_TTL_SECONDS
        );
        assert!(matches!(
            session_ttl(0),
            Err(ConfigError::Invalid("SESSION_TTL_SECONDS"))
        ));
        assert!(matches!(
            session_ttl(u64::MAX),
            Err(ConfigError::Invalid("SESSION_TTL_SECONDS"))
        ));
    }

    #[test]
    fn garbage_origin_is_rejected() {
        assert_eq!(normalize_origin("not a url"), None);
        assert_eq!(normalize_origin("data:text/plain,hi"), None);
    }
}
