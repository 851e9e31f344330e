pub mod factory;
pub mod password;
pub mod session_jwt;

pub use factory::{build_password_hasher, build_session_service};
pub use password::{PasswordError, PasswordHasher};
pub use session_jwt::{Identity, SessionClaims, SessionError, SessionService};
