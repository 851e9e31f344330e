/*
 * Responsibility
 * - Authentication for the route modules (cookie session guard)
 */
pub mod guard;

pub use guard::{SESSION_COOKIE, authenticate, identify};
