/*
 * Responsibility
 * - HTTP surface under /api: dispatcher, route modules, handlers, DTOs
 * - The Router only knows the dispatcher (as its fallback)
 */
pub mod context;
pub mod dispatcher;
pub mod dto;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod routing;

pub use dispatcher::{Dispatcher, dispatch};
