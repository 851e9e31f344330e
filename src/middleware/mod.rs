/*
 * Responsibility
 * - middleware public interface
 * - tower layers (http), plus the pieces the dispatcher runs itself:
 *   CORS filter, body parser, auth guard
 */
pub mod auth;
pub mod body;
pub mod cors;
pub mod http;
