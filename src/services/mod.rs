/*
 * Responsibility
 * - Collaborators the handlers call that are not storage:
 *   session tokens + password hashing, receipt email, image hosting
 */
pub mod auth;
pub mod images;
pub mod mailer;
