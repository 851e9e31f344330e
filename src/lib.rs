/*
 * Responsibility
 * - Library root: exposes the modules so the binary and tests/ share them
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repos;
pub mod services;
pub mod state;
