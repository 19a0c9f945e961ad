/*
 * Responsibility
 * - HTTP surface: /health and the /api/auth routes
 */
pub mod auth;
pub mod health;
