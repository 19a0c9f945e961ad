/*
 * Responsibility
 * - /api/auth routes (re-export routes())
 */
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
