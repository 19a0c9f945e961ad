pub mod auth;
pub mod cache;
pub mod factory;
pub mod session;

pub use factory::{build_session_store, build_token_validator};
