pub mod cookie;
pub mod store;
pub mod valkey;

pub use cookie::CookieSessionStore;
pub use store::{Session, SessionError, SessionStore, SessionTokens};
pub use valkey::ValkeySessionStore;
