pub mod claims;
pub mod error;
pub mod jwks;
pub mod jwt;
pub mod validator;

pub use claims::Claims;
pub use error::ValidationError;
pub use validator::TokenValidator;
