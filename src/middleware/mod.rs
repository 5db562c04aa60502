//! HTTP middleware and extractors

pub mod auth;
pub mod cors;
pub mod extractors;
pub mod rate_limit;
pub mod security;

pub use auth::AuthenticatedUser;
pub use extractors::ValidatedJson;
