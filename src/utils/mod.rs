//! Shared utilities
//!
//! Error handling, validation helpers and JWT handling.

pub mod errors;
pub mod jwt;
pub mod validation;
