//! Configuration
//!
//! Environment variables and database pool settings.

pub mod database;
pub mod environment;

pub use environment::*;
