//! Database bootstrap
//!
//! Pool creation and migrations for PostgreSQL.

pub mod connection;

pub use connection::connect;
