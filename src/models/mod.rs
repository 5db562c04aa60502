pub mod contact;
pub mod user;
pub mod vehicle;
