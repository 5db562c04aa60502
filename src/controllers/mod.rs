pub mod auth_controller;
pub mod contact_controller;
pub mod user_controller;
pub mod vehicle_controller;
