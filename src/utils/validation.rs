//! Validation helpers
//!
//! Field validators used by the request DTOs, plus identifier parsing.

use chrono::Datelike;
use lazy_static::lazy_static;
use regex::Regex;
use strum::IntoEnumIterator;
use uuid::Uuid;
use validator::ValidationError;

use crate::models::contact::{ContactStatus, InquiryType};
use crate::models::user::UserRole;
use crate::models::vehicle::{Badge, BodyType, Condition, FuelType, Transmission, VehicleStatus};
use crate::utils::errors::{field_error, AppError};

pub const MIN_YEAR: i32 = 1900;

lazy_static! {
    /// Digits with optional leading `+` and common separators.
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 ()\-.]{5,19}$").unwrap();
}

/// Newest model year a listing may carry: next calendar year.
pub fn max_model_year() -> i32 {
    chrono::Utc::now().year() + 1
}

pub fn check_year(year: i32) -> Result<(), ValidationError> {
    let max = max_model_year();
    if (MIN_YEAR..=max).contains(&year) {
        Ok(())
    } else {
        Err(field_error(
            "range",
            format!("Year must be between {} and {}", MIN_YEAR, max),
        ))
    }
}

fn one_of<E>(value: &str, field: &'static str) -> Result<(), ValidationError>
where
    E: IntoEnumIterator + AsRef<str>,
{
    if E::iter().any(|v| v.as_ref() == value) {
        return Ok(());
    }
    let allowed: Vec<String> = E::iter().map(|v| v.as_ref().to_string()).collect();
    Err(field_error(
        "enum",
        format!("{} must be one of: {}", field, allowed.join(", ")),
    ))
}

pub fn validate_fuel_type(value: &str) -> Result<(), ValidationError> {
    one_of::<FuelType>(value, "fuelType")
}

pub fn validate_transmission(value: &str) -> Result<(), ValidationError> {
    one_of::<Transmission>(value, "transmission")
}

pub fn validate_body_type(value: &str) -> Result<(), ValidationError> {
    one_of::<BodyType>(value, "bodyType")
}

pub fn validate_condition(value: &str) -> Result<(), ValidationError> {
    one_of::<Condition>(value, "condition")
}

pub fn validate_vehicle_status(value: &str) -> Result<(), ValidationError> {
    one_of::<VehicleStatus>(value, "status")
}

pub fn validate_badge(value: &str) -> Result<(), ValidationError> {
    one_of::<Badge>(value, "badge")
}

pub fn validate_contact_status(value: &str) -> Result<(), ValidationError> {
    one_of::<ContactStatus>(value, "status")
}

pub fn validate_inquiry_type(value: &str) -> Result<(), ValidationError> {
    one_of::<InquiryType>(value, "inquiryType")
}

/// Only consumer and dealer accounts can be self-registered.
pub fn validate_signup_role(value: &str) -> Result<(), ValidationError> {
    match value.parse::<UserRole>() {
        Ok(UserRole::User) | Ok(UserRole::Dealer) => Ok(()),
        _ => Err(field_error("enum", "role must be one of: user, dealer")),
    }
}

/// Parses an enum field that already passed validation.
pub fn parse_validated<T: std::str::FromStr>(value: &str, field: &str) -> Result<T, AppError> {
    value
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid value for {}", field)))
}

/// Malformed identifiers are an input error, not a server fault.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid id format: '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_bounds_follow_the_calendar() {
        let next = max_model_year();
        assert!(check_year(1899).is_err());
        assert!(check_year(1900).is_ok());
        assert!(check_year(next).is_ok());
        assert!(check_year(next + 1).is_err());
    }

    #[test]
    fn enum_validators_list_allowed_values() {
        assert!(validate_fuel_type("Electric").is_ok());
        let err = validate_fuel_type("Coal").unwrap_err();
        assert_eq!(
            err.message.unwrap(),
            "fuelType must be one of: Petrol, Diesel, Hybrid, Electric, CNG, LPG"
        );
        assert!(validate_condition("Certified Pre-Owned").is_ok());
        assert!(validate_contact_status("in_progress").is_ok());
    }

    #[test]
    fn admin_cannot_be_self_assigned() {
        assert!(validate_signup_role("dealer").is_ok());
        assert!(validate_signup_role("admin").is_err());
    }

    #[test]
    fn phone_regex_accepts_common_formats() {
        assert!(PHONE_REGEX.is_match("+1 (555) 123-4567"));
        assert!(PHONE_REGEX.is_match("5551234567"));
        assert!(!PHONE_REGEX.is_match("call me"));
    }

    #[test]
    fn malformed_ids_are_bad_requests() {
        assert!(matches!(parse_id("not-a-uuid"), Err(AppError::BadRequest(_))));
        assert!(parse_id(&Uuid::new_v4().to_string()).is_ok());
    }
}
