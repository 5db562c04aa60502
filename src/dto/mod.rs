//! Request and response shapes
//!
//! Field names on the wire are camelCase.

pub mod api_response;
pub mod auth_dto;
pub mod contact_dto;
pub mod user_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;

use validator::{Validate, ValidationErrors};

/// Body-level validation run by `ValidatedJson`. Defaults to the derived
/// `Validate`; bodies with cross-field or calendar-dependent rules extend it.
pub trait RequestBody: Validate {
    /// Runs before `check`, so length rules see the stored form.
    fn normalize(&mut self) {}

    fn check(&self) -> Result<(), ValidationErrors> {
        self.validate()
    }
}

pub(crate) fn trim_field(value: &mut Option<String>) {
    if let Some(v) = value {
        *v = v.trim().to_string();
    }
}

pub(crate) fn normalize_email_field(value: &mut Option<String>) {
    if let Some(v) = value {
        *v = v.trim().to_lowercase();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimming_leaves_inner_spaces() {
        let mut name = Some("  Ana Lopez \t".to_string());
        trim_field(&mut name);
        assert_eq!(name.as_deref(), Some("Ana Lopez"));

        let mut email = Some(" Ana@Example.COM ".to_string());
        normalize_email_field(&mut email);
        assert_eq!(email.as_deref(), Some("ana@example.com"));

        let mut missing = None;
        trim_field(&mut missing);
        assert!(missing.is_none());
    }
}
