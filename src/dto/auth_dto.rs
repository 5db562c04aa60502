use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::{User, UserRole};
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::{validate_signup_role, PHONE_REGEX};

use super::{normalize_email_field, trim_field, RequestBody};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        required(message = "Name is required"),
        length(min = 2, max = 50, message = "Name must be 2-50 characters")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Email is required"),
        email(message = "A valid email is required")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Password is required"),
        length(min = 6, max = 128, message = "Password must be at least 6 characters")
    )]
    pub password: Option<String>,

    #[validate(regex(path = "PHONE_REGEX", message = "Phone number is invalid"))]
    pub phone: Option<String>,

    #[validate(custom = "validate_signup_role")]
    pub role: Option<String>,
}

impl RequestBody for RegisterRequest {
    fn normalize(&mut self) {
        trim_field(&mut self.name);
        normalize_email_field(&mut self.email);
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "Email is required"),
        email(message = "A valid email is required")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Password is required"),
        length(min = 1, message = "Password is required")
    )]
    pub password: Option<String>,
}

impl RequestBody for LoginRequest {
    fn normalize(&mut self) {
        normalize_email_field(&mut self.email);
    }
}

/// Email and password of a checked credentials body.
pub fn credentials(
    email: Option<String>,
    password: Option<String>,
) -> AppResult<(String, String)> {
    Ok((
        email.ok_or_else(|| validation_error("email", "Email is required"))?,
        password.ok_or_else(|| validation_error("password", "Password is required"))?,
    ))
}

/// Account as shown to its owner; never includes the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub favorites: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            favorites: user.favorites,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_reports_every_missing_field() {
        let req: RegisterRequest = serde_json::from_value(json!({ "email": "x" })).unwrap();
        let errors = req.check().unwrap_err();
        let mut fields: Vec<_> = errors.field_errors().into_keys().collect();
        fields.sort_unstable();
        assert_eq!(fields, vec!["email", "name", "password"]);
    }

    #[test]
    fn login_email_is_normalized() {
        let mut req: LoginRequest = serde_json::from_value(json!({
            "email": "  Dealer@Example.COM ",
            "password": "secret"
        }))
        .unwrap();
        req.normalize();
        assert!(req.check().is_ok());
        let (email, _) = credentials(req.email, req.password).unwrap();
        assert_eq!(email, "dealer@example.com");
    }

    #[test]
    fn missing_credentials_are_a_bad_request() {
        assert!(credentials(None, Some("secret".into())).is_err());
    }
}
