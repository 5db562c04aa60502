use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::PHONE_REGEX;

use super::{trim_field, RequestBody};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 50, message = "Name must be 2-50 characters"))]
    pub name: Option<String>,

    #[validate(regex(path = "PHONE_REGEX", message = "Phone number is invalid"))]
    pub phone: Option<String>,
}

impl RequestBody for UpdateProfileRequest {
    fn normalize(&mut self) {
        trim_field(&mut self.name);
    }
}
