use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::contact::{ContactStatus, InquiryType, NewContact};
use crate::utils::errors::{field_error, validation_error, AppResult};
use crate::utils::validation::{
    parse_validated, validate_contact_status, validate_inquiry_type, PHONE_REGEX,
};

use super::{normalize_email_field, trim_field, RequestBody};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    #[validate(required(message = "Vehicle id is required"))]
    pub vehicle_id: Option<String>,

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

    #[validate(regex(path = "PHONE_REGEX", message = "Phone number is invalid"))]
    pub phone: Option<String>,

    #[validate(
        required(message = "Subject is required"),
        length(min = 1, max = 100, message = "Subject must be 1-100 characters")
    )]
    pub subject: Option<String>,

    #[validate(
        required(message = "Message is required"),
        length(min = 10, max = 1000, message = "Message must be 10-1000 characters")
    )]
    pub message: Option<String>,

    #[validate(custom = "validate_inquiry_type")]
    pub inquiry_type: Option<String>,
}

impl RequestBody for CreateContactRequest {
    fn normalize(&mut self) {
        trim_field(&mut self.name);
        normalize_email_field(&mut self.email);
    }

    fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        if let Some(raw) = &self.vehicle_id {
            if Uuid::parse_str(raw).is_err() {
                errors.add("vehicle_id", field_error("format", "Vehicle id is malformed"));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl CreateContactRequest {
    pub fn vehicle_id(&self) -> AppResult<Uuid> {
        self.vehicle_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or_else(|| validation_error("vehicleId", "Vehicle id is malformed"))
    }

    pub fn inquiry_type(&self) -> AppResult<InquiryType> {
        match &self.inquiry_type {
            Some(raw) => parse_validated(raw, "inquiryType"),
            None => Ok(InquiryType::default()),
        }
    }

    /// The inquiry as stored, addressed to the dealer who owns the vehicle.
    pub fn into_new_contact(self, vehicle_id: Uuid, dealer_id: Uuid) -> AppResult<NewContact> {
        let inquiry_type = self.inquiry_type()?;
        Ok(NewContact {
            vehicle_id,
            dealer_id,
            name: self.name.ok_or_else(|| validation_error("name", "Name is required"))?,
            email: self.email.ok_or_else(|| validation_error("email", "Email is required"))?,
            phone: self.phone,
            subject: self
                .subject
                .ok_or_else(|| validation_error("subject", "Subject is required"))?,
            message: self
                .message
                .ok_or_else(|| validation_error("message", "Message is required"))?,
            inquiry_type,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContactStatusRequest {
    #[validate(custom = "validate_contact_status")]
    pub status: String,
}

impl RequestBody for UpdateContactStatusRequest {}

impl UpdateContactStatusRequest {
    pub fn status(&self) -> AppResult<ContactStatus> {
        parse_validated(&self.status, "status")
    }
}
