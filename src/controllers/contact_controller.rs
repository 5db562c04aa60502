use uuid::Uuid;

use crate::dto::contact_dto::{CreateContactRequest, UpdateContactStatusRequest};
use crate::dto::ApiResponse;
use crate::middleware::AuthenticatedUser;
use crate::models::contact::Contact;
use crate::models::user::UserRole;
use crate::repositories::Repositories;
use crate::utils::errors::{not_found_error, AppResult};

pub struct ContactController {
    repos: Repositories,
}

impl ContactController {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// The dealer is copied from the referenced vehicle; an inquiry about a
    /// vehicle that does not exist is rejected.
    pub async fn create(&self, request: CreateContactRequest) -> AppResult<ApiResponse<Contact>> {
        let vehicle_id = request.vehicle_id()?;

        let vehicle = self
            .repos
            .vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))?;

        let contact = self
            .repos
            .contacts
            .create(request.into_new_contact(vehicle.id, vehicle.dealer_id)?)
            .await?;

        tracing::info!("Inquiry {} created for vehicle {}", contact.id, vehicle.id);
        Ok(ApiResponse::success_with_message(
            contact,
            "Inquiry submitted successfully",
        ))
    }

    /// Dealers see their own inquiries, admins see all of them.
    pub async fn list(&self, user: &AuthenticatedUser) -> AppResult<ApiResponse<Vec<Contact>>> {
        user.require_role(&[UserRole::Dealer, UserRole::Admin])?;
        let scope = if user.is_admin() { None } else { Some(user.id) };
        let contacts = self.repos.contacts.list(scope).await?;
        Ok(ApiResponse::success(contacts))
    }

    pub async fn set_status(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateContactStatusRequest,
    ) -> AppResult<ApiResponse<Contact>> {
        user.require_role(&[UserRole::Admin])?;
        let status = request.status()?;

        let contact = self
            .repos
            .contacts
            .set_status(id, status)
            .await?
            .ok_or_else(|| not_found_error("Inquiry"))?;

        tracing::info!("Inquiry {} moved to {}", id, status);
        Ok(ApiResponse::success_with_message(
            contact,
            "Inquiry status updated",
        ))
    }
}
