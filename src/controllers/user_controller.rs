use uuid::Uuid;

use crate::dto::auth_dto::UserResponse;
use crate::dto::user_dto::UpdateProfileRequest;
use crate::dto::vehicle_dto::VehicleSummary;
use crate::dto::ApiResponse;
use crate::middleware::AuthenticatedUser;
use crate::repositories::Repositories;
use crate::utils::errors::{not_found_error, AppResult};

pub struct UserController {
    repos: Repositories,
}

impl UserController {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// References to vehicles deleted since they were favorited are skipped.
    pub async fn favorites(
        &self,
        user: &AuthenticatedUser,
    ) -> AppResult<ApiResponse<Vec<VehicleSummary>>> {
        let account = self
            .repos
            .users
            .find_by_id(user.id)
            .await?
            .ok_or_else(|| not_found_error("User"))?;

        let vehicles = self.repos.vehicles.find_by_ids(&account.favorites).await?;
        Ok(ApiResponse::success(
            vehicles.into_iter().map(VehicleSummary::from).collect(),
        ))
    }

    pub async fn add_favorite(
        &self,
        user: &AuthenticatedUser,
        vehicle_id: Uuid,
    ) -> AppResult<ApiResponse<Vec<Uuid>>> {
        self.repos
            .vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))?;

        let account = self
            .repos
            .users
            .add_favorite(user.id, vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("User"))?;
        Ok(ApiResponse::success_with_message(
            account.favorites,
            "Vehicle added to favorites",
        ))
    }

    pub async fn remove_favorite(
        &self,
        user: &AuthenticatedUser,
        vehicle_id: Uuid,
    ) -> AppResult<ApiResponse<Vec<Uuid>>> {
        let account = self
            .repos
            .users
            .remove_favorite(user.id, vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("User"))?;
        Ok(ApiResponse::success_with_message(
            account.favorites,
            "Vehicle removed from favorites",
        ))
    }

    pub async fn update_profile(
        &self,
        user: &AuthenticatedUser,
        request: UpdateProfileRequest,
    ) -> AppResult<ApiResponse<UserResponse>> {
        let account = self
            .repos
            .users
            .update_profile(user.id, request.name, request.phone)
            .await?
            .ok_or_else(|| not_found_error("User"))?;
        Ok(ApiResponse::success_with_message(
            account.into(),
            "Profile updated successfully",
        ))
    }
}
