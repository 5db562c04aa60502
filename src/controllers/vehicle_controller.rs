use serde_json::json;
use uuid::Uuid;

use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateVehicleRequest, VehicleListData, VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::AuthenticatedUser;
use crate::models::user::UserRole;
use crate::models::vehicle::Vehicle;
use crate::repositories::Repositories;
use crate::services::listing::{ListingQuery, PageInfo, VehicleFilter};
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct VehicleController {
    repos: Repositories,
}

impl VehicleController {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Attaches dealer summaries with one lookup for the whole page.
    async fn with_dealers(&self, vehicles: Vec<Vehicle>) -> AppResult<Vec<VehicleResponse>> {
        let mut dealer_ids: Vec<Uuid> = vehicles.iter().map(|v| v.dealer_id).collect();
        dealer_ids.sort_unstable();
        dealer_ids.dedup();

        let dealers = self.repos.users.dealer_summaries(&dealer_ids).await?;
        Ok(vehicles
            .into_iter()
            .map(|v| VehicleResponse::new(v, &dealers))
            .collect())
    }

    /// Count and page fetch are two separate reads; under concurrent writes
    /// the totals can briefly disagree with the page contents.
    async fn page(
        &self,
        filter: &VehicleFilter,
        query: &ListingQuery,
    ) -> AppResult<VehicleListData> {
        let total = self.repos.vehicles.count(filter).await?;
        let vehicles = self
            .repos
            .vehicles
            .find(filter, query.sort, query.pagination)
            .await?;

        Ok(VehicleListData {
            vehicles: self.with_dealers(vehicles).await?,
            pagination: PageInfo::new(query.pagination, total),
        })
    }

    pub async fn list(&self, query: ListingQuery) -> AppResult<ApiResponse<VehicleListData>> {
        let data = self.page(&query.filter, &query).await?;
        tracing::debug!(
            "Listing page {} returned {} of {} vehicles",
            query.pagination.page,
            data.vehicles.len(),
            data.pagination.total_vehicles
        );
        Ok(ApiResponse::success(data))
    }

    /// A dealer's own listings, whatever their visibility. The requested
    /// filters still narrow the result.
    pub async fn list_owned(
        &self,
        user: &AuthenticatedUser,
        query: ListingQuery,
    ) -> AppResult<ApiResponse<VehicleListData>> {
        user.require_role(&[UserRole::Dealer, UserRole::Admin])?;
        let filter = query.filter.for_dealer(user.id);
        Ok(ApiResponse::success(self.page(&filter, &query).await?))
    }

    /// Returns the record as read, then counts the view.
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ApiResponse<VehicleResponse>> {
        let vehicle = self
            .repos
            .vehicles
            .find_by_id(id)
            .await?
            .filter(|v| v.is_active)
            .ok_or_else(|| not_found_error("Vehicle"))?;

        self.repos.vehicles.increment_views(id).await?;

        let mut resolved = self.with_dealers(vec![vehicle]).await?;
        let response = resolved
            .pop()
            .ok_or_else(|| AppError::Internal("Vehicle lost during resolution".to_string()))?;
        Ok(ApiResponse::success(response))
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateVehicleRequest,
    ) -> AppResult<ApiResponse<Vehicle>> {
        user.require_role(&[UserRole::Dealer, UserRole::Admin])?;

        let vehicle = self
            .repos
            .vehicles
            .create(request.into_new_vehicle(user.id)?)
            .await?;

        tracing::info!(
            "Vehicle {} created by {} ({} {} {})",
            vehicle.id,
            user.id,
            vehicle.year,
            vehicle.make,
            vehicle.model
        );
        Ok(ApiResponse::success_with_message(vehicle, "Vehicle created successfully"))
    }

    async fn managed(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<Vehicle> {
        let vehicle = self
            .repos
            .vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))?;

        if !user.can_manage(&vehicle) {
            return Err(AppError::Forbidden(
                "Not authorized to modify this vehicle".to_string(),
            ));
        }
        Ok(vehicle)
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> AppResult<ApiResponse<Vehicle>> {
        self.managed(user, id).await?;

        let vehicle = self
            .repos
            .vehicles
            .update(id, request.into_changes()?)
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))?;

        tracing::info!("Vehicle {} updated by {}", id, user.id);
        Ok(ApiResponse::success_with_message(vehicle, "Vehicle updated successfully"))
    }

    pub async fn delete(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> AppResult<ApiResponse<serde_json::Value>> {
        self.managed(user, id).await?;

        if !self.repos.vehicles.delete(id).await? {
            return Err(not_found_error("Vehicle"));
        }

        tracing::info!("Vehicle {} deleted by {}", id, user.id);
        Ok(ApiResponse::success_with_message(
            json!({ "id": id }),
            "Vehicle deleted successfully",
        ))
    }
}
