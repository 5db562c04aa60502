use std::collections::HashMap;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::user_controller::UserController;
use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::auth_dto::UserResponse;
use crate::dto::user_dto::UpdateProfileRequest;
use crate::dto::vehicle_dto::{VehicleListData, VehicleSummary};
use crate::dto::ApiResponse;
use crate::middleware::{AuthenticatedUser, ValidatedJson};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::parse_id;

use super::listing_query;

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites))
        .route(
            "/favorites/:vehicle_id",
            post(add_favorite).delete(remove_favorite),
        )
        .route("/profile", put(update_profile))
        .route("/vehicles", get(my_vehicles))
}

async fn list_favorites(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<VehicleSummary>>>, AppError> {
    let controller = UserController::new(state.repos.clone());
    Ok(Json(controller.favorites(&user).await?))
}

async fn add_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Uuid>>>, AppError> {
    let vehicle_id = parse_id(&vehicle_id)?;
    let controller = UserController::new(state.repos.clone());
    Ok(Json(controller.add_favorite(&user, vehicle_id).await?))
}

async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(vehicle_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Uuid>>>, AppError> {
    let vehicle_id = parse_id(&vehicle_id)?;
    let controller = UserController::new(state.repos.clone());
    Ok(Json(controller.remove_favorite(&user, vehicle_id).await?))
}

async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state.repos.clone());
    Ok(Json(controller.update_profile(&user, request).await?))
}

async fn my_vehicles(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<ApiResponse<VehicleListData>>, AppError> {
    let query = listing_query(params)?;
    let controller = VehicleController::new(state.repos.clone());
    Ok(Json(controller.list_owned(&user, query).await?))
}
