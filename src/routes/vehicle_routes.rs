use std::collections::HashMap;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateVehicleRequest, VehicleListData, VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::{AuthenticatedUser, ValidatedJson};
use crate::models::vehicle::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::parse_id;

use super::listing_query;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route(
            "/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
}

async fn list_vehicles(
    State(state): State<AppState>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<ApiResponse<VehicleListData>>, AppError> {
    let query = listing_query(params)?;
    let controller = VehicleController::new(state.repos.clone());
    Ok(Json(controller.list(query).await?))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let id = parse_id(&id)?;
    let controller = VehicleController::new(state.repos.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn create_vehicle(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vehicle>>), AppError> {
    let controller = VehicleController::new(state.repos.clone());
    let response = controller.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let id = parse_id(&id)?;
    let controller = VehicleController::new(state.repos.clone());
    Ok(Json(controller.update(&user, id, request).await?))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let id = parse_id(&id)?;
    let controller = VehicleController::new(state.repos.clone());
    Ok(Json(controller.delete(&user, id).await?))
}
