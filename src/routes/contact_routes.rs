use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::controllers::contact_controller::ContactController;
use crate::dto::contact_dto::{CreateContactRequest, UpdateContactStatusRequest};
use crate::dto::ApiResponse;
use crate::middleware::{AuthenticatedUser, ValidatedJson};
use crate::models::contact::Contact;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::parse_id;

pub fn create_contact_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contacts).post(create_contact))
        .route("/:id/status", put(update_status))
}

async fn create_contact(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateContactRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Contact>>), AppError> {
    let controller = ContactController::new(state.repos.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_contacts(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<Contact>>>, AppError> {
    let controller = ContactController::new(state.repos.clone());
    Ok(Json(controller.list(&user).await?))
}

async fn update_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateContactStatusRequest>,
) -> Result<Json<ApiResponse<Contact>>, AppError> {
    let id = parse_id(&id)?;
    let controller = ContactController::new(state.repos.clone());
    Ok(Json(controller.set_status(&user, id, request).await?))
}
