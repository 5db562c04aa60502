use crate::dto::auth_dto::{credentials, AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::dto::ApiResponse;
use crate::middleware::AuthenticatedUser;
use crate::models::user::{User, UserRole};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};
use crate::utils::jwt::generate_token;
use crate::utils::validation::parse_validated;

pub struct AuthController {
    state: AppState,
}

impl AuthController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<ApiResponse<AuthResponse>> {
        let name = request
            .name
            .ok_or_else(|| validation_error("name", "Name is required"))?;
        let (email, password) = credentials(request.email, request.password)?;
        if self.state.repos.users.email_exists(&email).await? {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let role = match request.role.as_deref() {
            Some(raw) => parse_validated::<UserRole>(raw, "role")?,
            None => UserRole::default(),
        };

        let cost = self.state.config.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| AppError::Hash(e.to_string()))?;

        let user = User::new(
            name,
            email,
            password_hash,
            request.phone,
            role,
        );
        let user = self.state.repos.users.create(user).await?;
        let token = generate_token(user.id, user.role, &self.state.jwt)?;

        tracing::info!("Registered {} account {}", user.role, user.id);
        Ok(ApiResponse::success_with_message(
            AuthResponse {
                token,
                user: user.into(),
            },
            "User registered successfully",
        ))
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<ApiResponse<AuthResponse>> {
        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let (email, password) = credentials(request.email, request.password)?;
        let user = self
            .state
            .repos
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid)?;

        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| AppError::Hash(e.to_string()))?;
        if !matches {
            tracing::warn!("Failed login for {}", user.id);
            return Err(invalid());
        }

        let token = generate_token(user.id, user.role, &self.state.jwt)?;
        Ok(ApiResponse::success_with_message(
            AuthResponse {
                token,
                user: user.into(),
            },
            "Login successful",
        ))
    }

    pub async fn me(&self, caller: &AuthenticatedUser) -> AppResult<ApiResponse<UserResponse>> {
        let user = self
            .state
            .repos
            .users
            .find_by_id(caller.id)
            .await?
            .ok_or_else(|| not_found_error("User"))?;
        Ok(ApiResponse::success(user.into()))
    }
}
