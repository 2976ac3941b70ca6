use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::User;
use crate::services::auth_service::RegisterRequest;
use crate::state::AppState;
use crate::utils::auth::CurrentUser;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
struct SessionPayload {
    user: User,
    token: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let (user, token) = state.auth.register(request).await?;
    Ok(created(SessionPayload { user, token }, "Registration successful"))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let (user, token) = state.auth.login(&request.email, &request.password).await?;
    Ok(success(SessionPayload { user, token }, "Login successful"))
}

pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Response, AppError> {
    state.auth.logout(&current.token).await?;
    Ok(empty_success("Logged out"))
}

pub async fn me(current: CurrentUser) -> Response {
    success(current.user, "Current user")
}
