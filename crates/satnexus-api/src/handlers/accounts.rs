use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use satnexus_core::models::{Credentials, Registration};

use crate::auth::AuthUser;
use crate::dto::{ProfileResponse, SessionResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Registration>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let Json(registration) = payload?;
    let session = state.accounts.register(registration).await?;

    Ok((StatusCode::CREATED, Json(SessionResponse::new("User registered successfully", session))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Json(credentials) = payload?;
    let session = state.accounts.login(credentials).await?;

    Ok(Json(SessionResponse::new("Login successful", session)))
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state.accounts.profile(&user).await?;
    Ok(Json(ProfileResponse { user }))
}
