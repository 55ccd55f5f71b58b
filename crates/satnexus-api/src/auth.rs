//! Request identity extractors

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use satnexus_core::models::UserId;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;

/// Identity of a request that must be authenticated
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserId);

/// Identity of a request where authentication is optional
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<UserId>);

fn authorization(parts: &Parts) -> Option<&str> {
    parts.headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok())
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = state.access.require(authorization(parts)).await?;
        Ok(AuthUser(user))
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(state.access.resolve(authorization(parts)).await))
    }
}
