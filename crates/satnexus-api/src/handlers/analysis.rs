use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use geojson::FeatureCollection;
use satnexus_core::models::{AnalysisDetail, AnalysisId};

use crate::auth::{AuthUser, MaybeUser};
use crate::dto::{AnalysisCreatedResponse, AnalysisListResponse, CreateAnalysisRequest, PageQuery};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create_analysis(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CreateAnalysisRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AnalysisCreatedResponse>), ApiError> {
    let Json(request) = payload?;
    let request = request.into_new_analysis()?;

    tracing::info!(
        owner = %user,
        before_image = %request.before_image,
        after_image = %request.after_image,
        "Creating change analysis"
    );

    let analysis = state.engine.create(request, &user).await?;

    Ok((StatusCode::CREATED, Json(AnalysisCreatedResponse::new(analysis))))
}

pub async fn list_analyses(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<AnalysisListResponse>, ApiError> {
    let Query(query) = query?;
    let request = query.to_page_request(state.default_page_size)?;

    let page = state.engine.list(user.as_ref(), request).await?;

    Ok(Json(page.into()))
}

pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(analysis_id): Path<String>,
) -> Result<Json<AnalysisDetail>, ApiError> {
    let id = AnalysisId::parse(&analysis_id)?;
    let analysis = state.engine.get(id, user.as_ref()).await?;
    Ok(Json(analysis))
}

pub async fn get_analysis_geojson(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(analysis_id): Path<String>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let id = AnalysisId::parse(&analysis_id)?;
    let collection = state.engine.change_areas_geojson(id, user.as_ref()).await?;
    Ok(Json(collection))
}
