use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use satnexus_core::models::{ImageDetail, ImageForm, ImageId};
use satnexus_core::ports::UploadedFile;

use crate::auth::AuthUser;
use crate::dto::{ImageCreatedResponse, ImageListResponse, PageQuery};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImageCreatedResponse>), ApiError> {
    let (form, file) = read_upload(&mut multipart).await?;

    tracing::info!(
        owner = %user,
        filename = %file.file_name,
        size = file.bytes.len(),
        "Received image upload"
    );

    let image = state.catalog().upload(form, file, &user).await?;
    let image = state.catalog().describe(image).await?;

    Ok((StatusCode::CREATED, Json(ImageCreatedResponse::new(image))))
}

pub async fn list_images(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<ImageListResponse>, ApiError> {
    let Query(query) = query?;
    let request = query.to_page_request(state.default_page_size)?;

    let page = state.catalog().list_detailed(request).await?;

    Ok(Json(page.into()))
}

pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(image_id): Path<String>,
) -> Result<Json<ImageDetail>, ApiError> {
    let id = ImageId::parse(&image_id)?;
    let image = state.catalog().get_detailed(id).await?;
    Ok(Json(image))
}

/// Split the multipart form into metadata fields and the `image` file
async fn read_upload(multipart: &mut Multipart) -> Result<(ImageForm, UploadedFile), ApiError> {
    let mut form = ImageForm::default();
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        if name == "image" {
            let file_name = field.file_name().unwrap_or("").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            file = Some(UploadedFile { file_name, content_type, bytes: bytes.to_vec() });
            continue;
        }

        let slot = match name.as_str() {
            "title" => &mut form.title,
            "description" => &mut form.description,
            "lat" => &mut form.lat,
            "lng" => &mut form.lng,
            "dateTaken" => &mut form.date_taken,
            "tags" => &mut form.tags,
            _ => continue,
        };
        *slot = Some(field.text().await?);
    }

    let file = file.ok_or_else(|| {
        ApiError::bad_request("No image file provided")
            .with_details("Expected an 'image' field in the multipart form")
    })?;

    Ok((form, file))
}
