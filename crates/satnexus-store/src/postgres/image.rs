use async_trait::async_trait;
use satnexus_core::error::{Result, SatnexusError};
use satnexus_core::models::{Image, ImageId};
use sqlx::types::Json;
use sqlx::Row;

use super::{to_sql_count, PostgresStore};
use crate::ports::ImageStore;

#[async_trait]
impl ImageStore for PostgresStore {
    async fn insert_image(&self, image: &Image) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO satellite_images
                (id, uploaded_by, latitude, longitude, date_taken, created_at, document)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(image.id.0)
        .bind(image.uploaded_by.as_str())
        .bind(image.coordinates.lat)
        .bind(image.coordinates.lng)
        .bind(image.date_taken)
        .bind(image.created_at)
        .bind(Json(image))
        .execute(self.pool())
        .await
        .map_err(|e| SatnexusError::storage(format!("Failed to insert image: {}", e)))?;

        Ok(())
    }

    async fn get_image(&self, id: ImageId) -> Result<Option<Image>> {
        let row = sqlx::query("SELECT document FROM satellite_images WHERE id = $1")
            .bind(id.0)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| SatnexusError::storage(format!("Failed to get image: {}", e)))?;

        row.map(|row| decode_image(&row)).transpose()
    }

    async fn list_images(&self, skip: u64, limit: u64) -> Result<Vec<Image>> {
        let rows = sqlx::query(
            r#"
            SELECT document
            FROM satellite_images
            ORDER BY created_at DESC, seq DESC
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(to_sql_count(skip))
        .bind(to_sql_count(limit))
        .fetch_all(self.pool())
        .await
        .map_err(|e| SatnexusError::storage(format!("Failed to list images: {}", e)))?;

        rows.iter().map(decode_image).collect()
    }

    async fn count_images(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM satellite_images")
            .fetch_one(self.pool())
            .await
            .map_err(|e| SatnexusError::storage(format!("Failed to count images: {}", e)))?;

        Ok(count.max(0) as u64)
    }
}

fn decode_image(row: &sqlx::postgres::PgRow) -> Result<Image> {
    let Json(image): Json<Image> = row
        .try_get("document")
        .map_err(|e| SatnexusError::Serialization(format!("Invalid image document: {}", e)))?;
    Ok(image)
}
