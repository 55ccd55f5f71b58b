use async_trait::async_trait;
use satnexus_core::error::{Result, SatnexusError};
use satnexus_core::models::{AnalysisFilter, AnalysisId, ChangeAnalysis};
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder, Row};

use super::{to_sql_count, PostgresStore};
use crate::ports::AnalysisStore;

/// Append the visibility predicate for `filter` to a query
fn push_filter<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a AnalysisFilter) {
    match filter {
        AnalysisFilter::All => {}
        AnalysisFilter::PublicOnly => {
            builder.push(" WHERE is_public = TRUE");
        }
        AnalysisFilter::VisibleTo(user) => {
            builder.push(" WHERE (is_public = TRUE OR created_by = ");
            builder.push_bind(user.as_str());
            builder.push(")");
        }
    }
}

#[async_trait]
impl AnalysisStore for PostgresStore {
    async fn insert_analysis(&self, analysis: &ChangeAnalysis) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO change_analyses
                (id, before_image, after_image, created_by, is_public, created_at, document)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(analysis.id.0)
        .bind(analysis.before_image.0)
        .bind(analysis.after_image.0)
        .bind(analysis.created_by.as_str())
        .bind(analysis.is_public)
        .bind(analysis.created_at)
        .bind(Json(analysis))
        .execute(self.pool())
        .await
        .map_err(|e| SatnexusError::storage(format!("Failed to insert analysis: {}", e)))?;

        Ok(())
    }

    async fn get_analysis(&self, id: AnalysisId) -> Result<Option<ChangeAnalysis>> {
        let row = sqlx::query("SELECT document FROM change_analyses WHERE id = $1")
            .bind(id.0)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| SatnexusError::storage(format!("Failed to get analysis: {}", e)))?;

        row.map(|row| decode_analysis(&row)).transpose()
    }

    async fn find_analyses(
        &self,
        filter: &AnalysisFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ChangeAnalysis>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT document FROM change_analyses");
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC, seq DESC OFFSET ");
        builder.push_bind(to_sql_count(skip));
        builder.push(" LIMIT ");
        builder.push_bind(to_sql_count(limit));

        let rows = builder
            .build()
            .fetch_all(self.pool())
            .await
            .map_err(|e| SatnexusError::storage(format!("Failed to list analyses: {}", e)))?;

        rows.iter().map(decode_analysis).collect()
    }

    async fn count_analyses(&self, filter: &AnalysisFilter) -> Result<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM change_analyses");
        push_filter(&mut builder, filter);

        let count: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(self.pool())
            .await
            .map_err(|e| SatnexusError::storage(format!("Failed to count analyses: {}", e)))?;

        Ok(count.max(0) as u64)
    }
}

fn decode_analysis(row: &sqlx::postgres::PgRow) -> Result<ChangeAnalysis> {
    let Json(analysis): Json<ChangeAnalysis> = row
        .try_get("document")
        .map_err(|e| SatnexusError::Serialization(format!("Invalid analysis document: {}", e)))?;
    Ok(analysis)
}
