use chrono::Utc;
use geojson::{feature, Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use satnexus_core::error::{Result, SatnexusError};
use satnexus_core::geo::{area_with_mode, AreaMode};
use satnexus_core::models::{
    AnalysisDetail, AnalysisFilter, AnalysisId, ChangeAnalysis, ChangeArea, Image, ImageId,
    NewAnalysis, Page, PageRequest, UserId,
};
use satnexus_core::ports::{ChangeDetector, Notification, Notifier, Topic};
use satnexus_store::ports::AnalysisStore;
use std::sync::Arc;

use crate::catalog::ImageCatalog;

/// Change analysis lifecycle: creation, visibility-filtered listing and
/// authorized retrieval
#[derive(Clone)]
pub struct ChangeAnalysisEngine {
    catalog: ImageCatalog,
    analyses: Arc<dyn AnalysisStore>,
    detector: Arc<dyn ChangeDetector>,
    notifier: Arc<dyn Notifier>,
    area_mode: AreaMode,
}

impl ChangeAnalysisEngine {
    pub fn new(
        catalog: ImageCatalog,
        analyses: Arc<dyn AnalysisStore>,
        detector: Arc<dyn ChangeDetector>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { catalog, analyses, detector, notifier, area_mode: AreaMode::default() }
    }

    /// Set how change area sizes are measured
    pub fn with_area_mode(mut self, mode: AreaMode) -> Self {
        self.area_mode = mode;
        self
    }

    pub fn catalog(&self) -> &ImageCatalog {
        &self.catalog
    }

    /// Run change detection on two cataloged images and persist the result
    /// as a private analysis owned by `requester`.
    pub async fn create(&self, request: NewAnalysis, requester: &UserId) -> Result<AnalysisDetail> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(SatnexusError::validation("Field 'title' is required"));
        }

        let before = self.catalog.get(request.before_image).await?;
        let after = self.catalog.get(request.after_image).await?;

        let detected = self.detector.compute_change(&before, &after).await?;
        let change_areas: Vec<ChangeArea> = detected
            .areas
            .into_iter()
            .map(|area| ChangeArea {
                area: area_with_mode(&area.coordinates, self.area_mode),
                coordinates: area.coordinates,
                change_type: area.change_type,
            })
            .collect();

        let now = Utc::now();
        let analysis = ChangeAnalysis {
            id: AnalysisId::new(),
            title: title.to_string(),
            description: request
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            before_image: before.id,
            after_image: after.id,
            change_map: detected.change_map,
            change_percentage: clamp_percentage(detected.change_percentage),
            change_areas,
            created_by: requester.clone(),
            is_public: false,
            created_at: now,
            updated_at: now,
        };

        self.analyses.insert_analysis(&analysis).await?;

        tracing::info!(
            analysis_id = %analysis.id,
            owner = %requester,
            detector = self.detector.name(),
            change_percentage = analysis.change_percentage,
            areas = analysis.change_areas.len(),
            "Change analysis created"
        );

        let creator = self.catalog.owners().summary(requester).await?;
        let detail = AnalysisDetail::populate(analysis, before, after, creator);
        self.broadcast(&detail);
        Ok(detail)
    }

    /// A page of analyses visible to the requester, newest first
    pub async fn list(
        &self,
        requester: Option<&UserId>,
        request: PageRequest,
    ) -> Result<Page<AnalysisDetail>> {
        let filter = AnalysisFilter::for_requester(requester);
        let total = self.analyses.count_analyses(&filter).await?;
        let analyses =
            self.analyses.find_analyses(&filter, request.skip(), request.limit() as u64).await?;

        let mut items = Vec::with_capacity(analyses.len());
        for analysis in analyses {
            items.push(self.populate(analysis).await?);
        }

        Ok(Page::new(items, total, request))
    }

    /// Fetch one analysis, enforcing private visibility
    pub async fn get(&self, id: AnalysisId, requester: Option<&UserId>) -> Result<AnalysisDetail> {
        let analysis = self.authorized(id, requester).await?;
        self.populate(analysis).await
    }

    /// Change areas of one analysis as a GeoJSON FeatureCollection
    pub async fn change_areas_geojson(
        &self,
        id: AnalysisId,
        requester: Option<&UserId>,
    ) -> Result<FeatureCollection> {
        let analysis = self.authorized(id, requester).await?;

        let features = analysis
            .change_areas
            .iter()
            .enumerate()
            .map(|(index, area)| change_area_feature(&analysis, index, area))
            .collect();

        Ok(FeatureCollection { bbox: None, features, foreign_members: None })
    }

    async fn authorized(&self, id: AnalysisId, requester: Option<&UserId>) -> Result<ChangeAnalysis> {
        let analysis = self
            .analyses
            .get_analysis(id)
            .await?
            .ok_or_else(|| SatnexusError::not_found("Analysis", id))?;

        if !analysis.is_visible_to(requester) {
            tracing::warn!(
                analysis_id = %id,
                requester = requester.map(UserId::as_str).unwrap_or("anonymous"),
                "Denied access to private analysis"
            );
            return Err(SatnexusError::forbidden("Analysis", id));
        }

        Ok(analysis)
    }

    async fn populate(&self, analysis: ChangeAnalysis) -> Result<AnalysisDetail> {
        let before = self.referenced_image(&analysis, analysis.before_image).await?;
        let after = self.referenced_image(&analysis, analysis.after_image).await?;
        let creator = self.catalog.owners().summary(&analysis.created_by).await?;
        Ok(AnalysisDetail::populate(analysis, before, after, creator))
    }

    async fn referenced_image(&self, analysis: &ChangeAnalysis, id: ImageId) -> Result<Image> {
        self.catalog.find(id).await?.ok_or_else(|| {
            SatnexusError::storage(format!(
                "Analysis {} references missing image {}",
                analysis.id, id
            ))
        })
    }

    /// Announce a new analysis on the global topic. Delivery problems never
    /// fail the create.
    fn broadcast(&self, detail: &AnalysisDetail) {
        let topic = Topic::Global;
        let notification = Notification::NewAnalysis(Box::new(detail.clone()));
        if let Err(e) = self.notifier.publish(topic, notification) {
            tracing::warn!(topic = %topic, error = %e, "Failed to publish notification");
        }
    }
}

/// Keep percentages within [0, 100]; NaN means nothing was measured
fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

fn change_area_feature(analysis: &ChangeAnalysis, index: usize, area: &ChangeArea) -> Feature {
    let mut ring: Vec<Vec<f64>> = area.coordinates.iter().map(|c| c.to_position().to_vec()).collect();
    // GeoJSON rings are closed
    if let Some(first) = ring.first().cloned() {
        if ring.last() != Some(&first) {
            ring.push(first);
        }
    }

    let mut properties = JsonObject::new();
    properties.insert("analysisId".to_string(), JsonValue::from(analysis.id.to_string()));
    properties.insert("changeType".to_string(), JsonValue::from(area.change_type.to_string()));
    properties.insert("area".to_string(), JsonValue::from(area.area));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        id: Some(feature::Id::String(format!("{}-{}", analysis.id, index))),
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_percentage() {
        assert_eq!(clamp_percentage(42.5), 42.5);
        assert_eq!(clamp_percentage(-3.0), 0.0);
        assert_eq!(clamp_percentage(250.0), 100.0);
        assert_eq!(clamp_percentage(f64::NAN), 0.0);
    }
}
