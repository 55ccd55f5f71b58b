use async_trait::async_trait;

use crate::error::Result;
use crate::geo::LatLng;
use crate::models::{ChangeType, Image};

/// A classified polygon reported by a detector. Its area is measured by the
/// engine, not by the detector.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedArea {
    pub coordinates: Vec<LatLng>,
    pub change_type: ChangeType,
}

/// Output of a change detection run
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedChange {
    /// Share of changed pixels, expected within [0, 100]
    pub change_percentage: f64,
    /// Storage reference of the rendered change map
    pub change_map: String,
    pub areas: Vec<DetectedArea>,
}

/// Port for change detection strategies
#[async_trait]
pub trait ChangeDetector: Send + Sync {
    /// Compare two images and report what changed
    async fn compute_change(&self, before: &Image, after: &Image) -> Result<DetectedChange>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
