//! Change detection strategies
//!
//! No trained model ships with SatNexus. [`SimulatedDetector`] is the default
//! [`ChangeDetector`] and produces plausible but synthetic output; replace it
//! with a real implementation of the trait to analyze actual imagery.

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use satnexus_core::error::Result;
use satnexus_core::geo::LatLng;
use satnexus_core::models::{ChangeType, Image};
use satnexus_core::ports::{ChangeDetector, DetectedArea, DetectedChange};

/// Synthetic detector for demos and development.
///
/// Reports a random change percentage and a single deforestation square
/// just north-east of the before image's location.
#[derive(Debug, Clone)]
pub struct SimulatedDetector {
    map_prefix: String,
}

impl SimulatedDetector {
    pub fn new() -> Self {
        Self { map_prefix: "/uploads".to_string() }
    }

    /// Base path for generated change map references
    pub fn with_map_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.map_prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    fn change_square(origin: LatLng) -> Vec<LatLng> {
        vec![
            origin.offset(0.001, 0.001),
            origin.offset(0.002, 0.001),
            origin.offset(0.002, 0.002),
            origin.offset(0.001, 0.002),
        ]
    }
}

impl Default for SimulatedDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn random_percentage() -> f64 {
    rand::thread_rng().gen_range(0.0..100.0)
}

#[async_trait]
impl ChangeDetector for SimulatedDetector {
    async fn compute_change(&self, before: &Image, _after: &Image) -> Result<DetectedChange> {
        let change_percentage = random_percentage();
        let change_map =
            format!("{}/change-map-{}.png", self.map_prefix, Utc::now().timestamp_millis());

        Ok(DetectedChange {
            change_percentage,
            change_map,
            areas: vec![DetectedArea {
                coordinates: Self::change_square(before.coordinates),
                change_type: ChangeType::Deforestation,
            }],
        })
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
