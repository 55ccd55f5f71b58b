use serde::{Deserialize, Serialize};

use crate::error::{Result, SatnexusError};

/// A WGS 84 position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Offset this position by the given deltas in degrees
    pub fn offset(&self, d_lat: f64, d_lng: f64) -> Self {
        Self::new(self.lat + d_lat, self.lng + d_lng)
    }

    /// `[lng, lat]` pair, the GeoJSON axis order
    pub fn to_position(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    pub fn in_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Check the position against a validity mode
    pub fn validate(&self, mode: CoordinateValidity) -> Result<()> {
        if !self.is_finite() {
            return Err(SatnexusError::validation("Coordinates must be finite numbers"));
        }

        if mode == CoordinateValidity::Strict && !self.in_bounds() {
            return Err(SatnexusError::validation(format!(
                "Coordinates out of range: lat {} must be within [-90, 90] and lng {} within [-180, 180]",
                self.lat, self.lng
            )));
        }

        Ok(())
    }
}

/// Coordinate validation mode for uploaded images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CoordinateValidity {
    /// Reject latitudes outside [-90, 90] and longitudes outside [-180, 180]
    #[default]
    Strict,
    /// Accept any finite coordinate pair
    Lenient,
}
