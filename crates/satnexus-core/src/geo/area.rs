//! Polygon area computation.
//!
//! The planar calculator treats degrees as Cartesian units, which is only a
//! reasonable approximation for small regions. The geodesic mode measures the
//! same ring on the WGS 84 ellipsoid and returns square meters.

use ::geo::{GeodesicArea, LineString, Polygon};
use serde::{Deserialize, Serialize};

use super::coordinates::LatLng;

/// How change-area polygons are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AreaMode {
    /// Shoelace formula over raw lat/lng degrees
    #[default]
    Planar,
    /// Ellipsoidal area in square meters
    Geodesic,
}

/// Planar area of the polygon described by `vertices` (shoelace formula).
///
/// Returns 0 for fewer than 3 vertices. The ring is closed implicitly, so the
/// first vertex should not be repeated at the end (repeating it adds a
/// zero-length edge and does not change the result).
pub fn area(vertices: &[LatLng]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        sum += a.lng * b.lat - b.lng * a.lat;
    }

    sum.abs() / 2.0
}

/// Geodesic area in square meters. Returns 0 for fewer than 3 vertices.
pub fn geodesic_area(vertices: &[LatLng]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }

    let ring: LineString<f64> = vertices.iter().map(|v| (v.lng, v.lat)).collect::<Vec<_>>().into();
    Polygon::new(ring, vec![]).geodesic_area_unsigned()
}

pub fn area_with_mode(vertices: &[LatLng], mode: AreaMode) -> f64 {
    match mode {
        AreaMode::Planar => area(vertices),
        AreaMode::Geodesic => geodesic_area(vertices),
    }
}
