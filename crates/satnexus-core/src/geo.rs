//! Geo module for coordinate handling and area computation

pub mod area;
pub mod coordinates;

pub use area::{area, area_with_mode, geodesic_area, AreaMode};
pub use coordinates::{CoordinateValidity, LatLng};
