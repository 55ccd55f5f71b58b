use crate::cli::AreaArgs;
use crate::output::OutputWriter;
use anyhow::{anyhow, bail, Result};
use satnexus_core::config::LayeredConfig;
use satnexus_core::geo::{area_with_mode, AreaMode, LatLng};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AreaReport {
    mode: AreaMode,
    unit: &'static str,
    vertices: Vec<LatLng>,
    area: f64,
}

/// Measure the polygon given on the command line
pub fn execute(args: AreaArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let vertices = args.vertices.iter().map(|raw| parse_vertex(raw)).collect::<Result<Vec<_>>>()?;
    if let Some(bad) = vertices.iter().find(|v| !v.is_finite()) {
        bail!("Vertex {},{} is not a finite coordinate", bad.lat, bad.lng);
    }

    let mode = args.mode.map(AreaMode::from).unwrap_or(config.area_mode.value);

    if vertices.len() < 3 {
        output.warning("Fewer than 3 vertices describe no area");
    }

    let report = AreaReport {
        mode,
        unit: unit(mode),
        area: area_with_mode(&vertices, mode),
        vertices,
    };

    if output.is_json() {
        return output.result(report);
    }

    output.kv("Vertices", report.vertices.len());
    output.kv("Mode", format!("{:?}", report.mode));
    output.success(format!("Area: {} {}", report.area, report.unit));
    Ok(())
}

fn unit(mode: AreaMode) -> &'static str {
    match mode {
        AreaMode::Planar => "deg²",
        AreaMode::Geodesic => "m²",
    }
}

/// Parse a `lat,lng` pair
fn parse_vertex(raw: &str) -> Result<LatLng> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| anyhow!("Invalid vertex '{}': expected LAT,LNG", raw))?;

    let lat: f64 =
        lat.trim().parse().map_err(|_| anyhow!("Invalid latitude in vertex '{}'", raw))?;
    let lng: f64 =
        lng.trim().parse().map_err(|_| anyhow!("Invalid longitude in vertex '{}'", raw))?;

    Ok(LatLng::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vertex() {
        let v = parse_vertex("34.0522, -118.2437").unwrap();
        assert_eq!(v, LatLng::new(34.0522, -118.2437));
    }

    #[test]
    fn test_parse_vertex_rejects_malformed() {
        assert!(parse_vertex("34.0522").is_err());
        assert!(parse_vertex("north,-118").is_err());
        assert!(parse_vertex("34,west").is_err());
    }

    #[test]
    fn test_unit_follows_mode() {
        assert_eq!(unit(AreaMode::Planar), "deg²");
        assert_eq!(unit(AreaMode::Geodesic), "m²");
    }
}
