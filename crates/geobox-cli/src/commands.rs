//! Subcommand implementations.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use geobox::{
    geobox_intersection_conservative, geobox_union_conservative, Crs, GeoBox, GeoBoxSpec,
    GeoError, Geometry, ReprojectOptions,
};
use serde_json::Value;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    Union,
    Intersection,
}

/// Parse a `Y,X` pair.
pub fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let (y, x) = s
        .split_once(',')
        .ok_or_else(|| format!("expected Y,X, got {:?}", s))?;
    let number = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid number {:?}: {}", v, e))
    };
    Ok((number(y)?, number(x)?))
}

/// Prefix the stable error code so scripts can match on it.
fn coded(err: GeoError) -> anyhow::Error {
    anyhow!("{}: {}", err.code(), err)
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))
}

/// Load a YAML list of grid descriptions.
pub fn load_grids(path: &Path) -> Result<Vec<GeoBox>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let specs: Vec<GeoBoxSpec> = serde_yaml::from_str(&text)
        .with_context(|| format!("Failed to parse grid list from {}", path.display()))?;
    specs
        .into_iter()
        .map(|spec| GeoBox::try_from(spec).map_err(coded))
        .collect()
}

pub fn from_geojson(
    input: &Path,
    crs: &str,
    resolution: (f64, f64),
    to_crs: Option<&str>,
    align: Option<(f64, f64)>,
) -> Result<GeoBoxSpec> {
    let crs = Crs::new(crs).map_err(coded)?;
    let geometry = Geometry::from_geojson(&read_json(input)?, Some(crs)).map_err(coded)?;
    let target = to_crs.map(|c| Crs::new(c)).transpose().map_err(coded)?;

    let geobox = GeoBox::from_geopolygon(&geometry, resolution, target.as_ref(), align)
        .map_err(coded)?;
    info!(%geobox, "Built grid");
    Ok(GeoBoxSpec::from(&geobox))
}

pub fn reconcile(grids: &[GeoBox], op: Reconcile) -> Result<GeoBoxSpec> {
    let geobox = match op {
        Reconcile::Union => geobox_union_conservative(grids),
        Reconcile::Intersection => geobox_intersection_conservative(grids),
    }
    .map_err(coded)?;
    info!(count = grids.len(), ?op, %geobox, "Reconciled grids");
    Ok(GeoBoxSpec::from(&geobox))
}

pub fn reproject(input: &Path, from: &str, to: &str, options: &ReprojectOptions) -> Result<Value> {
    let source = Crs::new(from).map_err(coded)?;
    let target = Crs::new(to).map_err(coded)?;
    let geometry = Geometry::from_geojson(&read_json(input)?, Some(source)).map_err(coded)?;
    let projected = geometry.to_crs(&target, options).map_err(coded)?;
    Ok(projected.to_geojson())
}
