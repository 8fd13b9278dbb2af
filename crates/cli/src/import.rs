use anyhow::{anyhow, bail, Context, Result};
use cadastre_graph::{Location, OwnerId, Parcel, ParcelId, Shape};
use geo::{LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use std::path::Path;

type Ring = Vec<[f64; 2]>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParcelRecord {
    id: u64,
    owner: u64,
    area: f64,
    length: f64,
    #[serde(default)]
    location: LocationRecord,
    /// Polygons, each a list of rings with the exterior first
    #[serde(default)]
    shape: Option<Vec<Vec<Ring>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LocationRecord {
    district: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
}

pub fn load_parcels(path: &Path) -> Result<Vec<Parcel>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read parcels {}", path.display()))?;
    let parcels =
        parse_parcels(&text).with_context(|| format!("Invalid parcels {}", path.display()))?;
    log::info!("Loaded {} parcels from {}", parcels.len(), path.display());
    Ok(parcels)
}

pub fn parse_parcels(text: &str) -> Result<Vec<Parcel>> {
    let records: Vec<ParcelRecord> = serde_json::from_str(text).context("JSON parse error")?;
    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            let id = record.id;
            into_parcel(record).with_context(|| format!("record #{idx} (id {id})"))
        })
        .collect()
}

fn into_parcel(record: ParcelRecord) -> Result<Parcel> {
    if record.id == 0 {
        bail!("id must be positive");
    }
    if record.owner == 0 {
        bail!("owner must be positive");
    }
    check_positive("area", record.area)?;
    check_positive("length", record.length)?;

    let shape = record.shape.map(into_shape).transpose()?;

    Ok(Parcel {
        id: ParcelId(record.id),
        owner: OwnerId(record.owner),
        area: record.area,
        length: record.length,
        shape,
        location: Location {
            district: level(record.location.district),
            municipality: level(record.location.municipality),
            county: level(record.location.county),
        },
    })
}

fn check_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(anyhow!("{field} must be a positive number, got {value}"))
    }
}

fn level(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != Location::UNAVAILABLE)
}

fn into_shape(polygons: Vec<Vec<Ring>>) -> Result<Shape> {
    let polygons = polygons
        .into_iter()
        .enumerate()
        .map(|(idx, rings)| {
            let mut rings = rings.into_iter().map(LineString::from);
            let exterior = rings
                .next()
                .ok_or_else(|| anyhow!("polygon {idx} has no rings"))?;
            Ok(Polygon::new(exterior, rings.collect()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(MultiPolygon::new(polygons))
}
