//! Narrow seam to the geometry engine.
//!
//! The graphs never evaluate topology themselves; they ask a
//! [`GeometryOracle`]. [`GeoOracle`] is the default engine, answering all
//! predicates for a pair from a single DE-9IM matrix computed by `geo`.

use crate::types::Shape;
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::algorithm::relate::IntersectionMatrix;
use geo::{Contains, Coord, Intersects, Line, LineString, Polygon, Relate};
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Malformed geometry reported by the oracle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TopologyError {
    message: String,
}

impl TopologyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Topological facts about an ordered pair of shapes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Relation {
    pub touches: bool,
    pub intersects: bool,

    /// First shape lies within the second
    pub first_within_second: bool,

    /// Second shape lies within the first
    pub second_within_first: bool,
}

/// Geometry capability consumed by the graph builders.
///
/// Implementations must be usable from several worker threads at once.
pub trait GeometryOracle: Sync {
    /// Reject shapes the engine cannot reason about
    fn validate(&self, _shape: &Shape) -> Result<(), TopologyError> {
        Ok(())
    }

    fn touches(&self, a: &Shape, b: &Shape) -> Result<bool, TopologyError>;

    fn intersects(&self, a: &Shape, b: &Shape) -> Result<bool, TopologyError>;

    /// `a` lies within `b`
    fn within(&self, a: &Shape, b: &Shape) -> Result<bool, TopologyError>;

    /// All facts needed by the adjacency predicate.
    ///
    /// Engines that can answer every predicate from one computation should
    /// override this.
    fn relation(&self, a: &Shape, b: &Shape) -> Result<Relation, TopologyError> {
        Ok(Relation {
            touches: self.touches(a, b)?,
            intersects: self.intersects(a, b)?,
            first_within_second: self.within(a, b)?,
            second_within_first: self.within(b, a)?,
        })
    }
}

impl<T: GeometryOracle + ?Sized> GeometryOracle for &T {
    fn validate(&self, shape: &Shape) -> Result<(), TopologyError> {
        (**self).validate(shape)
    }

    fn touches(&self, a: &Shape, b: &Shape) -> Result<bool, TopologyError> {
        (**self).touches(a, b)
    }

    fn intersects(&self, a: &Shape, b: &Shape) -> Result<bool, TopologyError> {
        (**self).intersects(a, b)
    }

    fn within(&self, a: &Shape, b: &Shape) -> Result<bool, TopologyError> {
        (**self).within(a, b)
    }

    fn relation(&self, a: &Shape, b: &Shape) -> Result<Relation, TopologyError> {
        (**self).relation(a, b)
    }
}

/// Oracle backed by the `geo` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoOracle;

impl GeoOracle {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryOracle for GeoOracle {
    fn validate(&self, shape: &Shape) -> Result<(), TopologyError> {
        if shape.0.is_empty() {
            return Err(TopologyError::new("shape has no polygons"));
        }

        let mut parts = Vec::with_capacity(shape.0.len());
        for (polygon_idx, polygon) in shape.0.iter().enumerate() {
            let rings = validate_polygon(polygon)
                .map_err(|e| TopologyError::new(format!("polygon {polygon_idx}: {e}")))?;
            parts.push(rings);
        }

        // Parts of a multipolygon may meet at points but never overlap
        for i in 0..shape.0.len() {
            for j in (i + 1)..shape.0.len() {
                let crossing = parts[i]
                    .iter()
                    .any(|a| parts[j].iter().any(|b| rings_cross(a, b)));
                if crossing
                    || has_vertex_inside(&shape.0[i], &shape.0[j])
                    || has_vertex_inside(&shape.0[j], &shape.0[i])
                {
                    return Err(TopologyError::new(format!("polygons {i} and {j} overlap")));
                }
            }
        }
        Ok(())
    }

    fn touches(&self, a: &Shape, b: &Shape) -> Result<bool, TopologyError> {
        Ok(relate(a, b)?.is_touches())
    }

    fn intersects(&self, a: &Shape, b: &Shape) -> Result<bool, TopologyError> {
        Ok(relate(a, b)?.is_intersects())
    }

    fn within(&self, a: &Shape, b: &Shape) -> Result<bool, TopologyError> {
        Ok(relate(a, b)?.is_within())
    }

    fn relation(&self, a: &Shape, b: &Shape) -> Result<Relation, TopologyError> {
        let matrix = relate(a, b)?;
        Ok(Relation {
            touches: matrix.is_touches(),
            intersects: matrix.is_intersects(),
            first_within_second: matrix.is_within(),
            second_within_first: matrix.is_contains(),
        })
    }
}

/// DE-9IM matrix for a pair. A panic inside `geo` (such as a side location
/// conflict) is reported as a `TopologyError`.
fn relate(a: &Shape, b: &Shape) -> Result<IntersectionMatrix, TopologyError> {
    panic::catch_unwind(AssertUnwindSafe(|| a.relate(b))).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown failure".to_string());
        TopologyError::new(format!("relate failed: {message}"))
    })
}

/// Segments of every ring, exterior first
fn validate_polygon(polygon: &Polygon<f64>) -> Result<Vec<Vec<Line<f64>>>, TopologyError> {
    let mut rings = vec![ring_segments(polygon.exterior())
        .map_err(|e| TopologyError::new(format!("exterior: {e}")))?];
    for (ring_idx, ring) in polygon.interiors().iter().enumerate() {
        rings.push(
            ring_segments(ring)
                .map_err(|e| TopologyError::new(format!("interior {ring_idx}: {e}")))?,
        );
    }

    for i in 0..rings.len() {
        for j in (i + 1)..rings.len() {
            if rings_cross(&rings[i], &rings[j]) {
                return Err(TopologyError::new(format!("rings {i} and {j} cross")));
            }
        }
    }

    let shell = Polygon::new(polygon.exterior().clone(), vec![]);
    for (ring_idx, ring) in polygon.interiors().iter().enumerate() {
        if ring.0.iter().any(|&coord| !shell.intersects(&coord)) {
            return Err(TopologyError::new(format!(
                "interior {ring_idx} lies outside the exterior"
            )));
        }
    }
    Ok(rings)
}

fn ring_segments(ring: &LineString<f64>) -> Result<Vec<Line<f64>>, TopologyError> {
    if ring.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(TopologyError::new("non-finite coordinate"));
    }

    // Consecutive duplicates are harmless; drop them before checking
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(ring.0.len());
    for &coord in &ring.0 {
        if coords.last() != Some(&coord) {
            coords.push(coord);
        }
    }
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    if coords.len() < 3 {
        return Err(TopologyError::new(format!(
            "ring has {} distinct vertices (need at least 3)",
            coords.len()
        )));
    }

    let segments: Vec<Line<f64>> = (0..coords.len())
        .map(|i| Line::new(coords[i], coords[(i + 1) % coords.len()]))
        .collect();
    let last = segments.len() - 1;
    for i in 0..segments.len() {
        for j in (i + 2)..segments.len() {
            if i == 0 && j == last {
                continue;
            }
            if segments[i].intersects(&segments[j]) {
                return Err(TopologyError::new(format!(
                    "self-intersection between ring segments {i} and {j}"
                )));
            }
        }
    }
    Ok(segments)
}

/// Rings cross when segments meet in a proper crossing or share a stretch.
/// Contact at a single vertex is allowed.
fn rings_cross(a: &[Line<f64>], b: &[Line<f64>]) -> bool {
    a.iter().any(|s| {
        b.iter().any(|t| match line_intersection(*s, *t) {
            Some(LineIntersection::SinglePoint { is_proper, .. }) => is_proper,
            Some(LineIntersection::Collinear { intersection }) => {
                intersection.start != intersection.end
            }
            None => false,
        })
    })
}

/// Some exterior vertex of `inner` lies strictly inside `outer`
fn has_vertex_inside(outer: &Polygon<f64>, inner: &Polygon<f64>) -> bool {
    inner.exterior().0.iter().any(|coord| outer.contains(coord))
}
