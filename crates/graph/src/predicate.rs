use crate::geometry::{GeometryOracle, Relation, TopologyError};
use crate::types::Shape;

impl Relation {
    /// Physical adjacency: touching, or overlapping without either shape
    /// being nested inside the other.
    #[must_use]
    pub const fn is_adjacent(&self) -> bool {
        self.touches
            || (self.intersects && !self.first_within_second && !self.second_within_first)
    }
}

/// Decide whether two parcel shapes are physically adjacent.
///
/// A missing shape on either side is never adjacent. Oracle failures are
/// propagated so the caller can abort the build.
pub fn is_physically_adjacent<O: GeometryOracle + ?Sized>(
    oracle: &O,
    a: Option<&Shape>,
    b: Option<&Shape>,
) -> Result<bool, TopologyError> {
    match (a, b) {
        (Some(a), Some(b)) => Ok(oracle.relation(a, b)?.is_adjacent()),
        _ => Ok(false),
    }
}
