use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Polygonal parcel geometry (possibly multi-part)
pub type Shape = MultiPolygon<f64>;

/// Externally assigned parcel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParcelId(pub u64);

/// Owner identifier shared by all parcels of one holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub u64);

impl OwnerId {
    /// Owner ids handed to queries must be positive
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for ParcelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Three-level administrative location of a parcel.
///
/// `None` at any level means the value is unavailable in the source data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Smallest unit (cadastral district)
    pub district: Option<String>,

    /// Intermediate unit
    pub municipality: Option<String>,

    /// Top unit
    pub county: Option<String>,
}

impl Location {
    /// Textual sentinel used by source data for a missing level
    pub const UNAVAILABLE: &'static str = "unavailable";

    pub fn new(
        district: impl Into<String>,
        municipality: impl Into<String>,
        county: impl Into<String>,
    ) -> Self {
        Self {
            district: Self::level(district.into()),
            municipality: Self::level(municipality.into()),
            county: Self::level(county.into()),
        }
    }

    fn level(value: String) -> Option<String> {
        if value.is_empty() || value == Self::UNAVAILABLE {
            None
        } else {
            Some(value)
        }
    }
}

/// A single cadastral land unit.
///
/// Parcels are created once by the importer and never mutated by the graphs,
/// which only hold shared references to them.
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    pub id: ParcelId,
    pub owner: OwnerId,

    /// Area as recorded by the register (not recomputed from the shape)
    pub area: f64,

    /// Perimeter length as recorded by the register
    pub length: f64,

    /// Geometry; parcels without one are never adjacent to anything
    pub shape: Option<Shape>,

    pub location: Location,
}

impl Parcel {
    pub fn new(id: u64, owner: u64, area: f64) -> Self {
        Self {
            id: ParcelId(id),
            owner: OwnerId(owner),
            area,
            length: 0.0,
            shape: None,
            location: Location::default(),
        }
    }

    #[must_use]
    pub fn with_shape(mut self, shape: impl Into<Shape>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    #[must_use]
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_maps_sentinel_to_none() {
        let location = Location::new("Centar", Location::UNAVAILABLE, "");
        assert_eq!(location.district.as_deref(), Some("Centar"));
        assert!(location.municipality.is_none());
        assert!(location.county.is_none());
    }

    #[test]
    fn test_owner_id_validity() {
        assert!(OwnerId(7).is_valid());
        assert!(!OwnerId(0).is_valid());
    }
}
