use crate::error::{GraphError, Result};
use crate::types::{Location, Parcel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Optional district / municipality / county filter.
///
/// Omitted levels are wildcards; provided levels must match exactly
/// (case-sensitive).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFilter {
    pub district: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
}

impl LocationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }

    #[must_use]
    pub fn municipality(mut self, municipality: impl Into<String>) -> Self {
        self.municipality = Some(municipality.into());
        self
    }

    #[must_use]
    pub fn county(mut self, county: impl Into<String>) -> Self {
        self.county = Some(county.into());
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.district.is_none() && self.municipality.is_none() && self.county.is_none()
    }

    #[must_use]
    pub fn matches(&self, location: &Location) -> bool {
        level_matches(self.district.as_deref(), location.district.as_deref())
            && level_matches(self.municipality.as_deref(), location.municipality.as_deref())
            && level_matches(self.county.as_deref(), location.county.as_deref())
    }

    /// Parcels matching this filter, in input order.
    ///
    /// An empty filter and an empty result are both rejected.
    pub fn select<'a, I>(&self, parcels: I) -> Result<Vec<&'a Parcel>>
    where
        I: IntoIterator<Item = &'a Parcel>,
    {
        if self.is_empty() {
            return Err(GraphError::MissingLocationFilter);
        }
        let selected: Vec<&Parcel> = parcels
            .into_iter()
            .filter(|p| self.matches(&p.location))
            .collect();
        if selected.is_empty() {
            return Err(GraphError::NoMatchingParcels(self.clone()));
        }
        Ok(selected)
    }
}

fn level_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => actual == Some(wanted),
    }
}

impl fmt::Display for LocationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let levels = [
            ("district", &self.district),
            ("municipality", &self.municipality),
            ("county", &self.county),
        ];
        let mut first = true;
        for (name, value) in levels {
            if let Some(value) = value {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{name}={value:?}")?;
                first = false;
            }
        }
        if first {
            f.write_str("<no filter>")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parcel(id: u64, district: &str, municipality: &str) -> Parcel {
        Parcel::new(id, 1, 10.0).with_location(Location::new(district, municipality, "Zagreb"))
    }

    #[test]
    fn test_omitted_levels_are_wildcards() {
        let location = Location::new("A", "M", "Zagreb");
        assert!(LocationFilter::new().county("Zagreb").matches(&location));
        assert!(LocationFilter::new().district("A").county("Zagreb").matches(&location));
        assert!(!LocationFilter::new().district("a").matches(&location));
    }

    #[test]
    fn test_unavailable_level_never_matches() {
        let location = Location::new(Location::UNAVAILABLE, "M", "Zagreb");
        assert!(!LocationFilter::new().district(Location::UNAVAILABLE).matches(&location));
    }

    #[test]
    fn test_select_keeps_input_order() {
        let parcels = vec![parcel(1, "A", "M"), parcel(2, "B", "M"), parcel(3, "A", "N")];
        let ids: Vec<u64> = LocationFilter::new()
            .district("A")
            .select(&parcels)
            .unwrap()
            .iter()
            .map(|p| p.id.0)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_select_rejects_empty_filter_and_empty_result() {
        let parcels = vec![parcel(1, "A", "M")];
        assert!(matches!(
            LocationFilter::new().select(&parcels),
            Err(GraphError::MissingLocationFilter)
        ));
        match LocationFilter::new().district("X").municipality("M").select(&parcels) {
            Err(GraphError::NoMatchingParcels(filter)) => {
                assert_eq!(filter.to_string(), "district=\"X\", municipality=\"M\"");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
