use crate::adjacency;
use crate::error::{GraphError, Result};
use crate::owner_graph::OwnerGraph;
use crate::types::{OwnerId, Parcel, ParcelId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A candidate swap of two adjacent parcels held by different owners
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeSuggestion<'a> {
    /// Parcel of the lower owner id
    pub first: &'a Parcel,

    /// Parcel of the higher owner id
    pub second: &'a Parcel,

    /// Absolute difference of the two areas
    pub area_difference: f64,

    /// Smaller area over larger area, in (0, 1]
    pub feasibility_score: f64,

    /// Relative change of the two owners' mean parcel area after the swap
    pub average_area_improvement: f64,
}

impl ExchangeSuggestion<'_> {
    /// Ranking key
    #[must_use]
    pub fn score(&self) -> f64 {
        self.feasibility_score * self.average_area_improvement
    }

    #[must_use]
    pub fn summary(&self) -> SuggestionSummary {
        SuggestionSummary {
            first_parcel: self.first.id,
            first_owner: self.first.owner,
            first_area: self.first.area,
            second_parcel: self.second.id,
            second_owner: self.second.owner,
            second_area: self.second.area,
            area_difference: self.area_difference,
            feasibility_score: self.feasibility_score,
            average_area_improvement: self.average_area_improvement,
            score: self.score(),
        }
    }
}

/// Owned, serializable view of a suggestion for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSummary {
    pub first_parcel: ParcelId,
    pub first_owner: OwnerId,
    pub first_area: f64,
    pub second_parcel: ParcelId,
    pub second_owner: OwnerId,
    pub second_area: f64,
    pub area_difference: f64,
    pub feasibility_score: f64,
    pub average_area_improvement: f64,
    pub score: f64,
}

/// All parcels of one owner
#[derive(Debug, Clone)]
struct Holding<'a> {
    parcels: Vec<&'a Parcel>,
    total_area: f64,
}

impl Holding<'_> {
    fn count(&self) -> f64 {
        self.parcels.len() as f64
    }

    fn mean_area(&self) -> f64 {
        self.total_area / self.count()
    }

    /// Mean area after handing over `given` and receiving `received`
    fn mean_area_after_swap(&self, given: &Parcel, received: &Parcel) -> f64 {
        (self.total_area - given.area + received.area) / self.count()
    }
}

/// Searches for mutually adjacent parcel swaps between neighboring owners
pub struct ExchangeSuggestionEngine<'g, 'a> {
    graph: &'g OwnerGraph<'a>,
    holdings: BTreeMap<OwnerId, Holding<'a>>,
}

impl<'g, 'a> ExchangeSuggestionEngine<'g, 'a> {
    pub fn new(graph: &'g OwnerGraph<'a>) -> Self {
        let mut holdings: BTreeMap<OwnerId, Holding<'a>> = BTreeMap::new();
        for &parcel in graph.parcel_graph().parcels() {
            let holding = holdings.entry(parcel.owner).or_insert_with(|| Holding {
                parcels: Vec::new(),
                total_area: 0.0,
            });
            holding.parcels.push(parcel);
            holding.total_area += parcel.area;
        }
        Self { graph, holdings }
    }

    /// Parcels of `owner` in input order
    #[must_use]
    pub fn holding(&self, owner: OwnerId) -> &[&'a Parcel] {
        self.holdings
            .get(&owner)
            .map(|holding| holding.parcels.as_slice())
            .unwrap_or_default()
    }

    /// Top `max_suggestions` swaps ranked by feasibility × improvement.
    ///
    /// Candidates are generated by ascending owner pair, then by input order
    /// of each owner's parcels; the stable sort keeps that order among equal
    /// scores.
    pub fn generate_suggestions(&self, max_suggestions: usize) -> Result<Vec<ExchangeSuggestion<'a>>> {
        if max_suggestions == 0 {
            return Err(GraphError::InvalidLimit(max_suggestions));
        }

        let mut suggestions = self.candidates();
        let candidate_count = suggestions.len();

        suggestions.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        suggestions.truncate(max_suggestions);

        log::debug!(
            "Ranked {} exchange candidates, returning {}",
            candidate_count,
            suggestions.len()
        );

        Ok(suggestions)
    }

    fn candidates(&self) -> Vec<ExchangeSuggestion<'a>> {
        let parcel_graph = self.graph.parcel_graph();
        let mut candidates = Vec::new();

        for (&first_owner, first) in &self.holdings {
            // Owners that share no boundary cannot have adjacent parcels
            let neighbors = adjacency::neighbors(self.graph.owner_adjacency(), first_owner);

            for second_owner in neighbors.into_iter().filter(|&owner| owner > first_owner) {
                let Some(second) = self.holdings.get(&second_owner) else {
                    continue;
                };
                for &p1 in &first.parcels {
                    for &p2 in &second.parcels {
                        if parcel_graph.are_adjacent(p1, p2) {
                            candidates.push(Self::evaluate(first, second, p1, p2));
                        }
                    }
                }
            }
        }

        candidates
    }

    fn evaluate(
        first: &Holding<'a>,
        second: &Holding<'a>,
        p1: &'a Parcel,
        p2: &'a Parcel,
    ) -> ExchangeSuggestion<'a> {
        let smaller = p1.area.min(p2.area);
        let larger = p1.area.max(p2.area);

        let current = (first.mean_area() + second.mean_area()) / 2.0;
        let after = (first.mean_area_after_swap(p1, p2) + second.mean_area_after_swap(p2, p1)) / 2.0;

        ExchangeSuggestion {
            first: p1,
            second: p2,
            area_difference: larger - smaller,
            feasibility_score: smaller / larger,
            average_area_improvement: (after - current) / current,
        }
    }
}
