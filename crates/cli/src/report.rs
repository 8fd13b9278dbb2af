use anyhow::Result;
use cadastre_graph::{AreaStatistics, GraphStats, LocationFilter, OwnerId, SuggestionSummary};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct AreaReport<'a> {
    pub filter: &'a LocationFilter,
    pub merged: bool,
    pub statistics: AreaStatistics,
}

#[derive(Debug, Serialize)]
pub struct SuggestionReport {
    pub limit: usize,
    pub suggestions: Vec<SuggestionSummary>,

    /// Parcel count of every owner appearing in a suggestion
    pub holdings: BTreeMap<OwnerId, usize>,
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_stats(stats: &GraphStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("Parcels:          {}\n", stats.parcels));
    out.push_str(&format!(
        "Parcel graph:     {} vertices, {} edges\n",
        stats.parcel_vertices, stats.parcel_edges
    ));
    out.push_str(&format!("Isolated parcels: {}\n", stats.isolated_parcels));
    out.push_str(&format!("Owners:           {}\n", stats.owners));
    out.push_str(&format!(
        "Owner graph:      {} vertices, {} edges\n",
        stats.owner_vertices, stats.owner_edges
    ));
    out
}

pub fn render_area(report: &AreaReport<'_>) -> String {
    let stats = &report.statistics;
    let unit = if report.merged { "owners" } else { "parcels" };
    format!(
        "Average area for {}: {:.2}\n  {} parcels, {} {}, total {:.2}\n",
        report.filter, stats.average_area, stats.parcels, stats.units, unit, stats.total_area
    )
}

pub fn render_suggestions(report: &SuggestionReport) -> String {
    if report.suggestions.is_empty() {
        return "No exchange candidates found\n".to_string();
    }

    let mut out = String::new();
    out.push_str("| # | parcel A (owner) | parcel B (owner) | area diff | feasibility | improvement | score |\n");
    out.push_str("|---:|---|---|---:|---:|---:|---:|\n");
    for (rank, s) in report.suggestions.iter().enumerate() {
        out.push_str(&format!(
            "| {} | {} ({}) | {} ({}) | {:.2} | {:.3} | {:+.4} | {:+.4} |\n",
            rank + 1,
            s.first_parcel,
            s.first_owner,
            s.second_parcel,
            s.second_owner,
            s.area_difference,
            s.feasibility_score,
            s.average_area_improvement,
            s.score
        ));
    }

    let holdings: Vec<String> = report
        .holdings
        .iter()
        .map(|(owner, count)| format!("{owner}: {count}"))
        .collect();
    out.push_str(&format!("\nParcels per owner: {}\n", holdings.join(", ")));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadastre_graph::ParcelId;

    #[test]
    fn suggestion_table_has_one_row_per_entry() {
        let summary = SuggestionSummary {
            first_parcel: ParcelId(1),
            first_owner: OwnerId(10),
            first_area: 100.0,
            second_parcel: ParcelId(2),
            second_owner: OwnerId(20),
            second_area: 200.0,
            area_difference: 100.0,
            feasibility_score: 0.5,
            average_area_improvement: 0.0,
            score: 0.0,
        };
        let text = render_suggestions(&SuggestionReport {
            limit: 5,
            suggestions: vec![summary.clone(), summary],
            holdings: BTreeMap::from([(OwnerId(10), 3), (OwnerId(20), 1)]),
        });
        assert_eq!(text.lines().count(), 6);
        assert!(text.ends_with("Parcels per owner: 10: 3, 20: 1\n"), "{text}");
        assert!(text.contains("| 1 | 1 (10) | 2 (20) | 100.00 | 0.500 |"));
    }

    #[test]
    fn empty_suggestions_render_notice() {
        let text = render_suggestions(&SuggestionReport {
            limit: 5,
            suggestions: Vec::new(),
            holdings: BTreeMap::new(),
        });
        assert_eq!(text, "No exchange candidates found\n");
    }
}
