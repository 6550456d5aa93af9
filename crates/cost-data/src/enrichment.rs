//! Merge inventory counts with normalized billing usage.

use std::collections::{BTreeMap, BTreeSet};

use cost_core::models::{EnrichedRow, InventoryAsset, NormalizedUsage, ReportRow, ResourceType};
use cost_core::units::SyntheticUnitRules;

/// Number of inventory assets per resource type.
pub fn count_by_type(inventory: &[InventoryAsset]) -> BTreeMap<ResourceType, u32> {
    let mut counts = BTreeMap::new();
    for asset in inventory {
        *counts.entry(asset.resource_type).or_insert(0) += 1;
    }
    counts
}

/// One [`EnrichedRow`] per resource type present in either the inventory or
/// the usage map, in [`ResourceType`] order.
///
/// A type is ephemeral when it has billed usage but no inventory assets.
pub fn enrich(
    inventory: &[InventoryAsset],
    usage: &NormalizedUsage,
    rules: &SyntheticUnitRules,
) -> Vec<EnrichedRow> {
    let counts = count_by_type(inventory);

    let all_types: BTreeSet<ResourceType> =
        counts.keys().chain(usage.keys()).copied().collect();

    all_types
        .into_iter()
        .map(|resource_type| {
            let current_count = counts.get(&resource_type).copied().unwrap_or(0);
            let avg = usage.get(&resource_type).copied().unwrap_or(0.0);
            EnrichedRow {
                resource_type,
                current_count,
                avg_instances_per_hour: avg,
                ephemeral: avg > 0.0 && current_count == 0,
                synthetic_units: rules.score(resource_type, avg),
            }
        })
        .collect()
}

/// Convert enriched rows into the reporter's row shape.
pub fn aggregate_for_output(enriched: &[EnrichedRow]) -> Vec<ReportRow> {
    enriched
        .iter()
        .map(|row| ReportRow {
            resource_type: row.resource_type,
            current_count: row.current_count,
            ephemeral_count: u32::from(row.ephemeral),
            avg_instances_per_hour: row.avg_instances_per_hour,
            synthetic_units: row.synthetic_units,
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
