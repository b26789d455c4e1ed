//! Scenario construction and import normalisation

use crate::catalog::{CatalogRegistry, LandUseLibrary, ScenarioCatalog};
use crate::constants::percent::FULL;
use crate::constants::scenario::{DEFAULT_FULL_CATEGORY, DEFAULT_ID, DEFAULT_NAME, FORMAT_VERSION};
use chrono::Utc;
use masterplan_types::{
    Allocation, AllocationBasis, CustomKind, FeasibilityInputs, Scenario, ScenarioParameters,
};
use std::collections::HashSet;
use tracing::debug;

/// A fresh scenario: 100 ha, gentle topography, large-district preset, RoW set A,
/// the whole NDA pool on landed housing and default unit rates.
pub fn default_scenario(library: &LandUseLibrary) -> Scenario {
    let allocations = library
        .iter()
        .map(|category| {
            let percentage = if category.id == DEFAULT_FULL_CATEGORY { FULL } else { 0.0 };
            Allocation::new(category.id.clone(), percentage)
        })
        .collect();

    Scenario {
        id: DEFAULT_ID.to_string(),
        name: DEFAULT_NAME.to_string(),
        parameters: ScenarioParameters::default(),
        custom_land_uses: Vec::new(),
        allocations,
        feasibility: FeasibilityInputs::default(),
        version: FORMAT_VERSION.to_string(),
        timestamp: Utc::now(),
    }
}

/// Repairs a scenario read back from a file.
///
/// Custom categories missing a basis or kind get them from their sellable flag.
/// Allocations for unknown or repeated ids are dropped, and every known category
/// without an allocation gets one at 0%. A negative or NaN site area becomes 0.
pub fn normalize_imported(mut scenario: Scenario, library: &LandUseLibrary) -> Scenario {
    for category in &mut scenario.custom_land_uses {
        category.is_custom = true;
        if category.allocation_basis.is_none() {
            category.allocation_basis =
                Some(if category.sellable { AllocationBasis::Nda } else { AllocationBasis::Gsa });
        }
        if category.custom_type.is_none() {
            category.custom_type =
                Some(if category.sellable { CustomKind::Sellable } else { CustomKind::NonSellable });
        }
    }
    if scenario.version.is_empty() {
        scenario.version = FORMAT_VERSION.to_string();
    }
    scenario.parameters.gsa = scenario.parameters.gsa.max(0.0);

    let catalog = ScenarioCatalog::for_scenario(library, &scenario);
    let mut seen = HashSet::new();
    let mut allocations: Vec<Allocation> = scenario
        .allocations
        .iter()
        .filter(|a| catalog.get(&a.category_id).is_some() && seen.insert(a.category_id.clone()))
        .cloned()
        .collect();
    let dropped = scenario.allocations.len() - allocations.len();

    let missing: Vec<Allocation> = catalog
        .list()
        .into_iter()
        .filter(|c| !seen.contains(&c.id))
        .map(|c| Allocation::new(c.id.clone(), 0.0))
        .collect();
    let added = missing.len();
    allocations.extend(missing);

    debug!(scenario_id = %scenario.id, dropped, added, "Normalised imported scenario");
    scenario.allocations = allocations;
    scenario
}
