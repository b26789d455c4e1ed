//! Area breakdown
//!
//! Turns site parameters and the allocation set into constraint reserve,
//! non-sellable reserve, net developable and sellable areas. Pure arithmetic,
//! linear in the number of allocations.

use crate::catalog::{CatalogRegistry, LandUseLibrary, ScenarioCatalog};
use crate::constants::percent::FULL;
use crate::presets::{row_set, scale_preset, topography_level};
use masterplan_types::{Allocation, AllocationBasis, CalculatedAreas, Scenario, ScenarioParameters};
use std::collections::BTreeMap;

/// Computes the area breakdown for `parameters` and `allocations`.
///
/// `nca + nsr + nda == gsa` holds whenever `gsa >= 0`; `nda` is floored at zero and
/// absorbs any excess of the two reserves. Every ratio over `gsa` is zero when
/// `gsa` is zero.
pub fn calculate_areas<C: CatalogRegistry + ?Sized>(
    parameters: &ScenarioParameters,
    allocations: &[Allocation],
    catalog: &C,
) -> CalculatedAreas {
    let gsa = parameters.gsa;
    let preset = scale_preset(parameters.preset_id);
    let rows = row_set(parameters.row_set_id);

    let nca_percentage = parameters
        .nca_override_percentage
        .unwrap_or_else(|| topography_level(parameters.tdi).nca_target);
    let nsr_percentage = parameters.nsr_override_percentage.unwrap_or(preset.nsr_target);

    let nca = gsa * nca_percentage / FULL;
    let base_nsr = gsa * nsr_percentage / FULL;

    // Public facilities carved directly out of the gross area
    let custom_reserve: f64 = allocations
        .iter()
        .filter(|alloc| {
            catalog
                .get(&alloc.category_id)
                .is_some_and(|c| !c.sellable && c.basis() == AllocationBasis::Gsa)
        })
        .map(|alloc| gsa * alloc.percentage / FULL)
        .sum();

    let nsr = base_nsr + custom_reserve;
    let nda = (gsa - nca - nsr).max(0.0);
    let nda_percentage = ratio_percent(nda, gsa);

    let mut roads_ha = gsa * preset.roads_target * rows.roads_multiplier / FULL;
    let mut open_space_ha = gsa * preset.open_space_target / FULL;
    let public_realm = roads_ha + open_space_ha;
    if public_realm > base_nsr && base_nsr > 0.0 {
        let scale = base_nsr / public_realm;
        roads_ha *= scale;
        open_space_ha *= scale;
    }
    let utilities_ha = (base_nsr - roads_ha - open_space_ha).max(0.0) + custom_reserve;

    let mut sra = 0.0;
    let mut allocations_ha = BTreeMap::new();
    for alloc in allocations {
        let pool = match catalog.basis_of(&alloc.category_id) {
            AllocationBasis::Gsa => gsa,
            AllocationBasis::Nda => nda,
        };
        let ha = pool * alloc.percentage / FULL;
        allocations_ha.insert(alloc.category_id.clone(), ha);

        if catalog.is_sellable(&alloc.category_id) {
            sra += ha;
        }
    }

    CalculatedAreas {
        gsa,
        nca,
        nsr,
        nda,
        sra,
        nca_percentage,
        nsr_percentage,
        nda_percentage,
        sra_efficiency: ratio_percent(sra, gsa),
        roads_ha,
        open_space_ha,
        utilities_ha,
        allocations_ha,
    }
}

/// Area breakdown of a whole scenario against `library`
pub fn calculate_scenario_areas(scenario: &Scenario, library: &LandUseLibrary) -> CalculatedAreas {
    let catalog = ScenarioCatalog::for_scenario(library, scenario);
    calculate_areas(&scenario.parameters, &scenario.allocations, &catalog)
}

/// `part / whole * 100`, or zero for an empty whole
pub(crate) fn ratio_percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * FULL } else { 0.0 }
}
