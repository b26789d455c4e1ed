//! Allocation rebalancing
//!
//! State transitions over a scenario's allocation set. Every operation reads the
//! whole scenario and returns a complete replacement, so callers never observe a
//! half-redistributed allocation set.
//!
//! NDA-basis allocations share one pool that should sum to 100%. Changing one of
//! them redistributes the difference proportionally over the other unlocked NDA
//! allocations and then snaps the unlocked set back onto the pool with
//! largest-remainder rounding. GSA-basis allocations are independent of that pool.

use crate::areas::calculate_scenario_areas;
use crate::catalog::{CatalogRegistry, LandUseLibrary, ScenarioCatalog};
use crate::constants::custom::{FIRST_DUPLICATE_SUFFIX, ID_PREFIX};
use crate::constants::percent::FULL;
use crate::error::CustomLandUseError;
use crate::rounding::largest_remainder_round;
use masterplan_types::{
    Allocation, AllocationBasis, CustomKind, DefaultBand, LandUseCategory, LandUseGroup, Scenario,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Request to create a user-defined category
#[derive(Debug, Clone, PartialEq)]
pub struct CustomLandUseRequest {
    pub name: String,
    pub kind: CustomKind,
    pub group: LandUseGroup,
    /// Initial percentage of the category's pool
    pub percentage: f64,
}

/// Successful outcome of [`AllocationRebalancer::add_custom_land_use`]
#[derive(Debug, Clone)]
pub struct CustomLandUseAdded {
    pub scenario: Scenario,
    pub category_id: String,
    /// Label after de-duplication
    pub label: String,
}

/// Applies user edits to a scenario's allocations
#[derive(Debug, Clone, Copy)]
pub struct AllocationRebalancer<'a> {
    library: &'a LandUseLibrary,
}

impl Default for AllocationRebalancer<'static> {
    fn default() -> Self {
        Self::new(LandUseLibrary::built_in())
    }
}

impl<'a> AllocationRebalancer<'a> {
    pub fn new(library: &'a LandUseLibrary) -> Self {
        Self { library }
    }

    /// Sets one allocation's percentage, clamped to `[0, 100]`.
    ///
    /// GSA-basis targets are replaced without touching anything else. For NDA-basis
    /// targets the difference is taken from (or given to) the other unlocked NDA
    /// allocations in proportion to their current shares, each floored at zero.
    /// When there are no such allocations the value is set alone and the pool may
    /// no longer sum to 100.
    #[instrument(skip(self, scenario), fields(scenario_id = %scenario.id))]
    pub fn set_allocation(&self, scenario: &Scenario, category_id: &str, percentage: f64) -> Scenario {
        let mut next = scenario.clone();
        let catalog = ScenarioCatalog::for_scenario(self.library, scenario);

        let Some(target) = position_of(&next.allocations, category_id) else {
            debug!(category_id, "Ignoring update for unknown allocation");
            return next;
        };

        let new_percentage = percentage.clamp(0.0, FULL);
        let old_percentage = next.allocations[target].percentage;
        next.allocations[target].percentage = new_percentage;

        if catalog.basis_of(category_id) == AllocationBasis::Gsa {
            debug!(category_id, new_percentage, "Updated GSA-basis allocation");
            return next;
        }

        let others: Vec<usize> = unlocked_nda_indices(&next.allocations, &catalog)
            .into_iter()
            .filter(|&i| i != target)
            .collect();
        if others.is_empty() {
            debug!(category_id, new_percentage, "No unlocked allocations to redistribute over");
            return next;
        }

        let delta = new_percentage - old_percentage;
        let others_total: f64 = others.iter().map(|&i| next.allocations[i].percentage).sum();
        let others_count = others.len() as f64;
        for &i in &others {
            let current = next.allocations[i].percentage;
            let share = if others_total > 0.0 { current / others_total } else { 1.0 / others_count };
            next.allocations[i].percentage = (current - delta * share).max(0.0);
        }

        normalize_unlocked_nda(&mut next.allocations, &catalog);

        debug!(
            category_id,
            new_percentage,
            nda_total = nda_percentage_total(&next.allocations, &catalog),
            "Redistributed NDA allocations"
        );
        next
    }

    /// Converts a hectare figure into a percentage of the category's pool and
    /// applies it through [`set_allocation`](Self::set_allocation).
    ///
    /// The pool size comes from the scenario's current area breakdown. Nothing
    /// happens when that pool is empty; the hectare value itself is not kept.
    #[instrument(skip(self, scenario), fields(scenario_id = %scenario.id))]
    pub fn set_allocation_hectares(&self, scenario: &Scenario, category_id: &str, hectares: f64) -> Scenario {
        let catalog = ScenarioCatalog::for_scenario(self.library, scenario);
        let areas = calculate_scenario_areas(scenario, self.library);
        let pool = match catalog.basis_of(category_id) {
            AllocationBasis::Gsa => areas.gsa,
            AllocationBasis::Nda => areas.nda,
        };
        if pool <= 0.0 {
            debug!(category_id, pool, "Pool is empty, ignoring hectare entry");
            return scenario.clone();
        }

        let percentage = (hectares.max(0.0) / pool * FULL).min(FULL);
        self.set_allocation(scenario, category_id, percentage)
    }

    /// Flips the lock on one allocation
    pub fn toggle_lock(&self, scenario: &Scenario, category_id: &str) -> Scenario {
        let mut next = scenario.clone();
        match next.allocations.iter_mut().find(|a| a.category_id == category_id) {
            Some(allocation) => {
                allocation.locked = !allocation.locked;
                debug!(category_id, locked = allocation.locked, "Toggled allocation lock");
            }
            None => debug!(category_id, "Ignoring lock toggle for unknown allocation"),
        }
        next
    }

    /// Spreads whatever the locked NDA allocations leave over the unlocked ones in
    /// proportion to their default band targets, landing exactly on the remainder.
    #[instrument(skip(self, scenario), fields(scenario_id = %scenario.id))]
    pub fn rebalance_to_preset(&self, scenario: &Scenario) -> Scenario {
        let mut next = scenario.clone();
        let catalog = ScenarioCatalog::for_scenario(self.library, scenario);

        let remaining = FULL - locked_nda_total(&next.allocations, &catalog);
        let unlocked = unlocked_nda_indices(&next.allocations, &catalog);
        if unlocked.is_empty() || remaining <= 0.0 {
            debug!(remaining, unlocked = unlocked.len(), "Nothing to rebalance");
            return next;
        }

        let targets: Vec<f64> = unlocked
            .iter()
            .map(|&i| {
                catalog
                    .get(&next.allocations[i].category_id)
                    .map_or(0.0, |c| c.default_band.target)
            })
            .collect();
        let target_total: f64 = targets.iter().sum();
        let count = unlocked.len() as f64;
        let shares: Vec<f64> = targets
            .iter()
            .map(|t| if target_total > 0.0 { t / target_total * remaining } else { remaining / count })
            .collect();

        let rounded = largest_remainder_round(&shares, remaining);
        for (&i, value) in unlocked.iter().zip(rounded) {
            next.allocations[i].percentage = value;
        }

        debug!(remaining, "Rebalanced unlocked allocations to preset targets");
        next
    }

    /// Creates a custom category and its allocation.
    ///
    /// Sellable categories are NDA-basis and may only take what the unlocked NDA
    /// allocations currently hold. Non-sellable categories are GSA-basis public
    /// facilities. A label already used anywhere in the catalog gets ` (2)`,
    /// ` (3)`, ... appended. A positive percentage is applied through
    /// [`set_allocation`](Self::set_allocation), redistributing like a user edit.
    #[instrument(skip(self, scenario, request), fields(scenario_id = %scenario.id, name = %request.name))]
    pub fn add_custom_land_use(
        &self,
        scenario: &Scenario,
        request: CustomLandUseRequest,
    ) -> Result<CustomLandUseAdded, CustomLandUseError> {
        let catalog = ScenarioCatalog::for_scenario(self.library, scenario);

        let name = request.name.trim();
        if name.is_empty() {
            warn!("Rejected custom land use without a name");
            return Err(CustomLandUseError::EmptyName);
        }
        if !(0.0..=FULL).contains(&request.percentage) {
            warn!(percentage = request.percentage, "Rejected custom land use percentage");
            return Err(CustomLandUseError::PercentageOutOfRange { percentage: request.percentage });
        }
        if request.kind.is_sellable() {
            let available = unlocked_nda_total(&scenario.allocations, &catalog);
            if request.percentage > available {
                warn!(requested = request.percentage, available, "Rejected custom land use over capacity");
                return Err(CustomLandUseError::CapacityExceeded {
                    requested: request.percentage,
                    available,
                });
            }
        }

        let label = unique_label(&catalog, name);
        let category_id = format!("{ID_PREFIX}{}", Uuid::new_v4());
        let category = LandUseCategory {
            id: category_id.clone(),
            label: label.clone(),
            group: request.group,
            sellable: request.kind.is_sellable(),
            allocation_basis: Some(request.kind.basis()),
            default_band: DefaultBand::ZERO_WIDTH,
            is_custom: true,
            custom_type: Some(request.kind),
        };

        let mut next = scenario.clone();
        next.custom_land_uses.push(category);
        next.allocations.push(Allocation::new(category_id.clone(), 0.0));

        if request.percentage > 0.0 {
            next = self.set_allocation(&next, &category_id, request.percentage);
        }

        info!(category_id = %category_id, label = %label, kind = ?request.kind, "Added custom land use");
        Ok(CustomLandUseAdded { scenario: next, category_id, label })
    }

    /// Deletes a custom category and its allocation. The freed percentage is left
    /// unallocated. Built-in ids are ignored.
    pub fn remove_custom_land_use(&self, scenario: &Scenario, category_id: &str) -> Scenario {
        let mut next = scenario.clone();
        let before = next.custom_land_uses.len();
        next.custom_land_uses.retain(|c| c.id != category_id);
        if next.custom_land_uses.len() == before {
            debug!(category_id, "Ignoring removal of non-custom category");
            return next;
        }
        next.allocations.retain(|a| a.category_id != category_id);
        info!(category_id, "Removed custom land use");
        next
    }
}

fn position_of(allocations: &[Allocation], category_id: &str) -> Option<usize> {
    allocations.iter().position(|a| a.category_id == category_id)
}

fn is_nda<C: CatalogRegistry + ?Sized>(allocation: &Allocation, catalog: &C) -> bool {
    catalog.basis_of(&allocation.category_id) == AllocationBasis::Nda
}

fn unlocked_nda_indices<C: CatalogRegistry + ?Sized>(allocations: &[Allocation], catalog: &C) -> Vec<usize> {
    allocations
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.locked && is_nda(a, catalog))
        .map(|(i, _)| i)
        .collect()
}

/// Sum of locked NDA-basis percentages
pub fn locked_nda_total<C: CatalogRegistry + ?Sized>(allocations: &[Allocation], catalog: &C) -> f64 {
    allocations
        .iter()
        .filter(|a| a.locked && is_nda(a, catalog))
        .map(|a| a.percentage)
        .sum()
}

/// Sum of unlocked NDA-basis percentages, the pool a sellable addition draws from
pub fn unlocked_nda_total<C: CatalogRegistry + ?Sized>(allocations: &[Allocation], catalog: &C) -> f64 {
    allocations
        .iter()
        .filter(|a| !a.locked && is_nda(a, catalog))
        .map(|a| a.percentage)
        .sum()
}

/// Sum of all NDA-basis percentages
pub fn nda_percentage_total<C: CatalogRegistry + ?Sized>(allocations: &[Allocation], catalog: &C) -> f64 {
    allocations
        .iter()
        .filter(|a| is_nda(a, catalog))
        .map(|a| a.percentage)
        .sum()
}

/// Rounds the unlocked NDA allocations onto `100 - locked`, leaving locked ones as they are
fn normalize_unlocked_nda<C: CatalogRegistry + ?Sized>(allocations: &mut [Allocation], catalog: &C) {
    let target = FULL - locked_nda_total(allocations, catalog);
    let unlocked = unlocked_nda_indices(allocations, catalog);
    let values: Vec<f64> = unlocked.iter().map(|&i| allocations[i].percentage).collect();
    let rounded = largest_remainder_round(&values, target);
    for (&i, value) in unlocked.iter().zip(rounded) {
        allocations[i].percentage = value;
    }
}

fn unique_label(catalog: &ScenarioCatalog<'_>, name: &str) -> String {
    if !catalog.has_label(name) {
        return name.to_string();
    }
    let mut suffix = FIRST_DUPLICATE_SUFFIX;
    loop {
        let candidate = format!("{name} ({suffix})");
        if !catalog.has_label(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
