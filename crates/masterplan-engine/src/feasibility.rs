//! Cost, revenue and profit estimate
//!
//! Sellable hectares are grouped into three buckets: residential, commercial and
//! every other sellable category. Under land sale each bucket is sold as land at
//! its own price. Under build-and-sell the residential and commercial buckets are
//! built at their coverage ratio and sold as floor space, while the other bucket
//! is still sold as land.
//!
//! The estimate is total: rates are used as given, so negative or non-finite
//! inputs flow straight through the arithmetic.

use crate::areas::ratio_percent;
use crate::catalog::{CatalogRegistry, LandUseLibrary, ScenarioCatalog};
use crate::constants::percent::FULL;
use crate::constants::units::SQM_PER_HA;
use masterplan_types::{BuildModel, CalculatedAreas, FeasibilityInputs, FeasibilityOutputs, LandUseGroup, Scenario};
use serde::Serialize;

/// Sellable land per pricing bucket, in hectares
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueBuckets {
    pub residential_ha: f64,
    pub commercial_ha: f64,
    pub other_sellable_ha: f64,
}

impl RevenueBuckets {
    /// Sorts each category's hectares into its bucket
    pub fn from_areas<C: CatalogRegistry + ?Sized>(areas: &CalculatedAreas, catalog: &C) -> Self {
        let mut buckets = Self::default();
        for (id, ha) in &areas.allocations_ha {
            let Some(category) = catalog.get(id) else {
                continue;
            };
            match category.group {
                LandUseGroup::Residential => buckets.residential_ha += ha,
                LandUseGroup::Commercial => buckets.commercial_ha += ha,
                _ if category.sellable => buckets.other_sellable_ha += ha,
                _ => {}
            }
        }
        buckets
    }
}

/// Computes the feasibility estimate for `areas` at the given rates
pub fn calculate_feasibility<C: CatalogRegistry + ?Sized>(
    inputs: &FeasibilityInputs,
    areas: &CalculatedAreas,
    catalog: &C,
) -> FeasibilityOutputs {
    let gsa_sqm = areas.gsa * SQM_PER_HA;
    let roads_sqm = areas.roads_ha * SQM_PER_HA;

    let land_acquisition_cost = gsa_sqm * inputs.land_acquisition_cost;
    let infrastructure_cost = roads_sqm * inputs.roads_cost_rate;

    let buckets = RevenueBuckets::from_areas(areas, catalog);
    let residential_sqm = buckets.residential_ha * SQM_PER_HA;
    let commercial_sqm = buckets.commercial_ha * SQM_PER_HA;
    let other_sqm = buckets.other_sellable_ha * SQM_PER_HA;
    let other_revenue = other_sqm * inputs.custom_sellable_sale_price;

    let (build_cost, total_revenue) = match inputs.build_model {
        BuildModel::LandSale => {
            let revenue = residential_sqm * inputs.residential_sale_price
                + commercial_sqm * inputs.commercial_sale_price
                + other_revenue;
            (0.0, revenue)
        }
        BuildModel::BuildAndSell => {
            let residential_built = residential_sqm * inputs.residential_coverage / FULL;
            let commercial_built = commercial_sqm * inputs.commercial_coverage / FULL;

            let build_cost = residential_built * inputs.residential_build_cost
                + commercial_built * inputs.commercial_build_cost;
            let revenue = residential_built * inputs.residential_sale_price
                + commercial_built * inputs.commercial_sale_price
                + other_revenue;
            (build_cost, revenue)
        }
    };

    let total_cost = land_acquisition_cost + infrastructure_cost + build_cost;
    let profit = total_revenue - total_cost;

    FeasibilityOutputs {
        land_acquisition_cost,
        infrastructure_cost,
        build_cost,
        total_cost,
        total_revenue,
        profit,
        profit_margin: ratio_percent(profit, total_revenue),
        profit_per_ha: if areas.gsa > 0.0 { profit / areas.gsa } else { 0.0 },
    }
}

/// Feasibility of a whole scenario against its own rates
pub fn calculate_scenario_feasibility(
    scenario: &Scenario,
    areas: &CalculatedAreas,
    library: &LandUseLibrary,
) -> FeasibilityOutputs {
    let catalog = ScenarioCatalog::for_scenario(library, scenario);
    calculate_feasibility(&scenario.feasibility, areas, &catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn areas(gsa: f64, roads_ha: f64, allocations: &[(&str, f64)]) -> CalculatedAreas {
        CalculatedAreas {
            gsa,
            roads_ha,
            allocations_ha: allocations.iter().map(|(id, ha)| (id.to_string(), *ha)).collect::<BTreeMap<_, _>>(),
            ..Default::default()
        }
    }

    fn zero_rates(build_model: BuildModel) -> FeasibilityInputs {
        FeasibilityInputs {
            land_acquisition_cost: 0.0,
            roads_cost_rate: 0.0,
            residential_sale_price: 0.0,
            commercial_sale_price: 0.0,
            custom_sellable_sale_price: 0.0,
            build_model,
            residential_build_cost: 0.0,
            commercial_build_cost: 0.0,
            residential_coverage: 0.0,
            commercial_coverage: 0.0,
        }
    }

    #[test]
    fn fifty_residential_hectares_at_land_price() {
        let library = LandUseLibrary::built_in();
        let inputs = FeasibilityInputs { residential_sale_price: 5_000_000.0, ..zero_rates(BuildModel::LandSale) };
        let outputs = calculate_feasibility(&inputs, &areas(100.0, 0.0, &[("res_landed", 50.0)]), library);

        assert_eq!(outputs.total_revenue, 2.5e12);
        assert_eq!(outputs.build_cost, 0.0);
        assert_eq!(outputs.profit, 2.5e12);
        assert_eq!(outputs.profit_margin, 100.0);
        assert_eq!(outputs.profit_per_ha, 2.5e10);
    }

    #[test]
    fn costs_scale_with_gross_and_road_area() {
        let library = LandUseLibrary::built_in();
        let inputs = FeasibilityInputs {
            land_acquisition_cost: 1_000.0,
            roads_cost_rate: 200.0,
            ..zero_rates(BuildModel::LandSale)
        };
        let outputs = calculate_feasibility(&inputs, &areas(10.0, 2.0, &[]), library);

        assert_eq!(outputs.land_acquisition_cost, 100_000_000.0);
        assert_eq!(outputs.infrastructure_cost, 4_000_000.0);
        assert_eq!(outputs.total_cost, 104_000_000.0);
        assert_eq!(outputs.profit, -104_000_000.0);
        // no revenue, margin guarded
        assert_eq!(outputs.profit_margin, 0.0);
    }

    #[test]
    fn build_and_sell_builds_residential_and_commercial_only() {
        let library = LandUseLibrary::built_in();
        let inputs = FeasibilityInputs {
            residential_sale_price: 10.0,
            commercial_sale_price: 20.0,
            custom_sellable_sale_price: 3.0,
            residential_build_cost: 4.0,
            commercial_build_cost: 5.0,
            residential_coverage: 50.0,
            commercial_coverage: 25.0,
            ..zero_rates(BuildModel::BuildAndSell)
        };
        let breakdown = areas(
            10.0,
            0.0,
            &[("res_landed", 2.0), ("com_retail", 4.0), ("ind_light", 1.0), ("civic_school", 1.0)],
        );
        let outputs = calculate_feasibility(&inputs, &breakdown, library);

        // built: residential 10,000 sqm, commercial 10,000 sqm
        assert_eq!(outputs.build_cost, 10_000.0 * 4.0 + 10_000.0 * 5.0);
        // other sellable (industrial) sold as land; civic is not sellable
        assert_eq!(outputs.total_revenue, 10_000.0 * 10.0 + 10_000.0 * 20.0 + 10_000.0 * 3.0);
    }

    #[test]
    fn buckets_skip_unsellable_and_unknown_categories() {
        let library = LandUseLibrary::built_in();
        let breakdown = areas(
            10.0,
            0.0,
            &[("res_townhouse", 1.0), ("com_office", 2.0), ("mixed_use", 3.0), ("civic_health", 4.0), ("ghost", 5.0)],
        );
        let buckets = RevenueBuckets::from_areas(&breakdown, library);
        assert_eq!(buckets, RevenueBuckets { residential_ha: 1.0, commercial_ha: 2.0, other_sellable_ha: 3.0 });
    }

    #[test]
    fn empty_site_has_zero_per_hectare_profit() {
        let library = LandUseLibrary::built_in();
        let outputs = calculate_feasibility(&FeasibilityInputs::default(), &areas(0.0, 0.0, &[]), library);
        assert_eq!(outputs.profit_per_ha, 0.0);
        assert_eq!(outputs.total_cost, 0.0);
    }

    #[test]
    fn scenario_feasibility_prices_custom_sellable_land() {
        use crate::areas::calculate_scenario_areas;
        use crate::rebalancer::{AllocationRebalancer, CustomLandUseRequest};
        use crate::scenario::default_scenario;
        use masterplan_types::CustomKind;

        let library = LandUseLibrary::built_in();
        let added = AllocationRebalancer::default()
            .add_custom_land_use(
                &default_scenario(library),
                CustomLandUseRequest {
                    name: "Marina".to_string(),
                    kind: CustomKind::Sellable,
                    group: LandUseGroup::Other,
                    percentage: 10.0,
                },
            )
            .unwrap();
        let breakdown = calculate_scenario_areas(&added.scenario, library);
        let outputs = calculate_scenario_feasibility(&added.scenario, &breakdown, library);

        let landed_ha = breakdown.allocations_ha["res_landed"];
        let marina_ha = breakdown.allocations_ha[&added.category_id];
        assert!(marina_ha > 0.0);
        let rates = &added.scenario.feasibility;
        let expected =
            (landed_ha * rates.residential_sale_price + marina_ha * rates.custom_sellable_sale_price) * SQM_PER_HA;
        assert!((outputs.total_revenue - expected).abs() / expected < 1e-12);
    }
}
