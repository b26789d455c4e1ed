//! Program summary
//!
//! Derived figures the program table shows next to the allocation inputs: how
//! much of the NDA pool is assigned, which rows sit outside their own or their
//! group's guidance band, the sellable / non-sellable split of the gross site,
//! and the site-level risk warnings.

use crate::areas::ratio_percent;
use crate::catalog::{CatalogRegistry, LandUseLibrary, ScenarioCatalog};
use crate::constants::percent::{FULL, SUM_TOLERANCE};
use crate::constants::warnings::{COMMERCIAL_SHARE_MAX, CONSTRAINT_SHARE_MAX};
use crate::presets::{group_band, scale_preset};
use crate::rebalancer::nda_percentage_total;
use masterplan_types::{AllocationBasis, CalculatedAreas, DefaultBand, LandUseCategory, LandUseGroup, Scenario};
use serde::Serialize;

/// Where a percentage sits relative to a guidance band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BandStatus {
    Below,
    Within,
    Above,
}

impl BandStatus {
    /// Band edges count as within
    pub fn of(percentage: f64, band: &DefaultBand) -> Self {
        if band.contains(percentage) {
            Self::Within
        } else if percentage < band.min {
            Self::Below
        } else {
            Self::Above
        }
    }

    /// Custom categories carry no guidance and are always within
    fn of_category(percentage: f64, category: &LandUseCategory) -> Self {
        if category.is_custom { Self::Within } else { Self::of(percentage, &category.default_band) }
    }
}

/// One row of the program table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationLine {
    pub category_id: String,
    pub label: String,
    pub group: LandUseGroup,
    pub sellable: bool,
    pub basis: AllocationBasis,
    pub percentage: f64,
    pub hectares: f64,
    pub percent_of_gsa: f64,
    pub locked: bool,
    pub band_status: BandStatus,
    /// Status of the row's group total, `None` for groups without guidance
    pub group_band_status: Option<BandStatus>,
}

impl AllocationLine {
    pub fn is_out_of_band(&self) -> bool {
        self.band_status != BandStatus::Within
            || self.group_band_status.is_some_and(|status| status != BandStatus::Within)
    }
}

/// Summed NDA share of one group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTotal {
    pub group: LandUseGroup,
    pub percentage: f64,
    pub band: Option<DefaultBand>,
    pub band_status: Option<BandStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramSummary {
    /// Sum of NDA-basis percentages
    pub nda_allocation_total: f64,
    /// Whether the NDA pool sums to 100 within tolerance
    pub nda_fully_allocated: bool,
    /// Share of the NDA pool nobody holds, never negative
    pub unallocated_percentage: f64,
    /// Sum of commercial-group percentages
    pub commercial_percentage: f64,
    /// Commercial share above 25%: absorption and frontage risk
    pub commercial_warning: bool,
    /// Reserve below the scale preset's minimum
    pub reserve_warning: bool,
    /// Constraint allowance above 35% of the gross site
    pub constraint_warning: bool,
    /// Constraint, reserve and NDA-basis public facilities, ha
    pub non_sellable_ha: f64,
    pub non_sellable_percent_of_gsa: f64,
    pub sellable_ha: f64,
    pub sellable_percent_of_gsa: f64,
    /// NDA-basis totals per group, in order of first appearance
    pub group_totals: Vec<GroupTotal>,
    /// Allocations above 0%, in scenario order
    pub active: Vec<AllocationLine>,
    /// Active rows outside their own band or their group's band
    pub out_of_band: Vec<String>,
}

impl ProgramSummary {
    pub fn from_scenario(scenario: &Scenario, areas: &CalculatedAreas, library: &LandUseLibrary) -> Self {
        let catalog = ScenarioCatalog::for_scenario(library, scenario);
        let gsa = areas.gsa;

        let nda_allocation_total = nda_percentage_total(&scenario.allocations, &catalog);
        let commercial_percentage: f64 = scenario
            .allocations
            .iter()
            .filter(|a| catalog.get(&a.category_id).is_some_and(|c| c.group == LandUseGroup::Commercial))
            .map(|a| a.percentage)
            .sum();
        let group_totals = group_totals(scenario, &catalog);

        let active: Vec<AllocationLine> = scenario
            .allocations
            .iter()
            .filter(|a| a.percentage > 0.0)
            .filter_map(|a| {
                let category = catalog.get(&a.category_id)?;
                let hectares = areas.allocations_ha.get(&a.category_id).copied().unwrap_or(0.0);
                let group_band_status = group_totals
                    .iter()
                    .find(|total| total.group == category.group)
                    .and_then(|total| total.band_status);
                Some(AllocationLine {
                    category_id: a.category_id.clone(),
                    label: category.label.clone(),
                    group: category.group,
                    sellable: category.sellable,
                    basis: category.basis(),
                    percentage: a.percentage,
                    hectares,
                    percent_of_gsa: ratio_percent(hectares, gsa),
                    locked: a.locked,
                    band_status: BandStatus::of_category(a.percentage, category),
                    group_band_status,
                })
            })
            .collect();

        // GSA-basis facilities are already inside nsr
        let public_facility_ha: f64 = active
            .iter()
            .filter(|line| !line.sellable && line.basis == AllocationBasis::Nda)
            .map(|line| line.hectares)
            .sum();
        let sellable_ha: f64 = active.iter().filter(|line| line.sellable).map(|line| line.hectares).sum();
        let non_sellable_ha = areas.nca + areas.nsr + public_facility_ha;

        let out_of_band = active
            .iter()
            .filter(|line| line.is_out_of_band())
            .map(|line| line.category_id.clone())
            .collect();

        Self {
            nda_allocation_total,
            nda_fully_allocated: (nda_allocation_total - FULL).abs() <= SUM_TOLERANCE,
            unallocated_percentage: (FULL - nda_allocation_total).max(0.0),
            commercial_percentage,
            commercial_warning: commercial_percentage > COMMERCIAL_SHARE_MAX,
            reserve_warning: areas.nsr_percentage < scale_preset(scenario.parameters.preset_id).nsr_min,
            constraint_warning: areas.nca_percentage > CONSTRAINT_SHARE_MAX,
            non_sellable_ha,
            non_sellable_percent_of_gsa: ratio_percent(non_sellable_ha, gsa),
            sellable_ha,
            sellable_percent_of_gsa: ratio_percent(sellable_ha, gsa),
            group_totals,
            active,
            out_of_band,
        }
    }
}

fn group_totals<C: CatalogRegistry + ?Sized>(scenario: &Scenario, catalog: &C) -> Vec<GroupTotal> {
    let mut totals: Vec<GroupTotal> = Vec::new();
    for allocation in &scenario.allocations {
        let Some(category) = catalog.get(&allocation.category_id) else {
            continue;
        };
        if category.basis() != AllocationBasis::Nda {
            continue;
        }
        match totals.iter_mut().find(|total| total.group == category.group) {
            Some(total) => total.percentage += allocation.percentage,
            None => totals.push(GroupTotal {
                group: category.group,
                percentage: allocation.percentage,
                band: group_band(category.group),
                band_status: None,
            }),
        }
    }
    for total in &mut totals {
        total.band_status = total.band.as_ref().map(|band| BandStatus::of(total.percentage, band));
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::calculate_scenario_areas;
    use crate::rebalancer::{AllocationRebalancer, CustomLandUseRequest};
    use crate::scenario::default_scenario;
    use masterplan_types::CustomKind;

    const EPS: f64 = 1e-9;

    fn summarise(scenario: &Scenario) -> ProgramSummary {
        let library = LandUseLibrary::built_in();
        let areas = calculate_scenario_areas(scenario, library);
        ProgramSummary::from_scenario(scenario, &areas, library)
    }

    fn with_percentages(percentages: &[(&str, f64)]) -> Scenario {
        let mut scenario = default_scenario(LandUseLibrary::built_in());
        for allocation in &mut scenario.allocations {
            allocation.percentage = percentages
                .iter()
                .find(|(id, _)| *id == allocation.category_id)
                .map_or(0.0, |(_, p)| *p);
        }
        scenario
    }

    fn group_status(summary: &ProgramSummary, group: LandUseGroup) -> Option<BandStatus> {
        summary.group_totals.iter().find(|t| t.group == group).and_then(|t| t.band_status)
    }

    #[test]
    fn default_scenario_summary() {
        let summary = summarise(&default_scenario(LandUseLibrary::built_in()));

        assert!(summary.nda_fully_allocated);
        assert_eq!(summary.unallocated_percentage, 0.0);
        assert_eq!(summary.active.len(), 1);
        assert_eq!(summary.active[0].band_status, BandStatus::Above);
        assert_eq!(summary.active[0].group_band_status, Some(BandStatus::Above));
        assert_eq!(summary.out_of_band, vec!["res_landed".to_string()]);
        assert!((summary.sellable_ha - 55.0).abs() < EPS);
        assert!((summary.non_sellable_ha - 45.0).abs() < EPS);
        assert!((summary.sellable_percent_of_gsa + summary.non_sellable_percent_of_gsa - 100.0).abs() < EPS);
        assert!(!summary.commercial_warning && !summary.reserve_warning && !summary.constraint_warning);
    }

    #[test]
    fn civic_rows_count_as_non_sellable() {
        let summary = summarise(&with_percentages(&[
            ("res_landed", 50.0),
            ("com_retail", 6.0),
            ("com_office", 4.0),
            ("civic_school", 4.0),
        ]));

        assert!(!summary.nda_fully_allocated);
        assert!((summary.unallocated_percentage - 36.0).abs() < EPS);
        assert_eq!(summary.commercial_percentage, 10.0);
        // school: 4% of 55 ha NDA
        assert!((summary.non_sellable_ha - (45.0 + 2.2)).abs() < EPS);
        assert!((summary.sellable_ha - 60.0 * 0.55).abs() < EPS);
        assert!(summary.out_of_band.is_empty());
    }

    #[test]
    fn group_band_flags_rows_that_are_individually_fine() {
        let summary = summarise(&with_percentages(&[
            ("res_landed", 40.0),
            ("res_townhouse", 5.0),
            ("com_retail", 10.0),
            ("com_office", 5.0),
            ("civic_school", 5.0),
            ("emp_business_park", 15.0),
            ("ind_light", 15.0),
            ("other_reserve", 5.0),
        ]));

        assert_eq!(group_status(&summary, LandUseGroup::Residential), Some(BandStatus::Below));
        assert_eq!(group_status(&summary, LandUseGroup::Commercial), Some(BandStatus::Within));
        assert_eq!(group_status(&summary, LandUseGroup::Other), None);
        assert!(summary.active.iter().all(|line| line.band_status == BandStatus::Within));
        assert_eq!(summary.out_of_band, vec!["res_landed".to_string(), "res_townhouse".to_string()]);
    }

    #[test]
    fn preset_program_is_within_every_band() {
        let library = LandUseLibrary::built_in();
        let scenario = AllocationRebalancer::default().rebalance_to_preset(&default_scenario(library));
        let summary = summarise(&scenario);
        assert!(summary.out_of_band.is_empty());
        assert!(summary.group_totals.iter().all(|t| t.band_status != Some(BandStatus::Below)));
    }

    #[test]
    fn custom_rows_are_never_out_of_band() {
        let rebalancer = AllocationRebalancer::default();
        let scenario = rebalancer.rebalance_to_preset(&default_scenario(LandUseLibrary::built_in()));
        let added = rebalancer
            .add_custom_land_use(
                &scenario,
                CustomLandUseRequest {
                    name: "Marina".to_string(),
                    kind: CustomKind::Sellable,
                    group: LandUseGroup::Other,
                    percentage: 5.0,
                },
            )
            .unwrap();

        let summary = summarise(&added.scenario);
        let marina = summary.active.iter().find(|line| line.category_id == added.category_id).unwrap();
        assert_eq!(marina.band_status, BandStatus::Within);
        assert!(summary.out_of_band.is_empty());
    }

    #[test]
    fn commercial_share_above_threshold_warns() {
        let summary = summarise(&with_percentages(&[("res_landed", 70.0), ("com_retail", 20.0), ("com_office", 10.0)]));
        assert_eq!(summary.commercial_percentage, 30.0);
        assert!(summary.commercial_warning);

        let summary = summarise(&with_percentages(&[("res_landed", 75.0), ("com_retail", 15.0), ("com_office", 10.0)]));
        assert!(!summary.commercial_warning);
    }

    #[test]
    fn reserve_and_constraint_warnings_follow_the_overrides() {
        let mut scenario = default_scenario(LandUseLibrary::built_in());
        scenario.parameters.nsr_override_percentage = Some(20.0);
        scenario.parameters.nca_override_percentage = Some(40.0);

        let summary = summarise(&scenario);
        assert!(summary.reserve_warning);
        assert!(summary.constraint_warning);
    }

    #[test]
    fn band_edges_are_within() {
        let band = DefaultBand::new(2.0, 6.0, 4.0);
        assert_eq!(BandStatus::of(2.0, &band), BandStatus::Within);
        assert_eq!(BandStatus::of(6.0, &band), BandStatus::Within);
        assert_eq!(BandStatus::of(1.9, &band), BandStatus::Below);
        assert_eq!(BandStatus::of(0.1, &DefaultBand::ZERO_WIDTH), BandStatus::Above);
    }
}
