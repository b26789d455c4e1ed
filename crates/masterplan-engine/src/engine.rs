use crate::areas::calculate_scenario_areas;
use crate::catalog::{LandUseLibrary, ScenarioCatalog};
use crate::feasibility::calculate_scenario_feasibility;
use crate::rebalancer::AllocationRebalancer;
use crate::summary::ProgramSummary;
use masterplan_types::{CalculatedAreas, FeasibilityOutputs, Scenario};
use serde::Serialize;
use tracing::{debug, instrument};

/// Everything the read path derives from a scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutputs {
    pub areas: CalculatedAreas,
    pub feasibility: FeasibilityOutputs,
}

/// Read and edit paths bound to one land-use library
#[derive(Debug, Clone, Copy)]
pub struct PlanEngine<'a> {
    library: &'a LandUseLibrary,
    rebalancer: AllocationRebalancer<'a>,
}

impl Default for PlanEngine<'static> {
    fn default() -> Self {
        Self::new(LandUseLibrary::built_in())
    }
}

impl<'a> PlanEngine<'a> {
    pub fn new(library: &'a LandUseLibrary) -> Self {
        Self { library, rebalancer: AllocationRebalancer::new(library) }
    }

    pub fn library(&self) -> &'a LandUseLibrary {
        self.library
    }

    pub fn rebalancer(&self) -> &AllocationRebalancer<'a> {
        &self.rebalancer
    }

    pub fn catalog<'s>(&self, scenario: &'s Scenario) -> ScenarioCatalog<'s>
    where
        'a: 's,
    {
        ScenarioCatalog::for_scenario(self.library, scenario)
    }

    pub fn areas(&self, scenario: &Scenario) -> CalculatedAreas {
        calculate_scenario_areas(scenario, self.library)
    }

    pub fn feasibility(&self, scenario: &Scenario) -> FeasibilityOutputs {
        self.evaluate(scenario).feasibility
    }

    pub fn summary(&self, scenario: &Scenario) -> ProgramSummary {
        let areas = self.areas(scenario);
        ProgramSummary::from_scenario(scenario, &areas, self.library)
    }

    /// Areas then feasibility, in that order
    #[instrument(skip(self, scenario), fields(scenario_id = %scenario.id))]
    pub fn evaluate(&self, scenario: &Scenario) -> PlanOutputs {
        let areas = self.areas(scenario);
        let feasibility = calculate_scenario_feasibility(scenario, &areas, self.library);
        debug!(
            nda = areas.nda,
            sra = areas.sra,
            profit = feasibility.profit,
            "Evaluated scenario"
        );
        PlanOutputs { areas, feasibility }
    }
}
