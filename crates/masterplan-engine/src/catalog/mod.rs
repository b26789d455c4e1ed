//! Category lookup
//!
//! The engine never holds categories itself. It resolves ids through a
//! [`CatalogRegistry`], usually a [`ScenarioCatalog`] that reads through the
//! built-in library first and the scenario's custom categories second.

pub mod library;

pub use library::LandUseLibrary;

use crate::error::{PlanError, PlanResult};
use masterplan_types::{AllocationBasis, LandUseCategory, Scenario};

/// Read-only view over land-use categories
pub trait CatalogRegistry {
    /// All categories, built-in first
    fn list(&self) -> Vec<&LandUseCategory>;

    /// The category with `id`, if any
    fn get(&self, id: &str) -> Option<&LandUseCategory>;

    /// Basis of `id`. Unknown ids are treated as NDA.
    fn basis_of(&self, id: &str) -> AllocationBasis {
        self.get(id).map(LandUseCategory::basis).unwrap_or_default()
    }

    /// Whether `id` is a known sellable category
    fn is_sellable(&self, id: &str) -> bool {
        self.get(id).is_some_and(|c| c.sellable)
    }

    /// Like [`get`](Self::get) but fails on unknown ids
    fn require(&self, id: &str) -> PlanResult<&LandUseCategory> {
        self.get(id).ok_or_else(|| PlanError::UnknownCategory { category_id: id.to_string() })
    }
}

/// Built-in library plus a scenario's custom categories
#[derive(Debug, Clone, Copy)]
pub struct ScenarioCatalog<'a> {
    library: &'a LandUseLibrary,
    custom: &'a [LandUseCategory],
}

impl<'a> ScenarioCatalog<'a> {
    pub fn new(library: &'a LandUseLibrary, custom: &'a [LandUseCategory]) -> Self {
        Self { library, custom }
    }

    pub fn for_scenario(library: &'a LandUseLibrary, scenario: &'a Scenario) -> Self {
        Self::new(library, &scenario.custom_land_uses)
    }

    /// Whether any category already carries `label`, ignoring case
    pub fn has_label(&self, label: &str) -> bool {
        let wanted = label.to_lowercase();
        self.library
            .iter()
            .chain(self.custom.iter())
            .any(|c| c.label.to_lowercase() == wanted)
    }
}

impl CatalogRegistry for ScenarioCatalog<'_> {
    fn list(&self) -> Vec<&LandUseCategory> {
        self.library.iter().chain(self.custom.iter()).collect()
    }

    fn get(&self, id: &str) -> Option<&LandUseCategory> {
        self.library.get(id).or_else(|| self.custom.iter().find(|c| c.id == id))
    }
}
