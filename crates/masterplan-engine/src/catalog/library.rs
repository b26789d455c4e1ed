//! Built-in land-use library
//!
//! Immutable categories shipped with the engine. Default band targets sum to 100
//! so that rebalancing a fresh scenario to preset fills the whole NDA pool.

use super::CatalogRegistry;
use masterplan_types::{AllocationBasis, DefaultBand, LandUseCategory, LandUseGroup};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Indexed set of built-in categories
#[derive(Debug, Clone)]
pub struct LandUseLibrary {
    categories: Vec<LandUseCategory>,
    index: HashMap<String, usize>,
}

impl LandUseLibrary {
    /// Creates a library from `categories`. Later duplicates of an id are ignored.
    pub fn new(categories: Vec<LandUseCategory>) -> Self {
        let mut index = HashMap::with_capacity(categories.len());
        for (position, category) in categories.iter().enumerate() {
            index.entry(category.id.clone()).or_insert(position);
        }
        Self { categories, index }
    }

    /// The library compiled into the engine
    pub fn built_in() -> &'static LandUseLibrary {
        &BUILT_IN
    }

    pub fn iter(&self) -> impl Iterator<Item = &LandUseCategory> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl CatalogRegistry for LandUseLibrary {
    fn list(&self) -> Vec<&LandUseCategory> {
        self.categories.iter().collect()
    }

    fn get(&self, id: &str) -> Option<&LandUseCategory> {
        self.index.get(id).map(|&position| &self.categories[position])
    }
}

fn built_in(
    id: &str,
    label: &str,
    group: LandUseGroup,
    sellable: bool,
    band: (f64, f64, f64),
) -> LandUseCategory {
    LandUseCategory {
        id: id.to_string(),
        label: label.to_string(),
        group,
        sellable,
        allocation_basis: Some(AllocationBasis::Nda),
        default_band: DefaultBand::new(band.0, band.1, band.2),
        is_custom: false,
        custom_type: None,
    }
}

static BUILT_IN: LazyLock<LandUseLibrary> = LazyLock::new(|| {
    use LandUseGroup::*;

    LandUseLibrary::new(vec![
        // Residential
        built_in("res_landed", "Landed Housing", Residential, true, (30.0, 60.0, 45.0)),
        built_in("res_townhouse", "Townhouses", Residential, true, (5.0, 20.0, 10.0)),
        built_in("res_apartment", "Apartments", Residential, true, (0.0, 15.0, 5.0)),
        // Commercial
        built_in("com_retail", "Retail & F&B", Commercial, true, (3.0, 10.0, 7.0)),
        built_in("com_office", "Office", Commercial, true, (0.0, 8.0, 5.0)),
        built_in("mixed_use", "Mixed-use Blocks", MixedUse, true, (0.0, 10.0, 4.0)),
        // Civic
        built_in("civic_school", "Schools", Civic, false, (2.0, 6.0, 4.0)),
        built_in("civic_health", "Health Facilities", Civic, false, (0.5, 3.0, 1.5)),
        built_in("civic_worship", "Places of Worship", Civic, false, (0.5, 3.0, 1.5)),
        built_in("civic_community", "Community Centre", Civic, false, (0.5, 2.0, 1.0)),
        // Employment and industry
        built_in("emp_business_park", "Business Park", Employment, true, (0.0, 15.0, 6.0)),
        built_in("ind_light", "Light Industry", Industrial, true, (0.0, 15.0, 5.0)),
        // Special and other
        built_in("special_utilities", "Utility Depot", Special, false, (0.0, 3.0, 1.0)),
        built_in("other_reserve", "Future Development Reserve", Other, false, (0.0, 10.0, 4.0)),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_targets_fill_the_pool() {
        let total: f64 = LandUseLibrary::built_in().iter().map(|c| c.default_band.target).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn built_in_ids_are_unique_and_indexed() {
        let library = LandUseLibrary::built_in();
        for category in library.iter() {
            assert_eq!(library.get(&category.id).map(|c| &c.label), Some(&category.label));
            assert!(!category.is_custom);
        }
        assert_eq!(library.list().len(), library.len());
        assert!(library.get("does_not_exist").is_none());
    }

    #[test]
    fn first_duplicate_wins() {
        let first = built_in("a", "First", LandUseGroup::Other, false, (0.0, 1.0, 0.5));
        let second = built_in("a", "Second", LandUseGroup::Other, false, (0.0, 1.0, 0.5));
        let library = LandUseLibrary::new(vec![first, second]);
        assert_eq!(library.get("a").map(|c| c.label.as_str()), Some("First"));
    }
}
