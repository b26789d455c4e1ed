use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Planning group a land-use category belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandUseGroup {
    /// Housing of any density
    Residential,
    /// Retail, office and other trade
    Commercial,
    /// Schools, health, worship and community facilities
    Civic,
    /// Utilities, depots and other special-purpose land
    Special,
    /// Business parks and employment land
    Employment,
    /// Industrial estates
    Industrial,
    /// Mixed residential and commercial blocks
    #[serde(rename = "Mixed-use")]
    MixedUse,
    /// Anything else
    Other,
}

impl LandUseGroup {
    /// Display label as used in exports and the program table
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Residential => "Residential",
            Self::Commercial => "Commercial",
            Self::Civic => "Civic",
            Self::Special => "Special",
            Self::Employment => "Employment",
            Self::Industrial => "Industrial",
            Self::MixedUse => "Mixed-use",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for LandUseGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pool a category's percentage is computed against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllocationBasis {
    /// Percentage of the net developable area
    #[default]
    #[serde(rename = "NDA")]
    Nda,
    /// Percentage of the gross site area, carved out before the NDA
    #[serde(rename = "GSA")]
    Gsa,
}

/// Percentage guidance for a category. Not enforced by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultBand {
    /// Lower bound of the guidance band
    pub min: f64,
    /// Upper bound of the guidance band
    pub max: f64,
    /// Target used when rebalancing to preset
    pub target: f64,
}

impl DefaultBand {
    /// Band carried by custom categories
    pub const ZERO_WIDTH: Self = Self { min: 0.0, max: 0.0, target: 0.0 };

    /// Creates a new band
    #[must_use]
    pub const fn new(min: f64, max: f64, target: f64) -> Self {
        Self { min, max, target }
    }

    /// Whether `percentage` lies inside `[min, max]`
    #[must_use]
    pub fn contains(&self, percentage: f64) -> bool {
        percentage >= self.min && percentage <= self.max
    }
}

/// Kind of a user-defined category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CustomKind {
    /// Revenue-generating, drawn from the NDA pool
    Sellable,
    /// Public facility carved directly out of the gross site area
    NonSellable,
}

impl CustomKind {
    /// Whether categories of this kind generate revenue
    #[must_use]
    pub const fn is_sellable(self) -> bool {
        matches!(self, Self::Sellable)
    }

    /// Allocation basis implied by the kind
    #[must_use]
    pub const fn basis(self) -> AllocationBasis {
        match self {
            Self::Sellable => AllocationBasis::Nda,
            Self::NonSellable => AllocationBasis::Gsa,
        }
    }
}

/// A land-use category, either built in or user defined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandUseCategory {
    /// Stable unique identifier
    pub id: String,
    /// Human readable label
    pub label: String,
    /// Planning group
    pub group: LandUseGroup,
    /// Whether the category's area counts towards the sellable area
    pub sellable: bool,
    /// Pool the percentage applies to; absent means NDA
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation_basis: Option<AllocationBasis>,
    /// Percentage guidance
    pub default_band: DefaultBand,
    /// Set on categories created through the rebalancer
    #[serde(default)]
    pub is_custom: bool,
    /// Kind the custom category was created with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_type: Option<CustomKind>,
}

impl LandUseCategory {
    /// Effective allocation basis, defaulting to NDA
    #[must_use]
    pub fn basis(&self) -> AllocationBasis {
        self.allocation_basis.unwrap_or_default()
    }
}

/// Share of a pool assigned to one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    /// Foreign key into the catalog
    pub category_id: String,
    /// Percentage (0-100) of the pool named by the category's basis
    pub percentage: f64,
    /// Locked allocations are excluded from redistribution
    pub locked: bool,
}

impl Allocation {
    /// Creates an unlocked allocation
    #[must_use]
    pub fn new(category_id: impl Into<String>, percentage: f64) -> Self {
        Self { category_id: category_id.into(), percentage, locked: false }
    }
}

/// Topography difficulty index, an ordinal proxy for constraint severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tdi {
    /// Flat / easy (0-3% slope)
    Flat,
    /// Gentle (3-7%)
    #[default]
    Gentle,
    /// Rolling (7-12%)
    Rolling,
    /// Steep (12-20%)
    Steep,
    /// Very steep or fragile (20-35%)
    VerySteep,
}

impl TryFrom<u8> for Tdi {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Flat),
            1 => Ok(Self::Gentle),
            2 => Ok(Self::Rolling),
            3 => Ok(Self::Steep),
            4 => Ok(Self::VerySteep),
            other => Err(format!("topography index must be 0-4, got {other}")),
        }
    }
}

impl From<Tdi> for u8 {
    fn from(tdi: Tdi) -> Self {
        tdi as Self
    }
}

/// Scale preset bucket, selected by project size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalePresetId {
    /// Small site / urban edge
    S1,
    /// Medium / peri-urban
    S2,
    /// Large / new district
    #[default]
    S3,
    /// Very large / new town
    S4,
}

/// Right-of-way width set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowSetId {
    /// Primary 24m, secondary 16m
    #[default]
    A,
    /// Primary 30m, secondary 20m
    B,
    /// Primary 24m, secondary 8m
    C,
}

/// Site-level inputs to the area calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioParameters {
    /// Gross site area in hectares
    pub gsa: f64,
    /// Topography difficulty index
    pub tdi: Tdi,
    /// Scale preset
    pub preset_id: ScalePresetId,
    /// Right-of-way set
    pub row_set_id: RowSetId,
    /// Replaces the topography constraint target when set
    #[serde(default)]
    pub nca_override_percentage: Option<f64>,
    /// Replaces the preset reserve target when set
    #[serde(default)]
    pub nsr_override_percentage: Option<f64>,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self {
            gsa: 100.0,
            tdi: Tdi::default(),
            preset_id: ScalePresetId::default(),
            row_set_id: RowSetId::default(),
            nca_override_percentage: None,
            nsr_override_percentage: None,
        }
    }
}

/// Pricing model for the feasibility estimate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildModel {
    /// Serviced land is sold unbuilt
    #[default]
    LandSale,
    /// Residential and commercial plots are built on and sold as floor space
    BuildAndSell,
}

/// Unit economic rates. Currency amounts are per square metre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeasibilityInputs {
    /// Land acquisition cost per sqm of gross site
    pub land_acquisition_cost: f64,
    /// Construction cost per sqm of road land
    pub roads_cost_rate: f64,
    /// Sale price per sqm of residential land or floor space
    pub residential_sale_price: f64,
    /// Sale price per sqm of commercial land or floor space
    pub commercial_sale_price: f64,
    /// Land sale price per sqm for other sellable categories
    pub custom_sellable_sale_price: f64,
    /// Pricing model
    pub build_model: BuildModel,
    /// Build cost per built sqm of residential
    pub residential_build_cost: f64,
    /// Build cost per built sqm of commercial
    pub commercial_build_cost: f64,
    /// Residential site coverage in percent
    pub residential_coverage: f64,
    /// Commercial site coverage in percent
    pub commercial_coverage: f64,
}

impl Default for FeasibilityInputs {
    fn default() -> Self {
        Self {
            land_acquisition_cost: 1_000_000.0,
            roads_cost_rate: 500_000.0,
            residential_sale_price: 5_000_000.0,
            commercial_sale_price: 8_000_000.0,
            custom_sellable_sale_price: 6_000_000.0,
            build_model: BuildModel::LandSale,
            residential_build_cost: 3_000_000.0,
            commercial_build_cost: 4_000_000.0,
            residential_coverage: 60.0,
            commercial_coverage: 70.0,
        }
    }
}

/// The single mutable planning record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Scenario identity
    pub id: String,
    /// Display name
    pub name: String,
    /// Site parameters
    #[serde(flatten)]
    pub parameters: ScenarioParameters,
    /// User-defined categories, in creation order
    #[serde(default)]
    pub custom_land_uses: Vec<LandUseCategory>,
    /// One allocation per known category id
    pub allocations: Vec<Allocation>,
    /// Unit economic rates
    #[serde(default)]
    pub feasibility: FeasibilityInputs,
    /// Format version of the record
    #[serde(default)]
    pub version: String,
    /// Last committed change
    pub timestamp: DateTime<Utc>,
}

impl Scenario {
    /// Allocation for `category_id`, if present
    #[must_use]
    pub fn allocation(&self, category_id: &str) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.category_id == category_id)
    }

    /// Percentage for `category_id`, `0.0` when absent
    #[must_use]
    pub fn percentage_of(&self, category_id: &str) -> f64 {
        self.allocation(category_id).map_or(0.0, |a| a.percentage)
    }
}

/// Area breakdown derived from a scenario. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedAreas {
    /// Gross site area, ha
    pub gsa: f64,
    /// Constraint reserve, ha
    pub nca: f64,
    /// Non-sellable reserve including GSA-basis public facilities, ha
    pub nsr: f64,
    /// Net developable area, ha
    pub nda: f64,
    /// Sellable area, ha
    pub sra: f64,
    /// Constraint percentage of GSA
    pub nca_percentage: f64,
    /// Base reserve percentage of GSA
    pub nsr_percentage: f64,
    /// NDA as a percentage of GSA
    pub nda_percentage: f64,
    /// SRA as a percentage of GSA
    pub sra_efficiency: f64,
    /// Roads share of the base reserve, ha
    pub roads_ha: f64,
    /// Open-space share of the base reserve, ha
    pub open_space_ha: f64,
    /// Utilities remainder plus GSA-basis public facilities, ha
    pub utilities_ha: f64,
    /// Area per category id, ha
    pub allocations_ha: BTreeMap<String, f64>,
}

/// Cost, revenue and profit derived from an area breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityOutputs {
    /// Gross site area times land rate
    pub land_acquisition_cost: f64,
    /// Road land times road rate
    pub infrastructure_cost: f64,
    /// Construction cost, zero under land sale
    pub build_cost: f64,
    /// Land plus infrastructure plus build
    pub total_cost: f64,
    /// Sum of all sales
    pub total_revenue: f64,
    /// Revenue minus total cost
    pub profit: f64,
    /// Profit as a percentage of revenue
    pub profit_margin: f64,
    /// Profit per gross hectare
    pub profit_per_ha: f64,
}
