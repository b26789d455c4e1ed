#![deny(warnings)]
#![allow(missing_docs)]
//! Allocation and feasibility engine for land-use master planning.
//!
//! This crate turns a site's gross area into a land-use program and a rough
//! cost/revenue estimate. It derives the area breakdown from site parameters,
//! keeps adjustable percentage allocations consistent when one of them changes,
//! and prices the resulting areas under two sale models.
//!
//! Every calculation is synchronous, deterministic and free of I/O. Edits take a
//! scenario and return a complete replacement; the caller owns persistence.

/// Area breakdown from site parameters and allocations
pub mod areas;
/// Category registry and the built-in land-use library
pub mod catalog;
/// Unit conversions and rounding parameters
pub mod constants;
/// Read and edit paths bound to one library
pub mod engine;
/// Validation and lookup errors
pub mod error;
/// Cost, revenue and profit estimate
pub mod feasibility;
/// Scale, topography and right-of-way tables
pub mod presets;
/// Proportional redistribution, locking and custom categories
pub mod rebalancer;
/// Largest-remainder rounding
pub mod rounding;
/// Scenario construction and import repair
pub mod scenario;
/// Shared single-writer scenario store
pub mod store;
/// Derived program-table figures
pub mod summary;

pub use areas::{calculate_areas, calculate_scenario_areas};
pub use catalog::{CatalogRegistry, LandUseLibrary, ScenarioCatalog};
pub use engine::{PlanEngine, PlanOutputs};
pub use error::{CustomLandUseError, PlanError, PlanResult};
pub use feasibility::{RevenueBuckets, calculate_feasibility, calculate_scenario_feasibility};
pub use rebalancer::{AllocationRebalancer, CustomLandUseAdded, CustomLandUseRequest};
pub use rounding::largest_remainder_round;
pub use scenario::{default_scenario, normalize_imported};
pub use store::ScenarioStore;
pub use summary::{AllocationLine, BandStatus, GroupTotal, ProgramSummary};

pub use masterplan_types as types;
