//! Masterplan Types
//!
//! This crate defines the plain records exchanged between the masterplan engine and
//! its collaborators (presentation, serialization, persistence). It holds no logic
//! beyond small accessors so that every crate in the workspace can share the same
//! shapes without depending on the engine itself.

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(missing_docs)]

mod types;

pub use types::{
    Allocation, AllocationBasis, BuildModel, CalculatedAreas, CustomKind, DefaultBand,
    FeasibilityInputs, FeasibilityOutputs, LandUseCategory, LandUseGroup, RowSetId,
    ScalePresetId, Scenario, ScenarioParameters, Tdi,
};
