//! Error types for the masterplan engine
//!
//! The calculation paths are total and never fail. Only custom category creation
//! has a validation surface; the remaining variants cover lookups made by callers
//! that sit around the engine (the scenario store and explicit catalog lookups).

use thiserror::Error;

/// Validation failures of `add_custom_land_use`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CustomLandUseError {
    /// The trimmed name is empty
    #[error("Name is required.")]
    EmptyName,

    /// The requested percentage lies outside `[0, 100]`
    #[error("Allocation must be between 0 and 100%, got {percentage}.")]
    PercentageOutOfRange { percentage: f64 },

    /// A sellable request is larger than the unlocked NDA pool it draws from
    #[error(
        "Total allocation cannot exceed 100%: requested {requested}% but only {available}% is unlocked. Unlock or reduce existing rows first."
    )]
    CapacityExceeded { requested: f64, available: f64 },
}

impl CustomLandUseError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            CustomLandUseError::EmptyName => "empty-name",
            CustomLandUseError::PercentageOutOfRange { .. } => "percentage-out-of-range",
            CustomLandUseError::CapacityExceeded { .. } => "capacity-exceeded",
        }
    }
}

/// Errors raised around the engine, never by the calculators themselves
#[derive(Error, Debug, Clone)]
pub enum PlanError {
    /// A category id that neither the library nor the scenario knows
    #[error("Unknown land-use category: {category_id}")]
    UnknownCategory { category_id: String },

    /// A scenario id that the store does not hold
    #[error("Scenario not found: {scenario_id}")]
    ScenarioNotFound { scenario_id: String },

    /// A custom category could not be created
    #[error("Custom land use rejected: {0}")]
    CustomLandUse(#[from] CustomLandUseError),
}

impl PlanError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            PlanError::UnknownCategory { .. } => "catalog",
            PlanError::ScenarioNotFound { .. } => "store",
            PlanError::CustomLandUse(_) => "validation",
        }
    }

    /// Check if the caller can fix the input and retry
    pub fn is_recoverable(&self) -> bool {
        match self {
            PlanError::UnknownCategory { .. } => true,
            PlanError::ScenarioNotFound { .. } => false,
            PlanError::CustomLandUse(_) => true,
        }
    }
}

/// Result type for operations around the engine
pub type PlanResult<T> = Result<T, PlanError>;
