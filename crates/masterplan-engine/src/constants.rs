/// Core constants used throughout the masterplan engine
///
/// Unit conversions and rounding parameters live here so that the calculators
/// and the rebalancer agree on them.
/// Area unit conversions
pub mod units {
    /// Square metres in one hectare
    pub const SQM_PER_HA: f64 = 10_000.0;
}

/// Percentage bookkeeping
pub mod percent {
    /// Full pool, in percent
    pub const FULL: f64 = 100.0;

    /// Rounding works on integer tenths of a percent
    pub const ROUNDING_SCALE: f64 = 10.0;

    /// Tolerance for treating an NDA total as "sums to 100"
    pub const SUM_TOLERANCE: f64 = 0.1;
}

/// Program summary warning thresholds, in percent
pub mod warnings {
    /// Commercial share of the NDA pool above which absorption is at risk
    pub const COMMERCIAL_SHARE_MAX: f64 = 25.0;

    /// Constraint share of the gross site above which the site is constraint-heavy
    pub const CONSTRAINT_SHARE_MAX: f64 = 35.0;
}

/// Custom category construction
pub mod custom {
    /// Prefix of generated custom category ids
    pub const ID_PREFIX: &str = "custom_";

    /// First suffix tried when a label collides
    pub const FIRST_DUPLICATE_SUFFIX: u32 = 2;
}

/// Scenario record defaults
pub mod scenario {
    /// Id of the default scenario
    pub const DEFAULT_ID: &str = "default";

    /// Name of a freshly created scenario
    pub const DEFAULT_NAME: &str = "Untitled Scenario";

    /// Record format version
    pub const FORMAT_VERSION: &str = "0.0";

    /// Category that receives the whole NDA pool in a fresh scenario
    pub const DEFAULT_FULL_CATEGORY: &str = "res_landed";
}
