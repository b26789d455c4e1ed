//! Command-line surface over the allocation engine
//!
//! Every command reads a scenario JSON file, applies one read or edit, and
//! returns the result as JSON. Files are never written back; callers redirect
//! stdout when they want to keep an edit.

use crate::config::MasterplanConfig;
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use masterplan_engine::{
    CatalogRegistry, CustomLandUseRequest, PlanEngine, PlanError, default_scenario, normalize_imported,
};
use masterplan_types::{CustomKind, LandUseGroup, Scenario};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Land-use allocation and feasibility calculator
#[derive(Debug, Parser)]
#[command(name = "masterplan")]
#[command(about = "Land-use allocation and feasibility calculator for master plans")]
#[command(version)]
pub struct MasterplanCli {
    #[command(subcommand)]
    pub command: Command,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Log as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a fresh scenario built from the configured defaults
    Template,

    /// Print the area breakdown of a scenario
    Areas {
        /// Scenario JSON file
        file: PathBuf,
    },

    /// Print the cost and revenue estimate of a scenario
    Feasibility {
        /// Scenario JSON file
        file: PathBuf,
    },

    /// Print the program-table summary of a scenario
    Summary {
        /// Scenario JSON file
        file: PathBuf,
    },

    /// Set one allocation and redistribute the rest
    Set {
        /// Scenario JSON file
        file: PathBuf,

        /// Category id
        #[arg(long)]
        category: String,

        /// New percentage of the category's pool
        #[arg(long, allow_negative_numbers = true, required_unless_present = "hectares", conflicts_with = "hectares")]
        percentage: Option<f64>,

        /// New area in hectares, converted against the category's pool
        #[arg(long, allow_negative_numbers = true)]
        hectares: Option<f64>,
    },

    /// Toggle the lock on one allocation
    Lock {
        /// Scenario JSON file
        file: PathBuf,

        /// Category id
        #[arg(long)]
        category: String,
    },

    /// Reset unlocked allocations to the preset's default targets
    Rebalance {
        /// Scenario JSON file
        file: PathBuf,
    },

    /// Add a user-defined land use
    AddCustom {
        /// Scenario JSON file
        file: PathBuf,

        /// Display name
        #[arg(long)]
        name: String,

        /// Sellable uses share the NDA pool; non-sellable ones take GSA off the top
        #[arg(long, value_enum)]
        kind: KindArg,

        #[arg(long, value_enum, default_value = "other")]
        group: GroupArg,

        /// Initial percentage
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        percentage: f64,
    },

    /// Remove a user-defined land use
    RemoveCustom {
        /// Scenario JSON file
        file: PathBuf,

        /// Custom category id
        #[arg(long)]
        category: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Sellable,
    NonSellable,
}

impl From<KindArg> for CustomKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Sellable => Self::Sellable,
            KindArg::NonSellable => Self::NonSellable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupArg {
    Residential,
    Commercial,
    Civic,
    Special,
    Employment,
    Industrial,
    MixedUse,
    Other,
}

impl From<GroupArg> for LandUseGroup {
    fn from(group: GroupArg) -> Self {
        match group {
            GroupArg::Residential => Self::Residential,
            GroupArg::Commercial => Self::Commercial,
            GroupArg::Civic => Self::Civic,
            GroupArg::Special => Self::Special,
            GroupArg::Employment => Self::Employment,
            GroupArg::Industrial => Self::Industrial,
            GroupArg::MixedUse => Self::MixedUse,
            GroupArg::Other => Self::Other,
        }
    }
}

impl MasterplanCli {
    /// Runs the command and returns what should be printed on stdout.
    ///
    /// A rejected custom land use surfaces as [`PlanError::CustomLandUse`]
    /// inside the returned error, so callers can map it to an exit code.
    pub fn run(&self, config: &MasterplanConfig) -> anyhow::Result<String> {
        let engine = PlanEngine::default();
        let pretty = self.pretty || config.output.pretty;

        match &self.command {
            Command::Template => {
                let mut scenario = default_scenario(engine.library());
                scenario.parameters = config.defaults.parameters();
                render(&scenario, pretty)
            }
            Command::Areas { file } => {
                let scenario = load_scenario(file, &engine)?;
                render(&engine.areas(&scenario), pretty)
            }
            Command::Feasibility { file } => {
                let scenario = load_scenario(file, &engine)?;
                render(&engine.feasibility(&scenario), pretty)
            }
            Command::Summary { file } => {
                let scenario = load_scenario(file, &engine)?;
                render(&engine.summary(&scenario), pretty)
            }
            Command::Set { file, category, percentage, hectares } => {
                let scenario = load_scenario(file, &engine)?;
                engine.catalog(&scenario).require(category)?;
                let next = match (percentage, hectares) {
                    (Some(percentage), _) => engine.rebalancer().set_allocation(&scenario, category, *percentage),
                    (None, Some(hectares)) => {
                        engine.rebalancer().set_allocation_hectares(&scenario, category, *hectares)
                    }
                    (None, None) => anyhow::bail!("either --percentage or --hectares is required"),
                };
                render(&next, pretty)
            }
            Command::Lock { file, category } => {
                let scenario = load_scenario(file, &engine)?;
                engine.catalog(&scenario).require(category)?;
                render(&engine.rebalancer().toggle_lock(&scenario, category), pretty)
            }
            Command::Rebalance { file } => {
                let scenario = load_scenario(file, &engine)?;
                render(&engine.rebalancer().rebalance_to_preset(&scenario), pretty)
            }
            Command::AddCustom { file, name, kind, group, percentage } => {
                let scenario = load_scenario(file, &engine)?;
                let request = CustomLandUseRequest {
                    name: name.clone(),
                    kind: (*kind).into(),
                    group: (*group).into(),
                    percentage: *percentage,
                };
                let added = engine.rebalancer().add_custom_land_use(&scenario, request).map_err(PlanError::from)?;
                info!(category_id = %added.category_id, label = %added.label, "Custom land use ready");
                render(&added.scenario, pretty)
            }
            Command::RemoveCustom { file, category } => {
                let scenario = load_scenario(file, &engine)?;
                render(&engine.rebalancer().remove_custom_land_use(&scenario, category), pretty)
            }
        }
    }
}

/// Reads a scenario file and repairs it against the built-in library
pub fn load_scenario(path: &Path, engine: &PlanEngine<'_>) -> anyhow::Result<Scenario> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read scenario file '{}'", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse scenario file '{}'", path.display()))?;
    debug!(path = %path.display(), scenario_id = %scenario.id, "Loaded scenario");
    Ok(normalize_imported(scenario, engine.library()))
}

fn render<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let output = if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? };
    Ok(output)
}
