//! Compiled-in planning presets
//!
//! Scale presets bucket target bands by project size, topography levels map to a
//! constraint target and right-of-way sets scale the roads target.

use masterplan_types::{DefaultBand, LandUseGroup, RowSetId, ScalePresetId, Tdi};
use serde::Serialize;

/// Target bands for one project-size bucket. All values are percent of GSA.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalePreset {
    pub id: ScalePresetId,
    pub label: &'static str,
    pub nsr_min: f64,
    pub nsr_max: f64,
    pub nsr_target: f64,
    pub open_space_target: f64,
    pub roads_target: f64,
}

/// Constraint guidance for one topography level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopographyLevel {
    pub tdi: Tdi,
    pub label: &'static str,
    pub nca_target: f64,
}

/// Road corridor widths and the multiplier they apply to the roads target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSet {
    pub id: RowSetId,
    pub label: &'static str,
    pub primary_m: f64,
    pub secondary_m: f64,
    pub roads_multiplier: f64,
}

const SCALE_PRESETS: [ScalePreset; 4] = [
    ScalePreset {
        id: ScalePresetId::S1,
        label: "Small site (5-20 ha) / urban edge",
        nsr_min: 20.0,
        nsr_max: 30.0,
        nsr_target: 25.0,
        open_space_target: 9.0,
        roads_target: 15.0,
    },
    ScalePreset {
        id: ScalePresetId::S2,
        label: "Medium (20-50 ha) / peri-urban",
        nsr_min: 28.0,
        nsr_max: 38.0,
        nsr_target: 33.0,
        open_space_target: 12.0,
        roads_target: 20.0,
    },
    ScalePreset {
        id: ScalePresetId::S3,
        label: "Large (50-150 ha) / new district",
        nsr_min: 35.0,
        nsr_max: 45.0,
        nsr_target: 40.0,
        open_space_target: 14.0,
        roads_target: 25.0,
    },
    ScalePreset {
        id: ScalePresetId::S4,
        label: "Very large (150+ ha) / new town",
        nsr_min: 40.0,
        nsr_max: 50.0,
        nsr_target: 45.0,
        open_space_target: 16.0,
        roads_target: 27.0,
    },
];

const TOPOGRAPHY_LEVELS: [TopographyLevel; 5] = [
    TopographyLevel { tdi: Tdi::Flat, label: "Flat / easy (0-3%)", nca_target: 1.5 },
    TopographyLevel { tdi: Tdi::Gentle, label: "Gentle (3-7%)", nca_target: 5.0 },
    TopographyLevel { tdi: Tdi::Rolling, label: "Rolling (7-12%)", nca_target: 9.5 },
    TopographyLevel { tdi: Tdi::Steep, label: "Steep (12-20%)", nca_target: 16.0 },
    TopographyLevel {
        tdi: Tdi::VerySteep,
        label: "Very steep / fragile (20-35%)",
        nca_target: 27.5,
    },
];

const ROW_SETS: [RowSet; 3] = [
    RowSet {
        id: RowSetId::A,
        label: "RoW Set A (Primary 24m, Secondary 16m)",
        primary_m: 24.0,
        secondary_m: 16.0,
        roads_multiplier: 1.0,
    },
    RowSet {
        id: RowSetId::B,
        label: "RoW Set B (Primary 30m, Secondary 20m)",
        primary_m: 30.0,
        secondary_m: 20.0,
        roads_multiplier: 1.25,
    },
    RowSet {
        id: RowSetId::C,
        label: "RoW Set C (Primary 24m, Secondary 8m)",
        primary_m: 24.0,
        secondary_m: 8.0,
        roads_multiplier: 0.8,
    },
];

pub fn scale_preset(id: ScalePresetId) -> &'static ScalePreset {
    match id {
        ScalePresetId::S1 => &SCALE_PRESETS[0],
        ScalePresetId::S2 => &SCALE_PRESETS[1],
        ScalePresetId::S3 => &SCALE_PRESETS[2],
        ScalePresetId::S4 => &SCALE_PRESETS[3],
    }
}

pub fn topography_level(tdi: Tdi) -> &'static TopographyLevel {
    &TOPOGRAPHY_LEVELS[u8::from(tdi) as usize]
}

pub fn row_set(id: RowSetId) -> &'static RowSet {
    match id {
        RowSetId::A => &ROW_SETS[0],
        RowSetId::B => &ROW_SETS[1],
        RowSetId::C => &ROW_SETS[2],
    }
}

/// Guidance band for the summed NDA share of a whole group. Groups without
/// guidance (mixed-use, other) return `None`; `target` is the band midpoint.
pub const fn group_band(group: LandUseGroup) -> Option<DefaultBand> {
    match group {
        LandUseGroup::Residential => Some(DefaultBand::new(50.0, 70.0, 60.0)),
        LandUseGroup::Commercial => Some(DefaultBand::new(10.0, 20.0, 15.0)),
        LandUseGroup::Civic => Some(DefaultBand::new(2.0, 8.0, 5.0)),
        LandUseGroup::Special => Some(DefaultBand::new(0.0, 8.0, 4.0)),
        LandUseGroup::Employment => Some(DefaultBand::new(0.0, 15.0, 7.5)),
        LandUseGroup::Industrial => Some(DefaultBand::new(0.0, 20.0, 10.0)),
        LandUseGroup::MixedUse | LandUseGroup::Other => None,
    }
}

pub fn scale_presets() -> &'static [ScalePreset] {
    &SCALE_PRESETS
}

pub fn topography_levels() -> &'static [TopographyLevel] {
    &TOPOGRAPHY_LEVELS
}

pub fn row_sets() -> &'static [RowSet] {
    &ROW_SETS
}
