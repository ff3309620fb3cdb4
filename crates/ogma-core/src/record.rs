//! Classified polygon records, the input stream of the engine.
//!
//! Records arrive pre-classified: the land-cover → land-type derivation and
//! the stand-age → age-class/seral assignment happen in an upstream pass.
//! The engine only aggregates.

use serde::{Deserialize, Serialize};

/// Reserve designation of a stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReserveStatus {
    #[serde(rename = "OGMA")]
    Ogma,
    #[serde(rename = "NON-OGMA")]
    NonOgma,
}

impl ReserveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReserveStatus::Ogma => "OGMA",
            ReserveStatus::NonOgma => "NON-OGMA",
        }
    }
}

/// Land type after the upstream land-cover derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandType {
    #[serde(rename = "FORESTED")]
    Forested,
    #[serde(rename = "HARVESTED")]
    Harvested,
    #[serde(rename = "NON-PRODUCTIVE")]
    NonProductive,
}

impl LandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LandType::Forested => "FORESTED",
            LandType::Harvested => "HARVESTED",
            LandType::NonProductive => "NON-PRODUCTIVE",
        }
    }

    /// Land type under which a record accumulates. Harvested area at age
    /// class 0 folds into the forested bucket: a just-harvested stand's
    /// forested/harvested distinction is immaterial to area totals.
    pub fn folded(self, age_class: u8) -> LandType {
        match (self, age_class) {
            (LandType::Harvested, 0) => LandType::Forested,
            (lt, _) => lt,
        }
    }
}

/// Operability of a stand within an operating area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operability {
    Operable,
    Inoperable,
}

impl Operability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operability::Operable => "OPERABLE",
            Operability::Inoperable => "INOPERABLE",
        }
    }
}

/// Seral stage assigned by the upstream classifier (see [`crate::age`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeralStage {
    Early,
    Mid,
    Mature,
    Old,
}

impl SeralStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeralStage::Early => "EARLY",
            SeralStage::Mid => "MID",
            SeralStage::Mature => "MATURE",
            SeralStage::Old => "OLD",
        }
    }
}

/// One classified polygon. Area is in hectares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    /// Landscape unit name.
    pub unit_name: String,
    /// Landscape unit number; a trailing `P` marks a park record.
    pub unit_number: String,
    /// Full land-resource-plan name (mapped to a short target key at
    /// summarization time).
    pub resource_plan: String,
    /// Natural disturbance type (NDT).
    pub disturbance_type: String,
    /// Biogeoclimatic (BEC) zone.
    pub zone: String,
    /// Biodiversity emphasis option, or the sentinel `NA`.
    pub bio_option: String,
    pub reserve_status: ReserveStatus,
    /// Age class 0–9; 0 means freshly harvested.
    pub age_class: u8,
    /// Seral stage, when the classifier could assign one.
    #[serde(default)]
    pub seral: Option<SeralStage>,
    pub land_type: LandType,
    pub operability: Operability,
    /// Absent when the polygon lies outside every operating area.
    #[serde(default)]
    pub operating_area: Option<String>,
    pub area_ha: f64,
    /// Connectivity-corridor flag.
    #[serde(default)]
    pub corridor: bool,
}
