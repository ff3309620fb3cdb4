//! Per-age-class detail rows: the full (disturbance type, zone, option,
//! reserve status, age class) crosstab behind the compliance summary, with
//! operating-area and operability splits.
//!
//! Unlike the summary, the breakdown keeps the raw biodiversity option: an
//! `NA` bucket stays visible as `NA`.

use serde::Serialize;

use crate::age::age_class_label;
use crate::record::{LandType, Operability};
use crate::stats::{UnitStatistics, OUTSIDE_OPERATING_AREA};
use crate::summary::pct;

/// One detail row. Shares are fractions of 1; `oa_` figures cover only land
/// inside a named operating area.
#[derive(Debug, Clone, Serialize)]
pub struct AgeClassRow {
    pub disturbance_type: String,
    pub zone: String,
    /// Raw biodiversity option as aggregated, `NA` included.
    pub bio_option: String,
    pub reserve_status: String,
    pub age_class: u8,
    /// Display label for the age class, unset for out-of-range classes.
    pub label: Option<&'static str>,
    /// Forested area across every operating-area bucket.
    pub area_ha: f64,
    /// Fraction of the whole (disturbance type, zone, option) area.
    pub share_of_option: f64,
    pub corridor_area_ha: f64,
    pub oa_area_ha: f64,
    pub oa_share_of_option: f64,
    pub oa_operable_area_ha: f64,
    /// Operable fraction of the in-operating-area forested area; zero when
    /// nothing lies inside an operating area.
    pub oa_operable_share: f64,
    pub oa_corridor_area_ha: f64,
}

/// Walk a finalized unit tree into detail rows, ordered by (disturbance
/// type, zone, option, reserve status, age class).
pub fn age_class_breakdown(unit: &UnitStatistics) -> Vec<AgeClassRow> {
    let mut rows = Vec::new();
    for (ndt_key, ndt_node) in unit.tree().children() {
        let Some(ndt) = ndt_key.as_text() else { continue };
        for (zone_key, zone_node) in ndt_node.children() {
            let Some(zone) = zone_key.as_text() else { continue };
            for (bio_key, bio_node) in zone_node.children() {
                let Some(bio) = bio_key.as_text() else { continue };
                let option_area = bio_node.area;
                for (status_key, status_node) in bio_node.children() {
                    let Some(status) = status_key.as_text() else { continue };
                    for (age_key, age_node) in status_node.children() {
                        let Some(age_class) = age_key.as_age() else { continue };

                        let mut area = 0.0;
                        let mut corridor = 0.0;
                        let mut oa_area = 0.0;
                        let mut oa_operable = 0.0;
                        let mut oa_corridor = 0.0;
                        for (oa_key, oa_node) in age_node.children() {
                            let Some(oa) = oa_key.as_text() else { continue };
                            let forested = oa_node.child_text(LandType::Forested.as_str());
                            let forested_area = forested.map(|n| n.area).unwrap_or(0.0);
                            area += forested_area;
                            corridor += oa_node.corridor_area;
                            if oa != OUTSIDE_OPERATING_AREA {
                                oa_area += forested_area;
                                oa_corridor += oa_node.corridor_area;
                                oa_operable += forested
                                    .and_then(|n| n.child_text(Operability::Operable.as_str()))
                                    .map(|n| n.area)
                                    .unwrap_or(0.0);
                            }
                        }

                        rows.push(AgeClassRow {
                            disturbance_type: ndt.to_string(),
                            zone: zone.to_string(),
                            bio_option: bio.to_string(),
                            reserve_status: status.to_string(),
                            age_class,
                            label: age_class_label(age_class),
                            area_ha: area,
                            share_of_option: pct(area, option_area),
                            corridor_area_ha: corridor,
                            oa_area_ha: oa_area,
                            oa_share_of_option: pct(oa_area, option_area),
                            oa_operable_area_ha: oa_operable,
                            oa_operable_share: pct(oa_operable, oa_area),
                            oa_corridor_area_ha: oa_corridor,
                        });
                    }
                }
            }
        }
    }
    rows
}
