//! Compliance summarization: walks a finalized unit tree and derives
//! per-(disturbance type, zone, biodiversity option) rows comparing reserved
//! mature+old forest against regulatory targets, unit-wide and per
//! operating area.
//!
//! Row keys use the EFFECTIVE biodiversity option (the sentinel `NA`
//! resolves to `HIGH`), so an `NA` bucket merges into the `HIGH` row when
//! both exist. A combination yields a row only when at least one target
//! percentage survives the policy overrides.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::overrides::PolicyOverrides;
use crate::record::{LandType, ReserveStatus, SeralStage};
use crate::stats::{UnitStatistics, OUTSIDE_OPERATING_AREA};
use crate::targets::{ResourcePlans, TargetTable};

/// Effective biodiversity option: the sentinel `NA` resolves to `HIGH`.
pub fn effective_option(raw_option: &str) -> &str {
    if raw_option == "NA" {
        "HIGH"
    } else {
        raw_option
    }
}

pub(crate) fn pct(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole
    } else {
        0.0
    }
}

/// Compliance standing of a figure against its target. Exactly at target
/// counts as deficit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Standing {
    Surplus,
    Deficit,
}

/// Everything the summarization consults besides the tree itself.
pub struct SummaryContext<'a> {
    pub targets: &'a TargetTable,
    pub plans: &'a ResourcePlans,
    pub overrides: &'a PolicyOverrides,
    /// Resource-area (TSA) name, drives suppression overrides.
    pub resource_area: &'a str,
}

/// One compliance row. Percentages are fractions of 1; areas are hectares.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub disturbance_type: String,
    pub zone: String,
    /// Effective biodiversity option (never `NA`).
    pub bio_option: String,
    /// Totaled area of the combination, every land type included.
    pub area_ha: f64,
    /// Forested area under OGMA reserve status.
    pub ogma_area_ha: f64,
    /// Corridor area across all reserve statuses.
    pub corridor_area_ha: f64,
    pub mature_old_area_ha: f64,
    pub mature_old_pct: f64,
    pub mature_old_target_pct: Option<f64>,
    /// Corridor area attributed into mature+old; unset when the override
    /// table does not attribute corridors for this unit.
    pub mature_old_corridor_ha: Option<f64>,
    pub old_area_ha: f64,
    pub old_pct: f64,
    pub old_target_pct: Option<f64>,
    pub old_corridor_area_ha: f64,
}

impl SummaryRow {
    fn new(
        disturbance_type: &str,
        zone: &str,
        bio_option: &str,
        mature_old_target_pct: Option<f64>,
        old_target_pct: Option<f64>,
        attributes_corridor: bool,
    ) -> Self {
        Self {
            disturbance_type: disturbance_type.to_string(),
            zone: zone.to_string(),
            bio_option: bio_option.to_string(),
            area_ha: 0.0,
            ogma_area_ha: 0.0,
            corridor_area_ha: 0.0,
            mature_old_area_ha: 0.0,
            mature_old_pct: 0.0,
            mature_old_target_pct,
            mature_old_corridor_ha: if attributes_corridor { Some(0.0) } else { None },
            old_area_ha: 0.0,
            old_pct: 0.0,
            old_target_pct,
            old_corridor_area_ha: 0.0,
        }
    }

    /// Fold one OGMA (reserve-status, age-class) figure into the row by its
    /// seral tag. Without any age threshold every reserved hectare counts as
    /// both mature+old and old: no minimum age means anything reserved
    /// counts. With a threshold in force, untyped and EARLY/MID area
    /// contributes nothing.
    fn add_reserved(&mut self, seral: Option<SeralStage>, gated: bool, area: f64, corridor: f64) {
        match seral {
            Some(SeralStage::Mature) => {
                self.mature_old_area_ha += area;
                self.add_mature_old_corridor(corridor);
            }
            Some(SeralStage::Old) => {
                self.mature_old_area_ha += area;
                self.old_area_ha += area;
                self.old_corridor_area_ha += corridor;
                self.add_mature_old_corridor(corridor);
            }
            _ if !gated => {
                self.mature_old_area_ha += area;
                self.old_area_ha += area;
                self.old_corridor_area_ha += corridor;
                self.add_mature_old_corridor(corridor);
            }
            _ => {}
        }
    }

    fn add_mature_old_corridor(&mut self, corridor: f64) {
        if let Some(attributed) = &mut self.mature_old_corridor_ha {
            *attributed += corridor;
        }
    }

    /// Merge another row for the same effective key (the `NA` → `HIGH`
    /// case). Targets are kept from `self`; both rows resolved the same
    /// effective option, so they match.
    fn merge(&mut self, other: &SummaryRow) {
        self.area_ha += other.area_ha;
        self.ogma_area_ha += other.ogma_area_ha;
        self.corridor_area_ha += other.corridor_area_ha;
        self.mature_old_area_ha += other.mature_old_area_ha;
        self.old_area_ha += other.old_area_ha;
        self.old_corridor_area_ha += other.old_corridor_area_ha;
        self.mature_old_corridor_ha =
            match (self.mature_old_corridor_ha, other.mature_old_corridor_ha) {
                (Some(a), Some(b)) => Some(a + b),
                _ => None,
            };
    }

    /// Compute percentages. Zero area is a degenerate-but-expected case and
    /// yields zero, never an error.
    fn finish(&mut self) {
        self.mature_old_pct = pct(self.mature_old_area_ha, self.area_ha);
        self.old_pct = pct(self.old_area_ha, self.area_ha);
    }

    pub fn mature_old_target_ha(&self) -> Option<f64> {
        self.mature_old_target_pct.map(|t| self.area_ha * t / 100.0)
    }

    /// Achieved minus target, in hectares.
    pub fn mature_old_surplus_ha(&self) -> Option<f64> {
        self.mature_old_target_ha()
            .map(|target| self.mature_old_area_ha - target)
    }

    pub fn mature_old_standing(&self) -> Option<Standing> {
        self.mature_old_target_ha().map(|target| {
            if self.mature_old_area_ha <= target {
                Standing::Deficit
            } else {
                Standing::Surplus
            }
        })
    }

    pub fn old_target_ha(&self) -> Option<f64> {
        self.old_target_pct.map(|t| self.area_ha * t / 100.0)
    }

    pub fn old_surplus_ha(&self) -> Option<f64> {
        self.old_target_ha().map(|target| self.old_area_ha - target)
    }

    pub fn old_standing(&self) -> Option<Standing> {
        self.old_target_ha().map(|target| {
            if self.old_area_ha <= target {
                Standing::Deficit
            } else {
                Standing::Surplus
            }
        })
    }
}

/// Mature/old age thresholds for one (disturbance type, zone), as reported
/// alongside the summary rows.
#[derive(Debug, Clone, Serialize)]
pub struct AgeDefinition {
    pub disturbance_type: String,
    pub zone: String,
    pub mature_age: Option<u32>,
    pub old_age: Option<u32>,
}

/// Summarization output for one landscape unit.
#[derive(Debug, Clone, Serialize)]
pub struct UnitSummary {
    pub unit_name: String,
    pub unit_number: String,
    /// Unit-wide rows in (disturbance type, zone, option) order.
    pub rows: Vec<SummaryRow>,
    /// Per-operating-area rows; the outside bucket never appears here.
    pub operating_areas: BTreeMap<String, Vec<SummaryRow>>,
    /// Age thresholds per (disturbance type, zone) with a MATURE- or
    /// OLD-tagged reserved row; first option in sorted order wins.
    pub age_definitions: Vec<AgeDefinition>,
}

type RowKey = (String, String, String);

fn merge_row(rows: &mut BTreeMap<RowKey, SummaryRow>, key: RowKey, row: SummaryRow) {
    match rows.entry(key) {
        Entry::Occupied(mut present) => present.get_mut().merge(&row),
        Entry::Vacant(slot) => {
            slot.insert(row);
        }
    }
}

/// Summarize one finalized unit. The tree must have run its `total()` pass.
/// Fails on an unknown resource plan or a data combination missing from the
/// target table; both indicate upstream data/config mismatches.
pub fn summarize_unit(unit: &UnitStatistics, ctx: &SummaryContext) -> Result<UnitSummary> {
    let plan = ctx.plans.short_name(&unit.resource_plan)?;
    let attributes_corridor = ctx
        .overrides
        .attributes_mature_old_corridor(ctx.resource_area, &unit.name);

    let mut rows: BTreeMap<RowKey, SummaryRow> = BTreeMap::new();
    let mut oa_rows: BTreeMap<String, BTreeMap<RowKey, SummaryRow>> = BTreeMap::new();
    let mut age_definitions: Vec<AgeDefinition> = Vec::new();

    for (ndt_key, ndt_node) in unit.tree().children() {
        let Some(ndt) = ndt_key.as_text() else { continue };
        for (zone_key, zone_node) in ndt_node.children() {
            let Some(zone) = zone_key.as_text() else { continue };
            for (bio_key, bio_node) in zone_node.children() {
                let Some(bio) = bio_key.as_text() else { continue };
                let bio_use = effective_option(bio);
                let target = ctx.targets.lookup(plan, ndt, zone, bio_use)?;

                let mature_old_target = ctx.overrides.mature_old_target(
                    ctx.resource_area,
                    &unit.name,
                    target.mature.target_pct,
                );
                let old_target =
                    ctx.overrides
                        .old_target(&unit.number, bio, target.old.target_pct);
                let has_targets = mature_old_target.is_some() || old_target.is_some();
                let gated = target.has_age_threshold();

                let mut row = SummaryRow::new(
                    ndt,
                    zone,
                    bio_use,
                    mature_old_target,
                    old_target,
                    attributes_corridor,
                );
                row.area_ha = bio_node.area;

                for (status_key, status_node) in bio_node.children() {
                    let is_reserved =
                        status_key.as_text() == Some(ReserveStatus::Ogma.as_str());
                    for (_age_key, age_node) in status_node.children() {
                        let seral = age_node.seral;
                        let mut combo_area = 0.0;
                        let mut combo_corridor = 0.0;

                        for (oa_key, oa_node) in age_node.children() {
                            let Some(oa) = oa_key.as_text() else { continue };
                            let forested = oa_node
                                .child_text(LandType::Forested.as_str())
                                .map(|n| n.area)
                                .unwrap_or(0.0);
                            combo_area += forested;
                            combo_corridor += oa_node.corridor_area;

                            if has_targets && oa != OUTSIDE_OPERATING_AREA {
                                let oa_row = oa_rows
                                    .entry(oa.to_string())
                                    .or_default()
                                    .entry((
                                        ndt.to_string(),
                                        zone.to_string(),
                                        bio_use.to_string(),
                                    ))
                                    .or_insert_with(|| {
                                        SummaryRow::new(
                                            ndt,
                                            zone,
                                            bio_use,
                                            mature_old_target,
                                            old_target,
                                            attributes_corridor,
                                        )
                                    });
                                oa_row.area_ha += forested;
                                oa_row.corridor_area_ha += oa_node.corridor_area;
                                if is_reserved {
                                    oa_row.ogma_area_ha += forested;
                                    oa_row.add_reserved(
                                        seral,
                                        gated,
                                        forested,
                                        oa_node.corridor_area,
                                    );
                                }
                            }
                        }

                        row.corridor_area_ha += combo_corridor;
                        if is_reserved {
                            row.ogma_area_ha += combo_area;
                            row.add_reserved(seral, gated, combo_area, combo_corridor);

                            if matches!(seral, Some(SeralStage::Mature | SeralStage::Old))
                                && !age_definitions
                                    .iter()
                                    .any(|d| d.disturbance_type == ndt && d.zone == zone)
                            {
                                age_definitions.push(AgeDefinition {
                                    disturbance_type: ndt.to_string(),
                                    zone: zone.to_string(),
                                    mature_age: target.mature.age,
                                    old_age: target.old.age,
                                });
                            }
                        }
                    }
                }

                if has_targets {
                    merge_row(
                        &mut rows,
                        (ndt.to_string(), zone.to_string(), bio_use.to_string()),
                        row,
                    );
                }
            }
        }
    }

    let mut rows: Vec<SummaryRow> = rows.into_values().collect();
    for row in &mut rows {
        row.finish();
    }
    let operating_areas = oa_rows
        .into_iter()
        .map(|(oa, keyed)| {
            let mut list: Vec<SummaryRow> = keyed.into_values().collect();
            for row in &mut list {
                row.finish();
            }
            (oa, list)
        })
        .collect();

    Ok(UnitSummary {
        unit_name: unit.name.clone(),
        unit_number: unit.number.clone(),
        rows,
        operating_areas,
        age_definitions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ClassifiedRecord, Operability};
    use crate::targets::TargetRow;
    use approx::assert_relative_eq;

    const PLAN_FULL: &str = "Okanagan Shuswap Land and Resource Management Plan";
    const PLAN_SHORT: &str = "OKANAGAN SHUSWAP";

    fn record(
        bio: &str,
        status: ReserveStatus,
        age_class: u8,
        seral: Option<SeralStage>,
        operating_area: Option<&str>,
        area_ha: f64,
    ) -> ClassifiedRecord {
        ClassifiedRecord {
            unit_name: "Aspen".to_string(),
            unit_number: "A1".to_string(),
            resource_plan: PLAN_FULL.to_string(),
            disturbance_type: "N1".to_string(),
            zone: "Z1".to_string(),
            bio_option: bio.to_string(),
            reserve_status: status,
            age_class,
            seral,
            land_type: LandType::Forested,
            operability: Operability::Operable,
            operating_area: operating_area.map(str::to_string),
            area_ha,
            corridor: false,
        }
    }

    fn target_row(
        bio: &str,
        mature_age: Option<u32>,
        old_age: Option<u32>,
        mature_pct: Option<f64>,
        old_pct: Option<f64>,
    ) -> TargetRow {
        TargetRow {
            plan: PLAN_SHORT.to_string(),
            disturbance: "N1".to_string(),
            zone: "Z1".to_string(),
            option: bio.to_string(),
            mature_age,
            old_age,
            mature_target_pct: mature_pct,
            old_target_pct: old_pct,
        }
    }

    fn unit_with(records: &[ClassifiedRecord]) -> UnitStatistics {
        let mut unit = UnitStatistics::new("Aspen", "A1", PLAN_FULL);
        for rec in records {
            unit.insert(rec);
        }
        unit.total();
        unit
    }

    fn summarize(
        unit: &UnitStatistics,
        table: &TargetTable,
        overrides: &PolicyOverrides,
        resource_area: &str,
    ) -> Result<UnitSummary> {
        let plans = ResourcePlans::standard();
        let ctx = SummaryContext {
            targets: table,
            plans: &plans,
            overrides,
            resource_area,
        };
        summarize_unit(unit, &ctx)
    }

    #[test]
    fn end_to_end_two_record_scenario() {
        let unit = unit_with(&[
            record("HIGH", ReserveStatus::Ogma, 7, Some(SeralStage::Old), Some("OA1"), 10.0),
            {
                let mut r = record("HIGH", ReserveStatus::NonOgma, 2, Some(SeralStage::Early), Some("OA1"), 5.0);
                r.operability = Operability::Inoperable;
                r
            },
        ]);
        let table = TargetTable::from_rows([target_row(
            "HIGH",
            Some(80),
            Some(140),
            Some(30.0),
            Some(15.0),
        )]);
        let summary = summarize(&unit, &table, &PolicyOverrides::none(), "Okanagan").unwrap();

        assert_eq!(summary.rows.len(), 1);
        let row = &summary.rows[0];
        assert_relative_eq!(row.area_ha, 15.0);
        assert_relative_eq!(row.ogma_area_ha, 10.0);
        assert_relative_eq!(row.old_area_ha, 10.0);
        assert_relative_eq!(row.old_pct, 10.0 / 15.0);
        assert_eq!(row.old_standing(), Some(Standing::Surplus), "66.7% clears a 15% target");
        assert_eq!(row.mature_old_standing(), Some(Standing::Surplus));
        assert_eq!(summary.age_definitions.len(), 1);
        assert_eq!(summary.age_definitions[0].mature_age, Some(80));
    }

    #[test]
    fn na_option_resolves_against_high_entry() {
        let unit = unit_with(&[record(
            "NA",
            ReserveStatus::Ogma,
            7,
            Some(SeralStage::Old),
            Some("OA1"),
            8.0,
        )]);
        let table = TargetTable::from_rows([target_row(
            "HIGH",
            Some(80),
            Some(140),
            Some(30.0),
            Some(15.0),
        )]);
        let summary = summarize(&unit, &table, &PolicyOverrides::none(), "Okanagan").unwrap();
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].bio_option, "HIGH");
        assert_relative_eq!(summary.rows[0].old_area_ha, 8.0);
    }

    #[test]
    fn na_without_high_entry_fails_lookup() {
        let unit = unit_with(&[record(
            "NA",
            ReserveStatus::Ogma,
            7,
            Some(SeralStage::Old),
            Some("OA1"),
            8.0,
        )]);
        let table = TargetTable::from_rows([target_row(
            "LOW",
            Some(80),
            Some(140),
            Some(30.0),
            Some(15.0),
        )]);
        let err = summarize(&unit, &table, &PolicyOverrides::none(), "Okanagan").unwrap_err();
        assert!(matches!(err, crate::error::Error::MissingTarget { .. }));
    }

    #[test]
    fn na_bucket_merges_into_high_row() {
        let unit = unit_with(&[
            record("HIGH", ReserveStatus::Ogma, 7, Some(SeralStage::Old), Some("OA1"), 10.0),
            record("NA", ReserveStatus::Ogma, 7, Some(SeralStage::Old), Some("OA1"), 5.0),
        ]);
        let table = TargetTable::from_rows([target_row(
            "HIGH",
            Some(80),
            Some(140),
            Some(30.0),
            Some(15.0),
        )]);
        let summary = summarize(&unit, &table, &PolicyOverrides::none(), "Okanagan").unwrap();

        assert_eq!(summary.rows.len(), 1, "NA folds into the HIGH row");
        let row = &summary.rows[0];
        assert_relative_eq!(row.area_ha, 15.0);
        assert_relative_eq!(row.old_area_ha, 15.0);
        assert_relative_eq!(row.old_pct, 1.0);
    }

    #[test]
    fn exactly_at_target_is_deficit() {
        let unit = unit_with(&[
            record("HIGH", ReserveStatus::Ogma, 5, Some(SeralStage::Mature), Some("OA1"), 30.0),
            record("HIGH", ReserveStatus::NonOgma, 2, Some(SeralStage::Early), Some("OA1"), 70.0),
        ]);
        let table =
            TargetTable::from_rows([target_row("HIGH", Some(80), None, Some(30.0), None)]);
        let summary = summarize(&unit, &table, &PolicyOverrides::none(), "Okanagan").unwrap();

        let row = &summary.rows[0];
        assert_relative_eq!(row.area_ha, 100.0);
        assert_relative_eq!(row.mature_old_area_ha, 30.0);
        assert_eq!(
            row.mature_old_standing(),
            Some(Standing::Deficit),
            "30% achieved against a 30% target is at target, and at target is deficit"
        );
        assert_relative_eq!(row.mature_old_surplus_ha().unwrap(), 0.0);
    }

    #[test]
    fn zero_area_combination_reports_zero_percentages() {
        let unit = unit_with(&[record(
            "HIGH",
            ReserveStatus::Ogma,
            7,
            Some(SeralStage::Old),
            Some("OA1"),
            0.0,
        )]);
        let table = TargetTable::from_rows([target_row(
            "HIGH",
            Some(80),
            Some(140),
            Some(30.0),
            Some(15.0),
        )]);
        let summary = summarize(&unit, &table, &PolicyOverrides::none(), "Okanagan").unwrap();
        let row = &summary.rows[0];
        assert_eq!(row.mature_old_pct, 0.0);
        assert_eq!(row.old_pct, 0.0);
    }

    #[test]
    fn no_age_threshold_counts_every_reserved_hectare() {
        let unit = unit_with(&[
            record("HIGH", ReserveStatus::Ogma, 2, Some(SeralStage::Early), Some("OA1"), 5.0),
            record("HIGH", ReserveStatus::Ogma, 5, None, Some("OA1"), 5.0),
            record("HIGH", ReserveStatus::NonOgma, 5, None, Some("OA1"), 10.0),
        ]);
        let table = TargetTable::from_rows([target_row("HIGH", None, None, Some(30.0), Some(15.0))]);
        let summary = summarize(&unit, &table, &PolicyOverrides::none(), "Okanagan").unwrap();

        let row = &summary.rows[0];
        assert_relative_eq!(row.ogma_area_ha, 10.0);
        assert_relative_eq!(row.mature_old_area_ha, 10.0, epsilon = 1e-12);
        assert_relative_eq!(row.old_area_ha, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn age_threshold_gates_out_untyped_and_early_area() {
        let unit = unit_with(&[
            record("HIGH", ReserveStatus::Ogma, 2, Some(SeralStage::Early), Some("OA1"), 5.0),
            record("HIGH", ReserveStatus::Ogma, 4, Some(SeralStage::Mid), Some("OA1"), 5.0),
            record("HIGH", ReserveStatus::Ogma, 5, None, Some("OA1"), 5.0),
            record("HIGH", ReserveStatus::Ogma, 7, Some(SeralStage::Old), Some("OA1"), 5.0),
        ]);
        let table = TargetTable::from_rows([target_row(
            "HIGH",
            Some(80),
            Some(140),
            Some(30.0),
            Some(15.0),
        )]);
        let summary = summarize(&unit, &table, &PolicyOverrides::none(), "Okanagan").unwrap();

        let row = &summary.rows[0];
        assert_relative_eq!(row.ogma_area_ha, 20.0);
        assert_relative_eq!(row.mature_old_area_ha, 5.0, epsilon = 1e-12);
        assert_relative_eq!(row.old_area_ha, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn per_operating_area_rows_scope_to_their_area_and_skip_outside() {
        let unit = unit_with(&[
            record("HIGH", ReserveStatus::Ogma, 7, Some(SeralStage::Old), Some("OA1"), 10.0),
            record("HIGH", ReserveStatus::Ogma, 7, Some(SeralStage::Old), Some("OA2"), 20.0),
            record("HIGH", ReserveStatus::Ogma, 7, Some(SeralStage::Old), None, 40.0),
        ]);
        let table = TargetTable::from_rows([target_row(
            "HIGH",
            Some(80),
            Some(140),
            Some(30.0),
            Some(15.0),
        )]);
        let summary = summarize(&unit, &table, &PolicyOverrides::none(), "Okanagan").unwrap();

        assert_relative_eq!(summary.rows[0].old_area_ha, 70.0, epsilon = 1e-12);

        assert_eq!(summary.operating_areas.len(), 2);
        assert!(!summary.operating_areas.contains_key(OUTSIDE_OPERATING_AREA));
        let oa1 = &summary.operating_areas["OA1"][0];
        assert_relative_eq!(oa1.area_ha, 10.0);
        assert_relative_eq!(oa1.old_area_ha, 10.0);
        assert_relative_eq!(oa1.old_pct, 1.0);
        let oa2 = &summary.operating_areas["OA2"][0];
        assert_relative_eq!(oa2.old_area_ha, 20.0);
    }

    #[test]
    fn combination_without_targets_yields_no_row_but_keeps_age_definitions() {
        let unit = unit_with(&[record(
            "HIGH",
            ReserveStatus::Ogma,
            5,
            Some(SeralStage::Mature),
            Some("OA1"),
            10.0,
        )]);
        // Thresholds present, both target percentages unset.
        let table = TargetTable::from_rows([target_row("HIGH", Some(80), Some(140), None, None)]);
        let summary = summarize(&unit, &table, &PolicyOverrides::none(), "Okanagan").unwrap();

        assert!(summary.rows.is_empty());
        assert!(summary.operating_areas.is_empty());
        assert_eq!(summary.age_definitions.len(), 1);
        assert_eq!(summary.age_definitions[0].old_age, Some(140));
    }

    #[test]
    fn golden_suppression_spares_only_the_exempt_unit() {
        let records = [record(
            "HIGH",
            ReserveStatus::Ogma,
            5,
            Some(SeralStage::Mature),
            Some("OA1"),
            10.0,
        )];
        let table =
            TargetTable::from_rows([target_row("HIGH", Some(80), None, Some(30.0), None)]);

        // Aspen under Golden: mature+old target suppressed, old unset → no row.
        let unit = unit_with(&records);
        let summary = summarize(&unit, &table, &PolicyOverrides::standard(), "Golden").unwrap();
        assert!(summary.rows.is_empty());

        // Moose under Golden keeps the target and attributes corridors.
        let mut moose_records = records.clone();
        for rec in &mut moose_records {
            rec.unit_name = "Moose".to_string();
            rec.corridor = true;
        }
        let mut moose = UnitStatistics::new("Moose", "A1", PLAN_FULL);
        for rec in &moose_records {
            moose.insert(rec);
        }
        moose.total();
        let summary = summarize(&moose, &table, &PolicyOverrides::standard(), "Golden").unwrap();
        let row = &summary.rows[0];
        assert_eq!(row.mature_old_target_pct, Some(30.0));
        assert_relative_eq!(row.mature_old_corridor_ha.unwrap(), 10.0);
    }

    #[test]
    fn corridor_area_counts_all_statuses_but_attribution_needs_the_override() {
        let mut reserved = record("HIGH", ReserveStatus::Ogma, 7, Some(SeralStage::Old), Some("OA1"), 10.0);
        reserved.corridor = true;
        let mut unreserved = record("HIGH", ReserveStatus::NonOgma, 2, Some(SeralStage::Early), Some("OA1"), 4.0);
        unreserved.corridor = true;
        let unit = unit_with(&[reserved, unreserved]);
        let table = TargetTable::from_rows([target_row(
            "HIGH",
            Some(80),
            Some(140),
            Some(30.0),
            Some(15.0),
        )]);
        let summary = summarize(&unit, &table, &PolicyOverrides::none(), "Okanagan").unwrap();

        let row = &summary.rows[0];
        assert_relative_eq!(row.corridor_area_ha, 14.0, epsilon = 1e-12);
        assert_relative_eq!(row.old_corridor_area_ha, 10.0);
        assert_eq!(row.mature_old_corridor_ha, None, "no attribution without the override");
    }

    #[test]
    fn r3_low_old_target_is_tripled() {
        let mut records = vec![record(
            "LOW",
            ReserveStatus::Ogma,
            7,
            Some(SeralStage::Old),
            Some("OA1"),
            10.0,
        )];
        for rec in &mut records {
            rec.unit_number = "R3".to_string();
        }
        let mut unit = UnitStatistics::new("Aspen", "R3", PLAN_FULL);
        for rec in &records {
            unit.insert(rec);
        }
        unit.total();

        let table =
            TargetTable::from_rows([target_row("LOW", Some(80), Some(140), None, Some(9.0))]);
        let summary = summarize(&unit, &table, &PolicyOverrides::standard(), "Okanagan").unwrap();
        assert_eq!(summary.rows[0].old_target_pct, Some(27.0));
    }

    #[test]
    fn unknown_resource_plan_is_an_error() {
        let mut unit = UnitStatistics::new("Aspen", "A1", "Nameless Plan");
        unit.insert(&record("HIGH", ReserveStatus::Ogma, 7, None, None, 1.0));
        unit.total();
        let table = TargetTable::default();
        let err = summarize(&unit, &table, &PolicyOverrides::none(), "Okanagan").unwrap_err();
        assert!(matches!(err, crate::error::Error::UnknownResourcePlan(_)));
    }
}
