//! Regulatory retention targets, keyed by
//! (resource plan, disturbance type, zone, biodiversity option).
//!
//! The table is built once per run from a delimited resource and never
//! mutated. Lookup is strict: a missing composite key is an error, not an
//! empty target. An entry whose thresholds are all unset is a legitimate
//! "no applicable target" answer and must stay distinguishable from a key
//! that was never loaded.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

// ── Table shape ──────────────────────────────────────────────────────────────

/// One (age threshold, target percentage) pair. Either side may be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AgeTarget {
    /// Minimum stand age in years.
    pub age: Option<u32>,
    /// Retention target as a percentage of combination area.
    pub target_pct: Option<f64>,
}

/// Targets for one combination: a mature pair and an old pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Target {
    pub mature: AgeTarget,
    pub old: AgeTarget,
}

impl Target {
    /// Whether any age threshold applies. Combinations without one count all
    /// reserved area as mature+old during summarization.
    pub fn has_age_threshold(&self) -> bool {
        self.mature.age.is_some() || self.old.age.is_some()
    }

    /// True when all four fields are unset.
    pub fn is_empty(&self) -> bool {
        self.mature == AgeTarget::default() && self.old == AgeTarget::default()
    }
}

/// Composite lookup key. Disturbance type and zone are upper-cased on
/// construction; plan and option are kept as provided.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetKey {
    pub plan: String,
    pub disturbance: String,
    pub zone: String,
    pub option: String,
}

impl TargetKey {
    pub fn new(plan: &str, disturbance: &str, zone: &str, option: &str) -> Self {
        Self {
            plan: plan.to_string(),
            disturbance: disturbance.to_uppercase(),
            zone: zone.to_uppercase(),
            option: option.to_string(),
        }
    }
}

/// One parsed row of the target resource.
#[derive(Debug, Clone)]
pub struct TargetRow {
    pub plan: String,
    pub disturbance: String,
    pub zone: String,
    pub option: String,
    pub mature_age: Option<u32>,
    pub old_age: Option<u32>,
    pub mature_target_pct: Option<f64>,
    pub old_target_pct: Option<f64>,
}

impl TargetRow {
    pub fn key(&self) -> TargetKey {
        TargetKey::new(&self.plan, &self.disturbance, &self.zone, &self.option)
    }
}

// ── Delimited parsing ────────────────────────────────────────────────────────

const COL_PLAN: &str = "LAND_RESOURCE_PLAN";
const COL_DISTURBANCE: &str = "NATURAL_DISTURBANCE";
const COL_ZONE: &str = "MAP_LABEL";
const COL_OPTION: &str = "BIODIVERSITY_EMPHASIS_OPTION";
const COL_MATURE_AGE: &str = "MATURE";
const COL_OLD_AGE: &str = "OLD";
const COL_MATURE_TARGET: &str = "TARGET_MATURE_OLD";
const COL_OLD_TARGET: &str = "TARGET_OLD";

/// Strip one layer of surrounding double quotes and outer whitespace.
/// Cell values never contain the delimiter.
fn clean(cell: &str) -> &str {
    let trimmed = cell.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
}

fn parse_u32(cell: &str, line: usize, column: &str) -> Result<Option<u32>> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse().map(Some).map_err(|_| Error::MalformedTargetRow {
        line,
        reason: format!("column {column}: expected a whole number of years, got '{cell}'"),
    })
}

fn parse_f64(cell: &str, line: usize, column: &str) -> Result<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse().map(Some).map_err(|_| Error::MalformedTargetRow {
        line,
        reason: format!("column {column}: expected a percentage, got '{cell}'"),
    })
}

/// Parse the delimited target resource (comma-separated, one header line,
/// columns located by name) into rows, preserving file order and duplicates.
/// Blank numeric cells mean "unset", never zero.
pub fn parse_rows(text: &str) -> Result<Vec<TargetRow>> {
    let mut lines = text.lines().enumerate();
    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break line,
            None => {
                return Err(Error::MalformedTargetRow {
                    line: 0,
                    reason: "empty target resource".to_string(),
                })
            }
        }
    };

    let columns: Vec<&str> = header.split(',').map(clean).collect();
    let col = |name: &'static str| -> Result<usize> {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or(Error::MissingTargetColumn(name))
    };
    let i_plan = col(COL_PLAN)?;
    let i_disturbance = col(COL_DISTURBANCE)?;
    let i_zone = col(COL_ZONE)?;
    let i_option = col(COL_OPTION)?;
    let i_mature_age = col(COL_MATURE_AGE)?;
    let i_old_age = col(COL_OLD_AGE)?;
    let i_mature_target = col(COL_MATURE_TARGET)?;
    let i_old_target = col(COL_OLD_TARGET)?;

    let mut rows = Vec::new();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let cells: Vec<&str> = line.split(',').map(clean).collect();
        if cells.len() != columns.len() {
            return Err(Error::MalformedTargetRow {
                line: line_no,
                reason: format!("expected {} cells, got {}", columns.len(), cells.len()),
            });
        }
        rows.push(TargetRow {
            plan: cells[i_plan].to_string(),
            disturbance: cells[i_disturbance].to_string(),
            zone: cells[i_zone].to_string(),
            option: cells[i_option].to_string(),
            mature_age: parse_u32(cells[i_mature_age], line_no, COL_MATURE_AGE)?,
            old_age: parse_u32(cells[i_old_age], line_no, COL_OLD_AGE)?,
            mature_target_pct: parse_f64(cells[i_mature_target], line_no, COL_MATURE_TARGET)?,
            old_target_pct: parse_f64(cells[i_old_target], line_no, COL_OLD_TARGET)?,
        });
    }
    Ok(rows)
}

// ── The table ────────────────────────────────────────────────────────────────

/// Immutable target lookup.
#[derive(Debug, Clone, Default)]
pub struct TargetTable {
    entries: BTreeMap<TargetKey, Target>,
}

impl TargetTable {
    /// Build from rows. Duplicate composite keys: last row wins.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = TargetRow>,
    {
        let mut entries = BTreeMap::new();
        for row in rows {
            entries.insert(
                row.key(),
                Target {
                    mature: AgeTarget {
                        age: row.mature_age,
                        target_pct: row.mature_target_pct,
                    },
                    old: AgeTarget {
                        age: row.old_age,
                        target_pct: row.old_target_pct,
                    },
                },
            );
        }
        Self { entries }
    }

    /// Parse a delimited target resource. See [`parse_rows`].
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self::from_rows(parse_rows(text)?))
    }

    pub fn get(&self, plan: &str, disturbance: &str, zone: &str, option: &str) -> Option<&Target> {
        self.entries
            .get(&TargetKey::new(plan, disturbance, zone, option))
    }

    /// Strict lookup. Callers substitute "HIGH" for the sentinel "NA" option
    /// before calling; no fallback happens here.
    pub fn lookup(
        &self,
        plan: &str,
        disturbance: &str,
        zone: &str,
        option: &str,
    ) -> Result<&Target> {
        self.get(plan, disturbance, zone, option)
            .ok_or_else(|| Error::MissingTarget {
                plan: plan.to_string(),
                disturbance: disturbance.to_string(),
                zone: zone.to_string(),
                option: option.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&TargetKey, &Target)> {
        self.entries.iter()
    }
}

// ── Resource-plan names ──────────────────────────────────────────────────────

/// Maps full land-resource-plan names (as carried on records) to the short
/// names used as target-table keys.
#[derive(Debug, Clone, Default)]
pub struct ResourcePlans {
    map: BTreeMap<String, String>,
}

impl ResourcePlans {
    /// The standard plan set.
    pub fn standard() -> Self {
        let mut plans = Self::default();
        plans.insert(
            "Okanagan Shuswap Land and Resource Management Plan",
            "OKANAGAN SHUSWAP",
        );
        plans.insert("Revelstoke Higher Level Plan Order", "REVELSTOKE");
        plans.insert(
            "Kootenay Boundary Higher Level Plan Order",
            "KOOTENAY BOUNDARY",
        );
        plans
    }

    pub fn insert(&mut self, full_name: &str, short_name: &str) {
        self.map.insert(full_name.to_string(), short_name.to_string());
    }

    pub fn short_name(&self, full_name: &str) -> Result<&str> {
        self.map
            .get(full_name)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownResourcePlan(full_name.to_string()))
    }

    /// Known short names, in full-name order.
    pub fn short_names(&self) -> impl Iterator<Item = &str> {
        self.map.values().map(String::as_str)
    }
}
