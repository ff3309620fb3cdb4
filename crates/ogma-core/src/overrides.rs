//! Policy overrides consulted by summarization.
//!
//! Named exceptions live here as data, not as branches in the engine: a
//! resource area can suppress the mature+old target for all but an exempt
//! set of units (corridor attribution into mature+old follows the same
//! rule), and specific (unit number, biodiversity option) pairs can scale
//! the old target.

use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
pub struct PolicyOverrides {
    /// Resource area → unit names exempt from mature+old suppression.
    mature_old_suppression: BTreeMap<String, BTreeSet<String>>,
    /// (unit number, upper-cased option) → old-target factor.
    old_target_multipliers: BTreeMap<(String, String), f64>,
}

impl PolicyOverrides {
    /// No overrides: every target passes through, corridors never attribute
    /// into mature+old.
    pub fn none() -> Self {
        Self::default()
    }

    /// The standing policy set: the Golden resource area suppresses the
    /// mature+old target everywhere except the Moose unit, and unit number
    /// R3 triples the LOW-option old target.
    pub fn standard() -> Self {
        let mut overrides = Self::default();
        overrides.suppress_mature_old("Golden", &["Moose"]);
        overrides.multiply_old_target("R3", "LOW", 3.0);
        overrides
    }

    /// Suppress the mature+old target across `resource_area`, keeping it for
    /// the named exempt units.
    pub fn suppress_mature_old(&mut self, resource_area: &str, exempt_units: &[&str]) {
        self.mature_old_suppression.insert(
            resource_area.to_string(),
            exempt_units.iter().map(|u| u.to_string()).collect(),
        );
    }

    /// Scale the old target for one (unit number, biodiversity option) pair.
    pub fn multiply_old_target(&mut self, unit_number: &str, option: &str, factor: f64) {
        self.old_target_multipliers
            .insert((unit_number.to_string(), option.to_uppercase()), factor);
    }

    /// Mature+old target percentage after suppression.
    pub fn mature_old_target(
        &self,
        resource_area: &str,
        unit_name: &str,
        base: Option<f64>,
    ) -> Option<f64> {
        match self.mature_old_suppression.get(resource_area) {
            Some(exempt) if !exempt.contains(unit_name) => None,
            _ => base,
        }
    }

    /// Whether corridor area attributes into the mature+old figure for this
    /// unit. True only for the exempt units of a suppressing resource area.
    pub fn attributes_mature_old_corridor(&self, resource_area: &str, unit_name: &str) -> bool {
        self.mature_old_suppression
            .get(resource_area)
            .map_or(false, |exempt| exempt.contains(unit_name))
    }

    /// Old target percentage after multipliers. Scaled values round to a
    /// whole percentage.
    pub fn old_target(&self, unit_number: &str, option: &str, base: Option<f64>) -> Option<f64> {
        let base = base?;
        let key = (unit_number.to_string(), option.to_uppercase());
        match self.old_target_multipliers.get(&key) {
            Some(factor) => Some((base * factor).round()),
            None => Some(base),
        }
    }
}
