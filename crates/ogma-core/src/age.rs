//! Age-class breakpoints and seral-stage policy categories.
//!
//! Stand age in years maps onto a coarse age class (0–9) through a fixed
//! breakpoint table; age classes then map onto seral stages (EARLY / MID /
//! MATURE / OLD) by comparison against the per-combination mature and old
//! thresholds from the target table.

use crate::record::SeralStage;
use crate::targets::Target;

/// Standard age-class breakpoints in years. Adjacent classes share a
/// boundary value; the first matching interval wins.
pub const AGE_CLASS_BREAKS: [u32; 9] = [0, 20, 40, 60, 80, 100, 120, 140, 250];

/// Class labels for the intervals of [`AGE_CLASS_BREAKS`]. Class 0 is
/// reserved for age exactly 0 (freshly harvested).
pub const AGE_CLASS_LABELS: [u8; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];

/// Classify `age` against an ordered breakpoint list.
///
/// Interval `i` is the CLOSED range `[breaks[i-1], breaks[i]]`, so adjacent
/// intervals overlap at their shared boundary and a boundary age resolves to
/// the lower class (first match wins): age 20 is class 1, not 2. Age 0 is
/// always class 0 regardless of the table. An age above the last breakpoint
/// takes the last label. Returns `None` only when `age` falls below the
/// first breakpoint of a non-standard table.
pub fn class_for_breaks(age: u32, breaks: &[u32], labels: &[u8]) -> Option<u8> {
    if age == 0 {
        return Some(0);
    }
    for i in 1..breaks.len() {
        if breaks[i - 1] <= age && age <= breaks[i] {
            return Some(labels[i - 1]);
        }
    }
    match (breaks.last(), labels.last()) {
        (Some(&last_break), Some(&last_label)) if age > last_break => Some(last_label),
        _ => None,
    }
}

/// Classify `age` against the standard table. Total: the standard table
/// starts at 0, so every age resolves.
pub fn age_class_for(age: u32) -> u8 {
    class_for_breaks(age, &AGE_CLASS_BREAKS, &AGE_CLASS_LABELS).unwrap_or(0)
}

/// First age class whose stands exceed an age threshold in years: the class
/// containing `threshold_years + 1`. A mature threshold of 80 gives class 5
/// (ages 81–100 land in [80, 100]).
pub fn threshold_class(threshold_years: u32) -> u8 {
    age_class_for(threshold_years + 1)
}

/// Derive the seral stage of an age class given the (optional) mature and
/// old threshold classes for its combination.
///
/// Rules, first match wins:
/// - below class 3 → EARLY
/// - mature set, class below mature → MID
/// - mature unset, old set, class below old → MID
/// - both set, mature ≤ class < old → MATURE
/// - old set, class ≥ old → OLD
/// - otherwise no stage. With only a mature threshold no class ever rates
///   MATURE; preserved as observed upstream.
pub fn seral_stage(
    age_class: u8,
    mature_class: Option<u8>,
    old_class: Option<u8>,
) -> Option<SeralStage> {
    if age_class < 3 {
        return Some(SeralStage::Early);
    }
    match (mature_class, old_class) {
        (Some(mature), _) if age_class < mature => Some(SeralStage::Mid),
        (None, Some(old)) if age_class < old => Some(SeralStage::Mid),
        (Some(mature), Some(old)) if mature <= age_class && age_class < old => {
            Some(SeralStage::Mature)
        }
        (_, Some(old)) if age_class >= old => Some(SeralStage::Old),
        _ => None,
    }
}

/// Seral stage for an age class under a combination's target. Threshold
/// classes derive from the target's mature/old ages; a target without
/// thresholds rates only classes below 3 (EARLY).
pub fn seral_for_target(age_class: u8, target: &Target) -> Option<SeralStage> {
    seral_stage(
        age_class,
        target.mature.age.map(threshold_class),
        target.old.age.map(threshold_class),
    )
}

/// Report label for an age class. `None` outside 0–9.
pub fn age_class_label(age_class: u8) -> Option<&'static str> {
    match age_class {
        0 => Some("Harvested"),
        1 => Some("1 to 20"),
        2 => Some("21 to 40"),
        3 => Some("41 to 60"),
        4 => Some("61 to 80"),
        5 => Some("81 to 100"),
        6 => Some("101 to 120"),
        7 => Some("121 to 140"),
        8 => Some("141 to 250"),
        9 => Some("251 +"),
        _ => None,
    }
}
