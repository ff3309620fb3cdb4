//! Per-landscape-unit aggregation and the run-scoped inventory.
//!
//! One [`LandscapeInventory`] is built per run, fed every classified record,
//! then finalized exactly once: parks attach to their parent units and every
//! tree runs its [`total`](tree::Node::total) pass. Summarization reads only
//! finalized inventories.

pub mod tree;

pub use tree::{Key, Level, Node, HIERARCHY, OUTSIDE_OPERATING_AREA};

use std::collections::BTreeMap;

use crate::record::{ClassifiedRecord, LandType};

/// Statistics for one landscape unit. Parks use the same shape, nested under
/// their parent unit.
#[derive(Debug, Clone)]
pub struct UnitStatistics {
    /// Landscape unit name (park name for park sub-records).
    pub name: String,
    /// Landscape unit number; park numbers keep their trailing `P`.
    pub number: String,
    /// Full resource-plan name, as carried on the unit's records.
    pub resource_plan: String,
    root: Node,
    park: Option<Box<UnitStatistics>>,
}

impl UnitStatistics {
    pub fn new(name: &str, number: &str, resource_plan: &str) -> Self {
        Self {
            name: name.to_string(),
            number: number.to_string(),
            resource_plan: resource_plan.to_string(),
            root: Node::default(),
            park: None,
        }
    }

    /// Accumulate one record. Non-productive land is not tracked; the tree
    /// carries forested and harvested area only.
    pub fn insert(&mut self, record: &ClassifiedRecord) {
        debug_assert!(
            record.age_class <= 9,
            "age class {} outside the classifier contract",
            record.age_class
        );
        if record.land_type == LandType::NonProductive {
            return;
        }
        self.root.insert(record);
    }

    /// Run the bottom-up area pass over this unit (and its park, if any).
    /// Returns the unit total.
    pub fn total(&mut self) -> f64 {
        if let Some(park) = &mut self.park {
            park.total();
        }
        self.root.total()
    }

    /// Unit total area. Valid after [`UnitStatistics::total`].
    pub fn area(&self) -> f64 {
        self.root.area
    }

    /// The aggregation tree, root children keyed by disturbance type.
    pub fn tree(&self) -> &Node {
        &self.root
    }

    /// The park sub-aggregation, when a park attached to this unit.
    pub fn park(&self) -> Option<&UnitStatistics> {
        self.park.as_deref()
    }
}

/// All landscape units of one run, keyed by unit name.
#[derive(Debug, Clone, Default)]
pub struct LandscapeInventory {
    units: BTreeMap<String, UnitStatistics>,
    /// Park records held back until [`LandscapeInventory::attach_parks`].
    parked: Vec<ClassifiedRecord>,
}

impl LandscapeInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one record. Park records (unit number ending in `P`) are
    /// buffered; everything else lands in its unit, created on first sight
    /// with the record's plan and number.
    pub fn ingest(&mut self, record: &ClassifiedRecord) {
        if record.unit_number.ends_with('P') {
            self.parked.push(record.clone());
            return;
        }
        let unit = self
            .units
            .entry(record.unit_name.clone())
            .or_insert_with(|| {
                UnitStatistics::new(&record.unit_name, &record.unit_number, &record.resource_plan)
            });
        if unit.resource_plan.is_empty() {
            unit.resource_plan = record.resource_plan.clone();
        }
        if unit.number.is_empty() {
            unit.number = record.unit_number.clone();
        }
        unit.insert(record);
    }

    pub fn ingest_all<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a ClassifiedRecord>,
    {
        for record in records {
            self.ingest(record);
        }
    }

    /// Attach buffered park records: the parent unit is the one whose number
    /// equals the park number minus the trailing `P`. Park records populate
    /// BOTH the park sub-aggregation and the parent tree, so parent totals
    /// include park area. Parks with no matching parent are dropped.
    pub fn attach_parks(&mut self) {
        let parked = std::mem::take(&mut self.parked);
        for record in &parked {
            let Some(parent_number) = record.unit_number.strip_suffix('P') else {
                continue;
            };
            let Some(parent) = self.units.values_mut().find(|u| u.number == parent_number)
            else {
                continue;
            };
            parent.insert(record);
            let park = parent.park.get_or_insert_with(|| {
                Box::new(UnitStatistics::new(
                    &record.unit_name,
                    &record.unit_number,
                    &record.resource_plan,
                ))
            });
            park.insert(record);
        }
    }

    /// Attach parks, then run the area pass over every unit. Call once,
    /// after all records are ingested and before summarization.
    pub fn finalize(&mut self) {
        self.attach_parks();
        for unit in self.units.values_mut() {
            unit.total();
        }
    }

    pub fn get(&self, unit_name: &str) -> Option<&UnitStatistics> {
        self.units.get(unit_name)
    }

    /// Units in name order.
    pub fn units(&self) -> impl Iterator<Item = &UnitStatistics> {
        self.units.values()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
